use {
    bevy::prelude::*,
    macro_components::{NodeId, SlotRef, TreeEdit, TreeError},
};

/// Request to mutate the macro library.
///
/// This **Observer** event is the only way editors, importers and subscription sync change the
/// tree. The observer applies the edit and schedules a single recompute for the current tick,
/// no matter how many edits arrive.
#[derive(Event, Debug, Clone)]
pub struct EditMacroTree(pub TreeEdit);

/// Fired after an [`EditMacroTree`] was applied.
#[derive(Event, Debug, Clone)]
pub struct MacroTreeEdited {
    pub node: NodeId,
}

/// Fired when an [`EditMacroTree`] could not be applied; the tree is left unchanged.
#[derive(Event, Debug, Clone)]
pub struct TreeEditRejected {
    pub node: NodeId,
    pub error: TreeError,
}

/// Fired when writing to the slot store failed.
///
/// Rebinding is suspended after this event until a [`RetryRebind`] is triggered.
#[derive(Event, Debug, Clone)]
pub struct RebindFailed {
    pub slot: Option<SlotRef>,
    pub message: String,
}

/// Re-attaches the rebind listener after a failure and schedules a fresh recompute.
#[derive(Event, Debug, Clone, Default)]
pub struct RetryRebind;
