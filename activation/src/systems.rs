use {
    crate::activate,
    activation_resources::{ActivationStats, ActiveSet, MacroLibrary, RecomputePending},
    bevy::prelude::*,
    condition_components::CurrentConditions,
    macro_events::{EditMacroTree, MacroTreeEdited, TreeEditRejected},
};

/// Observer applying library edits.
///
/// Successful edits only raise [`RecomputePending`]; the recompute itself runs once per tick in
/// `EngineSchedule::Recompute`, however many edits arrived.
pub fn apply_tree_edit(
    trigger: On<EditMacroTree>,
    mut library: ResMut<MacroLibrary>,
    mut pending: ResMut<RecomputePending>,
    mut commands: Commands,
) {
    let edit = trigger.event().0.clone();
    let node = edit.target();

    match library.tree.apply(edit) {
        Ok(()) => {
            debug!(%node, "applied tree edit");
            pending.request();
            commands.trigger(MacroTreeEdited { node });
        }
        Err(error) => {
            warn!(%node, %error, "rejected tree edit");
            commands.trigger(TreeEditRejected { node, error });
        }
    }
}

/// Run condition: a library edit is pending or the snapshot changed since the last check.
pub fn recompute_needed(pending: Res<RecomputePending>, snapshot: Res<CurrentConditions>) -> bool {
    pending.is_requested() || snapshot.is_changed()
}

/// Recomputes the active set.
///
/// `ActiveSet` is written unconditionally so the rebind pass also sees body edits that leave the
/// set of active macros unchanged.
pub fn recompute_activation(
    library: Res<MacroLibrary>,
    snapshot: Res<CurrentConditions>,
    mut pending: ResMut<RecomputePending>,
    mut active: ResMut<ActiveSet>,
    mut stats: ResMut<ActivationStats>,
) {
    pending.take();
    stats.recomputes += 1;

    let next = activate(&library.tree, &snapshot);
    if *active != next {
        info!(
            active = next.len(),
            claimed_slots = next.claims.len(),
            "active macro set changed"
        );
    } else {
        trace!("active macro set unchanged");
    }
    *active = next;
}
