use bevy::prelude::*;

/// Ordering of the engine's per-tick work. `CorePlugin` chains the sets in declaration order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum EngineSchedule {
    /// Sample condition sources into a new snapshot.
    PollConditions,
    /// Pick up library asset (re)loads.
    LoadLibrary,
    /// Recompute the active set after a snapshot change or library edit.
    Recompute,
    /// Push the active set into the slot store.
    Rebind,
}
