//! Writes the active set into the game's macro banks and keeps inactive and unlinked slots from
//! showing stale macros.

mod controller;
mod store;
mod systems;

pub use controller::*;
pub use store::*;
pub use systems::*;

use {
    activation_resources::{ActivationStats, ActiveSet, MacroLibrary, RecomputePending},
    bevy::prelude::*,
    system_schedule::EngineSchedule,
};

pub struct RebindPlugin;

impl Plugin for RebindPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RebindController>()
            .init_resource::<SlotStoreHandle>()
            .init_resource::<MacroLibrary>()
            .init_resource::<ActiveSet>()
            .init_resource::<RecomputePending>()
            .init_resource::<ActivationStats>()
            .add_observer(retry_rebind)
            .add_systems(
                Update,
                apply_rebind
                    .run_if(listener_attached.and(resource_changed::<ActiveSet>))
                    .in_set(EngineSchedule::Rebind),
            );
    }
}
