//! Decides which macros are active for the current snapshot and turns each active macro into the
//! fixed-size records written into its linked slots.

mod engine;
mod materialize;
mod systems;

pub use engine::*;
pub use materialize::*;
pub use systems::*;

use {
    activation_resources::{ActivationStats, ActiveSet, MacroLibrary, RecomputePending},
    bevy::prelude::*,
    condition_components::CurrentConditions,
    system_schedule::EngineSchedule,
};

pub struct ActivationPlugin;

impl Plugin for ActivationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MacroLibrary>()
            .init_resource::<RecomputePending>()
            .init_resource::<CurrentConditions>()
            .init_resource::<ActiveSet>()
            .init_resource::<ActivationStats>()
            .add_observer(apply_tree_edit)
            .add_systems(
                Update,
                recompute_activation
                    .run_if(recompute_needed)
                    .in_set(EngineSchedule::Recompute),
            );
    }
}
