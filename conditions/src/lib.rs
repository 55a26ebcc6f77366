//! Condition sources and the polling loop that turns them into [`CurrentConditions`] snapshots.

mod sources;
mod systems;

pub use sources::*;
pub use systems::*;

use {
    activation_resources::{ActivationStats, EngineSettings},
    bevy::prelude::*,
    condition_components::CurrentConditions,
    system_schedule::EngineSchedule,
};

pub struct ConditionsPlugin;

impl Plugin for ConditionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EngineSettings>()
            .init_resource::<ConditionSources>()
            .init_resource::<CurrentConditions>()
            .init_resource::<ActivationStats>()
            .add_systems(Startup, start_poll_timer)
            .add_systems(
                Update,
                (tick_poll_timer, poll_conditions.run_if(poll_due))
                    .chain()
                    .in_set(EngineSchedule::PollConditions),
            );
    }
}
