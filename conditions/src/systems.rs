use {
    crate::ConditionSources,
    activation_resources::{ActivationStats, EngineSettings},
    bevy::prelude::*,
    condition_components::CurrentConditions,
    std::time::Duration,
};

/// Repeating timer pacing the condition poll.
#[derive(Resource)]
pub struct PollTimer(pub Timer);

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self(Timer::new(interval, TimerMode::Repeating))
    }
}

/// Reads the poll interval once settings are final, so `EngineSettings` may be inserted before or
/// after the plugin.
pub fn start_poll_timer(mut commands: Commands, settings: Res<EngineSettings>) {
    debug!(interval = ?settings.poll_interval, "starting condition poll");
    commands.insert_resource(PollTimer::new(settings.poll_interval));
}

pub fn tick_poll_timer(time: Res<Time>, mut timer: ResMut<PollTimer>) {
    timer.0.tick(time.delta());
}

pub fn poll_due(timer: Res<PollTimer>) -> bool {
    timer.0.just_finished()
}

/// Samples every condition source and replaces the snapshot only when it changed, so the
/// activation pass keyed on `CurrentConditions` change detection stays idle otherwise.
pub fn poll_conditions(
    sources: Res<ConditionSources>,
    mut current: ResMut<CurrentConditions>,
    mut stats: ResMut<ActivationStats>,
) {
    let snapshot = sources.snapshot();
    if current.set_if_neq(snapshot) {
        stats.snapshots += 1;
        debug!(values = current.len(), "condition snapshot changed");
        trace!(snapshot = ?*current, "new snapshot");
    }
}
