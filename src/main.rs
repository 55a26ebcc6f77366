use {
    activation_resources::{ActiveSet, MacroLibrary},
    bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*},
    condition_components::{Condition, ConditionKind},
    conditions::{ConditionSources, SharedConditionSource, SourceHandle},
    core::CorePlugin,
    macro_events::RebindFailed,
    rebind::SlotStoreHandle,
    std::time::Duration,
    system_schedule::EngineSchedule,
};

/// Jobs the demo cycles through: Dragoon, Paladin, Black Mage.
const DEMO_JOBS: [u32; 3] = [22, 19, 25];

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 30.0,
            ))),
            LogPlugin {
                filter: "error,macro_banks=info,\
                    conditions=debug,\
                    activation=debug,\
                    rebind=debug,\
                    library_assets=info"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            },
            AssetPlugin::default(),
        ))
        .add_plugins(CorePlugin)
        .add_systems(Startup, register_demo_sources)
        .add_systems(
            Update,
            (
                cycle_demo_job.before(EngineSchedule::PollConditions),
                log_banks
                    .after(EngineSchedule::Rebind)
                    .run_if(resource_changed::<ActiveSet>),
            ),
        )
        .add_observer(report_rebind_failure)
        .run();
}

/// Stand-in for the game client: values are pushed into shared sources.
#[derive(Resource)]
struct DemoClient {
    job: SourceHandle,
    timer: Timer,
    next: usize,
}

fn register_demo_sources(mut commands: Commands, mut sources: ResMut<ConditionSources>) {
    let job = SharedConditionSource::new(ConditionKind::Job)
        .with_selectable(DEMO_JOBS.map(Condition::Job));
    let level = SharedConditionSource::new(ConditionKind::PlayerLevel);

    let job_handle = job.handle();
    job_handle.set(Some(Condition::Job(DEMO_JOBS[0])));
    level.handle().set(Some(Condition::PlayerLevel(100)));

    sources.register(job);
    sources.register(level);
    commands.insert_resource(DemoClient {
        job: job_handle,
        timer: Timer::from_seconds(5.0, TimerMode::Repeating),
        next: 1,
    });
}

fn cycle_demo_job(time: Res<Time>, mut client: ResMut<DemoClient>) {
    if !client.timer.tick(time.delta()).just_finished() {
        return;
    }
    let job = DEMO_JOBS[client.next % DEMO_JOBS.len()];
    client.next += 1;
    info!(job, "switching job");
    client.job.set(Some(Condition::Job(job)));
}

fn log_banks(library: Res<MacroLibrary>, store: Res<SlotStoreHandle>) {
    for slot in library.tree.linked_slots() {
        match store.0.read(slot) {
            Ok(Some(record)) => info!(%slot, title = %record.title, lines = record.line_count(), "slot"),
            Ok(None) => info!(%slot, "slot empty"),
            Err(error) => warn!(%slot, %error, "slot unreadable"),
        }
    }
}

fn report_rebind_failure(trigger: On<RebindFailed>) {
    let event = trigger.event();
    error!(slot = ?event.slot, message = %event.message, "macro slots could not be updated");
}
