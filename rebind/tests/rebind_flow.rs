use {
    activation::ActivationPlugin,
    activation_resources::{ActivationStats, MacroLibrary},
    bevy::prelude::*,
    condition_components::{Condition, CurrentConditions, OpExpr, OrExpr},
    macro_components::{Bank, Link, MacroDef, NodeKind, SlotRef, TreeEdit, VanillaMacro},
    macro_events::{EditMacroTree, RebindFailed, RetryRebind},
    rebind::*,
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    system_schedule::EngineSchedule,
};

const PALADIN: u32 = 19;
const DRAGOON: u32 = 22;

/// Store wrapper whose writes fail while the shared switch is on.
struct FlakyStore {
    inner: InMemorySlotStore,
    broken: Arc<AtomicBool>,
}

impl SlotStore for FlakyStore {
    fn write(&mut self, slot: SlotRef, record: &VanillaMacro) -> Result<(), SlotStoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(SlotStoreError::Unavailable("macro file locked".into()));
        }
        self.inner.write(slot, record)
    }

    fn delete(&mut self, slot: SlotRef) -> Result<(), SlotStoreError> {
        self.inner.delete(slot)
    }

    fn read(&self, slot: SlotRef) -> Result<Option<VanillaMacro>, SlotStoreError> {
        self.inner.read(slot)
    }
}

#[derive(Resource, Default)]
struct Failures(Vec<Option<SlotRef>>);

fn test_app(store: impl SlotStore) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SlotStoreHandle::new(store))
        .add_plugins((ActivationPlugin, RebindPlugin))
        .configure_sets(
            Update,
            (EngineSchedule::Recompute, EngineSchedule::Rebind).chain(),
        )
        .init_resource::<Failures>()
        .add_observer(|trigger: On<RebindFailed>, mut failures: ResMut<Failures>| {
            failures.0.push(trigger.event().slot);
        });
    app
}

fn add_dragoon_macro(app: &mut App, slot: u32) {
    let root = app.world().resource::<MacroLibrary>().tree.root();
    let kind = NodeKind::Macro(MacroDef {
        link: Link::new(Bank::Individual, [slot]).unwrap(),
        conditions: OrExpr::single(OpExpr::is(Condition::Job(DRAGOON))),
        body: "/ac \"High Jump\" <t>\n/ac \"Mirage Dive\" <t>".into(),
        ..Default::default()
    });
    app.world_mut()
        .trigger(EditMacroTree(TreeEdit::insert(root, "M", kind)));
}

fn set_job(app: &mut App, job: u32) {
    *app.world_mut().resource_mut::<CurrentConditions>() =
        CurrentConditions::default().with(Condition::Job(job));
}

fn read(app: &App, slot: u32) -> Option<VanillaMacro> {
    app.world()
        .resource::<SlotStoreHandle>()
        .0
        .read(SlotRef::new(Bank::Individual, slot))
        .unwrap()
}

#[test]
fn job_swap_replaces_macro_with_placeholder() {
    let mut app = test_app(InMemorySlotStore::default());
    add_dragoon_macro(&mut app, 1);

    set_job(&mut app, DRAGOON);
    app.update();
    let record = read(&app, 1).expect("slot 1 written");
    assert_eq!(record.title, "M");
    assert_eq!(record.line_count(), 2);

    set_job(&mut app, PALADIN);
    app.update();
    assert_eq!(read(&app, 1), Some(VanillaMacro::inactive()));

    set_job(&mut app, DRAGOON);
    app.update();
    assert_eq!(read(&app, 1).map(|record| record.title), Some("M".to_string()));
}

#[test]
fn idle_ticks_do_not_rebind() {
    let mut app = test_app(InMemorySlotStore::default());
    add_dragoon_macro(&mut app, 1);
    set_job(&mut app, DRAGOON);
    app.update();
    let rebinds = app.world().resource::<ActivationStats>().rebinds;

    app.update();
    app.update();
    assert_eq!(app.world().resource::<ActivationStats>().rebinds, rebinds);
}

#[test]
fn store_failure_suspends_until_retry() {
    let broken = Arc::new(AtomicBool::new(true));
    let mut app = test_app(FlakyStore {
        inner: InMemorySlotStore::default(),
        broken: broken.clone(),
    });
    add_dragoon_macro(&mut app, 3);
    set_job(&mut app, DRAGOON);
    app.update();

    assert_eq!(
        app.world().resource::<Failures>().0,
        vec![Some(SlotRef::new(Bank::Individual, 3))]
    );
    assert!(!app.world().resource::<RebindController>().is_attached());

    // further changes are not pushed while detached
    set_job(&mut app, PALADIN);
    app.update();
    assert_eq!(app.world().resource::<Failures>().0.len(), 1);

    broken.store(false, Ordering::SeqCst);
    app.world_mut().trigger(RetryRebind);
    app.update();

    assert!(app.world().resource::<RebindController>().is_attached());
    assert_eq!(read(&app, 3), Some(VanillaMacro::inactive()));
    assert_eq!(app.world().resource::<Failures>().0.len(), 1);
}
