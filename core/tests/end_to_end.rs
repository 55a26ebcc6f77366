use {
    activation_resources::{ActiveSet, EngineSettings, MacroLibrary},
    bevy::{prelude::*, time::TimeUpdateStrategy},
    condition_components::{Condition, ConditionKind, OpExpr, OrExpr},
    conditions::{ConditionSources, SharedConditionSource, SourceHandle},
    core::CorePlugin,
    library_assets::{MacroLibraryDefinition, NodeDefinition},
    macro_components::{Bank, Link, MacroDef, NodeKind, SlotRef, TreeEdit, VanillaMacro},
    macro_events::EditMacroTree,
    rebind::SlotStoreHandle,
    std::time::Duration,
};

const PALADIN: u32 = 19;
const DRAGOON: u32 = 22;

/// App whose every update advances time by one poll interval.
fn test_app() -> (App, SourceHandle) {
    let interval = Duration::from_millis(100);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .insert_resource(EngineSettings {
            poll_interval: interval,
            ..Default::default()
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(interval))
        .add_plugins(CorePlugin);

    let job = SharedConditionSource::new(ConditionKind::Job);
    let handle = job.handle();
    app.world_mut()
        .resource_mut::<ConditionSources>()
        .register(job);
    (app, handle)
}

fn dragoon_def(slots: &[u32]) -> MacroDef {
    MacroDef {
        link: Link::new(Bank::Individual, slots.iter().copied()).unwrap(),
        conditions: OrExpr::single(OpExpr::is(Condition::Job(DRAGOON))),
        body: "/ac \"Geirskogul\" <t>".into(),
        ..Default::default()
    }
}

fn read(app: &App, slot: u32) -> Option<VanillaMacro> {
    app.world()
        .resource::<SlotStoreHandle>()
        .0
        .read(SlotRef::new(Bank::Individual, slot))
        .unwrap()
}

fn tick(app: &mut App) {
    app.update();
    app.update();
}

#[test]
fn job_change_flows_from_source_to_slot() {
    let (mut app, job) = test_app();
    let root = app.world().resource::<MacroLibrary>().tree.root();
    let insert = TreeEdit::insert(root, "M", NodeKind::Macro(dragoon_def(&[1])));
    let id = insert.target();
    app.world_mut().trigger(EditMacroTree(insert));

    job.set(Some(Condition::Job(DRAGOON)));
    tick(&mut app);
    assert_eq!(app.world().resource::<ActiveSet>().macros, vec![id]);
    assert_eq!(read(&app, 1).map(|record| record.title), Some("M".into()));

    job.set(Some(Condition::Job(PALADIN)));
    tick(&mut app);
    assert!(app.world().resource::<ActiveSet>().is_empty());
    assert_eq!(read(&app, 1), Some(VanillaMacro::inactive()));

    app.world_mut().trigger(EditMacroTree(TreeEdit::Remove { id }));
    tick(&mut app);
    assert_eq!(read(&app, 1), None);
}

#[test]
fn unknown_job_deactivates_macro() {
    let (mut app, job) = test_app();
    let root = app.world().resource::<MacroLibrary>().tree.root();
    app.world_mut().trigger(EditMacroTree(TreeEdit::insert(
        root,
        "M",
        NodeKind::Macro(dragoon_def(&[4])),
    )));

    job.set(Some(Condition::Job(DRAGOON)));
    tick(&mut app);
    assert_eq!(app.world().resource::<ActiveSet>().len(), 1);

    job.set(None);
    tick(&mut app);
    assert!(app.world().resource::<ActiveSet>().is_empty());
}

#[test]
fn library_asset_is_bound_after_load() {
    let (mut app, job) = test_app();
    job.set(Some(Condition::Job(DRAGOON)));

    let body: Vec<String> = (1..=20).map(|i| format!("/echo step {i}")).collect();
    let definition = MacroLibraryDefinition {
        nodes: vec![NodeDefinition::Group {
            id: None,
            name: "Dragoon".into(),
            children: vec![NodeDefinition::Macro {
                id: None,
                name: "Rotation".into(),
                def: MacroDef {
                    link_with_chain: true,
                    body: body.join("\n"),
                    ..dragoon_def(&[10, 11])
                },
            }],
        }],
    };
    let _handle = app
        .world_mut()
        .resource_mut::<Assets<MacroLibraryDefinition>>()
        .add(definition);
    tick(&mut app);
    tick(&mut app);

    let first = read(&app, 10).expect("first chunk written");
    let second = read(&app, 11).expect("second chunk written");
    assert_eq!(first.title, "Rotation 1");
    assert_eq!(first.lines.last().map(String::as_str), Some("/nextmacro"));
    assert_eq!(second.title, "Rotation 2");
    assert_eq!(second.line_count(), 6);
}
