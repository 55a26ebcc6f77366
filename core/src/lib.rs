use {
    activation::ActivationPlugin, bevy::prelude::*, conditions::ConditionsPlugin,
    library_assets::LibraryAssetsPlugin, rebind::RebindPlugin, system_schedule::EngineSchedule,
};

/// Wires the whole engine into an app. Expects `AssetPlugin` (or `DefaultPlugins`) to be
/// present for library loading.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                EngineSchedule::PollConditions,
                EngineSchedule::LoadLibrary,
                EngineSchedule::Recompute,
                EngineSchedule::Rebind,
            )
                .chain(),
        )
        .add_plugins((
            ConditionsPlugin,
            LibraryAssetsPlugin,
            ActivationPlugin,
            RebindPlugin,
        ));
    }
}
