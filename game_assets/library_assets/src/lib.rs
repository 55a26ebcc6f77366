use {
    activation_resources::{EngineSettings, MacroLibrary, RecomputePending},
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    macro_components::{MacroDef, MacroTree, NodeId, NodeKind, TreeError},
    serde::{Deserialize, Serialize},
    system_schedule::EngineSchedule,
    thiserror::Error,
};

pub struct LibraryAssetsPlugin;

impl Plugin for LibraryAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<MacroLibraryDefinition>::new(&["library.ron"]))
            .init_resource::<EngineSettings>()
            .init_resource::<MacroLibrary>()
            .init_resource::<RecomputePending>()
            .add_systems(Startup, start_loading)
            .add_systems(Update, load_library.in_set(EngineSchedule::LoadLibrary));
    }
}

// ===== Asset Definition =====

/// A macro library as authored on disk (`*.library.ron`).
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacroLibraryDefinition {
    /// Children of the root group, in declaration order.
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

/// One node of a library file. Nodes without an `id` get a fresh one on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeDefinition {
    Group {
        #[serde(default)]
        id: Option<NodeId>,
        name: String,
        #[serde(default)]
        children: Vec<NodeDefinition>,
    },
    SubscriptionGroup {
        #[serde(default)]
        id: Option<NodeId>,
        name: String,
        url: String,
        #[serde(default)]
        children: Vec<NodeDefinition>,
    },
    Macro {
        #[serde(default)]
        id: Option<NodeId>,
        name: String,
        #[serde(default)]
        def: MacroDef,
    },
}

impl NodeDefinition {
    pub fn name(&self) -> &str {
        match self {
            NodeDefinition::Group { name, .. }
            | NodeDefinition::SubscriptionGroup { name, .. }
            | NodeDefinition::Macro { name, .. } => name,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("node {name:?} could not be added: {source}")]
    InvalidNode {
        name: String,
        #[source]
        source: TreeError,
    },
}

impl MacroLibraryDefinition {
    /// Builds the in-memory tree, keeping declaration order.
    pub fn build_tree(&self) -> Result<MacroTree, LibraryError> {
        let mut tree = MacroTree::new();
        let root = tree.root();
        add_nodes(&mut tree, root, &self.nodes)?;
        Ok(tree)
    }
}

fn add_nodes(
    tree: &mut MacroTree,
    parent: NodeId,
    nodes: &[NodeDefinition],
) -> Result<(), LibraryError> {
    for node in nodes {
        let (id, kind, children) = match node {
            NodeDefinition::Group { id, children, .. } => (*id, NodeKind::Group, children.as_slice()),
            NodeDefinition::SubscriptionGroup {
                id, url, children, ..
            } => (
                *id,
                NodeKind::SubscriptionGroup { url: url.clone() },
                children.as_slice(),
            ),
            NodeDefinition::Macro { id, def, .. } => (*id, NodeKind::Macro(def.clone()), &[][..]),
        };

        let id = id.unwrap_or_default();
        tree.insert_with_id(id, parent, None, node.name(), kind)
            .map_err(|source| LibraryError::InvalidNode {
                name: node.name().to_string(),
                source,
            })?;
        add_nodes(tree, id, children)?;
    }
    Ok(())
}

// ===== Loading =====

#[derive(Resource, Default)]
pub struct LibraryHandle(pub Handle<MacroLibraryDefinition>);

fn start_loading(
    mut commands: Commands,
    settings: Res<EngineSettings>,
    asset_server: Res<AssetServer>,
) {
    info!(path = %settings.library_path, "loading macro library");
    commands.insert_resource(LibraryHandle(
        asset_server.load(settings.library_path.clone()),
    ));
}

/// Replaces the library whenever a library asset is added or hot-reloaded.
///
/// A definition that does not form a valid tree is rejected and the current library is kept.
pub fn load_library(
    mut events: MessageReader<AssetEvent<MacroLibraryDefinition>>,
    assets: Res<Assets<MacroLibraryDefinition>>,
    mut library: ResMut<MacroLibrary>,
    mut pending: ResMut<RecomputePending>,
) {
    for event in events.read() {
        let (AssetEvent::Added { id } | AssetEvent::Modified { id }) = event else {
            continue;
        };
        let Some(definition) = assets.get(*id) else {
            continue;
        };

        match definition.build_tree() {
            Ok(tree) => {
                info!(nodes = tree.len(), "macro library loaded");
                library.tree = tree;
                pending.request();
            }
            Err(error) => {
                error!(%error, "macro library rejected, keeping the current one");
            }
        }
    }
}
