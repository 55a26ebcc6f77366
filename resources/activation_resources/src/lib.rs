use {
    bevy::prelude::*,
    macro_components::{MacroTree, NodeId, SlotRef},
    std::{collections::BTreeMap, time::Duration},
};

/// The user's macro library.
///
/// Mutated only by the `EditMacroTree` observer and by library (re)loads, both of which set
/// [`RecomputePending`].
#[derive(Resource, Default, Debug, Clone)]
pub struct MacroLibrary {
    pub tree: MacroTree,
}

/// Debounce flag: set by every library change, cleared by the recompute that consumes it.
#[derive(Resource, Default, Debug)]
pub struct RecomputePending(bool);

impl RecomputePending {
    pub fn request(&mut self) {
        self.0 = true;
    }

    pub fn is_requested(&self) -> bool {
        self.0
    }

    /// Clears the flag and returns whether it was set.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

/// Result of one activation pass.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet {
    /// Active macros in declaration order.
    pub macros: Vec<NodeId>,
    /// Which active macro owns each claimed slot.
    pub claims: BTreeMap<SlotRef, NodeId>,
}

impl ActiveSet {
    pub fn is_active(&self, id: NodeId) -> bool {
        self.macros.contains(&id)
    }

    pub fn owner_of(&self, slot: SlotRef) -> Option<NodeId> {
        self.claims.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

/// Engine configuration.
#[derive(Resource, Debug, Clone)]
pub struct EngineSettings {
    /// How often condition sources are sampled.
    pub poll_interval: Duration,
    /// Macro library asset, relative to the asset folder.
    pub library_path: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            library_path: "macros/default.library.ron".to_string(),
        }
    }
}

/// Counters exposed for diagnostics and tests.
#[derive(Resource, Default, Debug, Clone)]
pub struct ActivationStats {
    pub recomputes: u64,
    pub snapshots: u64,
    pub rebinds: u64,
}
