use {
    crate::{SlotStore, SlotStoreError},
    activation::materialize,
    activation_resources::ActiveSet,
    bevy::prelude::*,
    macro_components::{MacroTree, SlotRef, VanillaMacro},
    std::collections::{BTreeMap, BTreeSet},
    thiserror::Error,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RebindError {
    #[error("rebinding is suspended after an earlier store failure")]
    Detached,
    #[error("store call for slot {slot} failed: {source}")]
    Store {
        slot: SlotRef,
        #[source]
        source: SlotStoreError,
    },
}

impl RebindError {
    pub fn slot(&self) -> Option<SlotRef> {
        match self {
            RebindError::Detached => None,
            RebindError::Store { slot, .. } => Some(*slot),
        }
    }
}

/// Store calls made by one [`RebindController::rebind`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RebindReport {
    /// Records of active macros written.
    pub written: usize,
    /// Inactive placeholders written.
    pub placeholders: usize,
    /// Slots deleted because no macro links them anymore.
    pub deleted: usize,
    /// Writes skipped because the slot already holds the record.
    pub unchanged: usize,
}

impl RebindReport {
    pub fn store_calls(&self) -> usize {
        self.written + self.placeholders + self.deleted
    }
}

/// Keeps the slot store in line with the active set.
///
/// Remembers the slots the library linked on the last successful pass and the record last
/// written to each slot, so a pass over an unchanged active set makes no store calls.
#[derive(Resource, Debug)]
pub struct RebindController {
    linked: BTreeSet<SlotRef>,
    written: BTreeMap<SlotRef, VanillaMacro>,
    attached: bool,
}

impl Default for RebindController {
    fn default() -> Self {
        Self {
            linked: BTreeSet::new(),
            written: BTreeMap::new(),
            attached: true,
        }
    }
}

impl RebindController {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Resumes rebinding after a failure. The record cache is dropped since the store may
    /// have been left partially updated.
    pub fn reattach(&mut self) {
        self.attached = true;
        self.written.clear();
    }

    /// Slots linked by the library as of the last successful pass.
    pub fn linked_slots(&self) -> &BTreeSet<SlotRef> {
        &self.linked
    }

    /// Brings `store` in line with `active`:
    /// 1. every slot claimed by an active macro receives its materialized record,
    /// 2. every slot still linked by some macro but claimed by none receives the inactive
    ///    placeholder,
    /// 3. every slot linked on the previous pass and by no macro now is deleted.
    ///
    /// The first store error aborts the pass and detaches the controller.
    pub fn rebind(
        &mut self,
        tree: &MacroTree,
        active: &ActiveSet,
        store: &mut dyn SlotStore,
    ) -> Result<RebindReport, RebindError> {
        if !self.attached {
            return Err(RebindError::Detached);
        }

        let result = self.run(tree, active, store);
        if result.is_err() {
            self.attached = false;
        }
        result
    }

    fn run(
        &mut self,
        tree: &MacroTree,
        active: &ActiveSet,
        store: &mut dyn SlotStore,
    ) -> Result<RebindReport, RebindError> {
        let mut report = RebindReport::default();
        let mut claimed = BTreeSet::new();

        for &id in &active.macros {
            let Some(node) = tree.get(id) else {
                debug!(%id, "active macro no longer in the tree");
                continue;
            };
            let Some(def) = node.as_macro() else {
                continue;
            };

            for (slot, record) in materialize(node.name(), def) {
                claimed.insert(slot);
                if self.put(store, slot, record)? {
                    report.written += 1;
                } else {
                    report.unchanged += 1;
                }
            }
        }

        let linked = tree.linked_slots();

        for &slot in linked.difference(&claimed) {
            if self.put(store, slot, VanillaMacro::inactive())? {
                report.placeholders += 1;
            } else {
                report.unchanged += 1;
            }
        }

        for &slot in self.linked.difference(&linked) {
            store
                .delete(slot)
                .map_err(|source| RebindError::Store { slot, source })?;
            self.written.remove(&slot);
            report.deleted += 1;
        }

        self.linked = linked;
        trace!(?report, "rebind pass finished");
        Ok(report)
    }

    /// Writes `record` unless the cache says the slot already holds it.
    fn put(
        &mut self,
        store: &mut dyn SlotStore,
        slot: SlotRef,
        record: VanillaMacro,
    ) -> Result<bool, RebindError> {
        if self.written.get(&slot) == Some(&record) {
            return Ok(false);
        }
        // forget the old record first so a failed write is retried
        self.written.remove(&slot);
        store
            .write(slot, &record)
            .map_err(|source| RebindError::Store { slot, source })?;
        self.written.insert(slot, record);
        Ok(true)
    }
}
