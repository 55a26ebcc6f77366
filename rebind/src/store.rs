use {
    bevy::prelude::*,
    macro_components::{
        Bank, MAX_LINE_CHARS, MAX_LINES, MAX_TITLE_CHARS, SLOTS_PER_BANK, SlotRef, VanillaMacro,
    },
    thiserror::Error,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotStoreError {
    #[error("slot {0} does not exist")]
    OutOfRange(SlotRef),
    #[error("slot store unavailable: {0}")]
    Unavailable(String),
}

/// The game's macro banks: two banks of [`SLOTS_PER_BANK`] slots, one record each.
///
/// Every call is atomic on its own; nothing groups several calls together.
pub trait SlotStore: Send + Sync + 'static {
    fn write(&mut self, slot: SlotRef, record: &VanillaMacro) -> Result<(), SlotStoreError>;

    fn delete(&mut self, slot: SlotRef) -> Result<(), SlotStoreError>;

    /// Current record in `slot`, `None` when the slot is empty.
    fn read(&self, slot: SlotRef) -> Result<Option<VanillaMacro>, SlotStoreError>;
}

/// In-process [`SlotStore`] that truncates records to what the game displays.
#[derive(Debug, Clone)]
pub struct InMemorySlotStore {
    individual: Vec<Option<VanillaMacro>>,
    shared: Vec<Option<VanillaMacro>>,
    writes: u64,
    deletes: u64,
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self {
            individual: vec![None; SLOTS_PER_BANK as usize],
            shared: vec![None; SLOTS_PER_BANK as usize],
            writes: 0,
            deletes: 0,
        }
    }
}

impl InMemorySlotStore {
    /// Successful writes since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Successful deletes since creation.
    pub fn deletes(&self) -> u64 {
        self.deletes
    }

    fn cell(&self, slot: SlotRef) -> Result<&Option<VanillaMacro>, SlotStoreError> {
        let bank = match slot.bank {
            Bank::Individual => &self.individual,
            Bank::Shared => &self.shared,
        };
        bank.get(slot.slot as usize)
            .ok_or(SlotStoreError::OutOfRange(slot))
    }

    fn cell_mut(&mut self, slot: SlotRef) -> Result<&mut Option<VanillaMacro>, SlotStoreError> {
        let bank = match slot.bank {
            Bank::Individual => &mut self.individual,
            Bank::Shared => &mut self.shared,
        };
        bank.get_mut(slot.slot as usize)
            .ok_or(SlotStoreError::OutOfRange(slot))
    }
}

impl SlotStore for InMemorySlotStore {
    fn write(&mut self, slot: SlotRef, record: &VanillaMacro) -> Result<(), SlotStoreError> {
        *self.cell_mut(slot)? = Some(truncate(record));
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, slot: SlotRef) -> Result<(), SlotStoreError> {
        *self.cell_mut(slot)? = None;
        self.deletes += 1;
        Ok(())
    }

    fn read(&self, slot: SlotRef) -> Result<Option<VanillaMacro>, SlotStoreError> {
        self.cell(slot).cloned()
    }
}

fn truncate(record: &VanillaMacro) -> VanillaMacro {
    VanillaMacro {
        icon_id: record.icon_id,
        title: record.title.chars().take(MAX_TITLE_CHARS).collect(),
        lines: record
            .lines
            .iter()
            .take(MAX_LINES)
            .map(|line| line.chars().take(MAX_LINE_CHARS).collect())
            .collect(),
    }
}

/// The slot store the rebind pass writes to.
#[derive(Resource)]
pub struct SlotStoreHandle(pub Box<dyn SlotStore>);

impl SlotStoreHandle {
    pub fn new(store: impl SlotStore) -> Self {
        Self(Box::new(store))
    }
}

impl Default for SlotStoreHandle {
    fn default() -> Self {
        Self::new(InMemorySlotStore::default())
    }
}
