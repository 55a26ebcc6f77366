use {
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeSet,
        fmt,
        hash::{Hash, Hasher},
    },
    thiserror::Error,
};

/// Number of addressable slots in each bank.
pub const SLOTS_PER_BANK: u32 = 100;

/// One of the game's two fixed macro collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bank {
    #[default]
    Individual,
    Shared,
}

/// A single physical slot: bank plus slot number (0..99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub bank: Bank,
    pub slot: u32,
}

impl SlotRef {
    pub fn new(bank: Bank, slot: u32) -> Self {
        Self { bank, slot }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.bank, self.slot)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("slot {slot} is outside the bank (0..{})", SLOTS_PER_BANK)]
    SlotOutOfRange { slot: u32 },
}

/// Target bank and ordered slot numbers a macro is copied into.
///
/// Slot order matters for chunking and chaining; equality and hashing only look at the bank and
/// the set of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LinkRepr", into = "LinkRepr")]
pub struct Link {
    bank: Bank,
    slots: Vec<u32>,
}

impl Link {
    /// Builds a link, dropping repeated slots (first occurrence wins).
    pub fn new(bank: Bank, slots: impl IntoIterator<Item = u32>) -> Result<Self, LinkError> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for slot in slots {
            if slot >= SLOTS_PER_BANK {
                return Err(LinkError::SlotOutOfRange { slot });
            }
            if seen.insert(slot) {
                ordered.push(slot);
            }
        }

        Ok(Self {
            bank,
            slots: ordered,
        })
    }

    pub fn empty(bank: Bank) -> Self {
        Self {
            bank,
            slots: Vec::new(),
        }
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in link order.
    pub fn slot_refs(&self) -> impl Iterator<Item = SlotRef> + '_ {
        self.slots.iter().map(|&slot| SlotRef::new(self.bank, slot))
    }

    fn slot_set(&self) -> BTreeSet<u32> {
        self.slots.iter().copied().collect()
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::empty(Bank::default())
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.bank == other.bank && self.slot_set() == other.slot_set()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bank.hash(state);
        self.slot_set().hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinkRepr {
    #[serde(default)]
    bank: Bank,
    #[serde(default)]
    slots: Vec<u32>,
}

impl TryFrom<LinkRepr> for Link {
    type Error = LinkError;

    fn try_from(repr: LinkRepr) -> Result<Self, Self::Error> {
        Link::new(repr.bank, repr.slots)
    }
}

impl From<Link> for LinkRepr {
    fn from(link: Link) -> Self {
        Self {
            bank: link.bank,
            slots: link.slots,
        }
    }
}
