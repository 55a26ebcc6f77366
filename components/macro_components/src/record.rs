use serde::{Deserialize, Serialize};

/// Lines a single game macro can hold.
pub const MAX_LINES: usize = 15;
/// Characters per line accepted by the slot store.
pub const MAX_LINE_CHARS: usize = 181;
/// Characters of title shown by the game.
pub const MAX_TITLE_CHARS: usize = 20;
/// Icon used when a macro does not pick one.
pub const DEFAULT_ICON_ID: u32 = 66001;
/// Icon marking a slot whose macro is currently inactive.
pub const INACTIVE_ICON_ID: u32 = 66162;

/// Fixed-size macro record as written into one slot of a bank.
///
/// Truncating `title` and `lines` to what the game accepts is left to the slot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VanillaMacro {
    pub icon_id: u32,
    pub title: String,
    pub lines: Vec<String>,
}

impl VanillaMacro {
    pub fn new(icon_id: u32, title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            icon_id,
            title: title.into(),
            lines,
        }
    }

    /// Padding record used to clear slots beyond a macro's content.
    pub fn empty() -> Self {
        Self::new(DEFAULT_ICON_ID, "", Vec::new())
    }

    /// Placeholder written to slots that belong to the library but have no active macro.
    pub fn inactive() -> Self {
        Self::new(
            INACTIVE_ICON_ID,
            "Inactive",
            vec!["/echo No active macro is linked to this slot.".to_string()],
        )
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_inactive_placeholder(&self) -> bool {
        *self == Self::inactive()
    }
}
