use {
    bevy::prelude::*,
    macro_components::{Link, MAX_LINES, MacroDef, SlotRef, VanillaMacro},
};

/// Direction from one linked slot to the next in a chained macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStep {
    /// Next slot in the same row (+1).
    Right,
    /// Slot directly below (+10).
    Down,
}

impl ChainStep {
    pub fn between(from: u32, to: u32) -> Option<Self> {
        if to == from + 1 {
            Some(ChainStep::Right)
        } else if to == from + 10 {
            Some(ChainStep::Down)
        } else {
            None
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            ChainStep::Right => "/nextmacro",
            ChainStep::Down => "/nextmacro down",
        }
    }
}

/// Steps between consecutive linked slots, or `None` when the slots do not form a snake.
pub fn chain_steps(link: &Link) -> Option<Vec<ChainStep>> {
    link.slots()
        .windows(2)
        .map(|pair| ChainStep::between(pair[0], pair[1]))
        .collect()
}

/// Splits `lines` into records of at most [`MAX_LINES`] lines.
///
/// With `steps`, a record that cannot hold the remaining content and has a following slot keeps
/// one line free for the continuation command of the step towards that slot.
pub fn chunk_lines(lines: &[&str], steps: Option<&[ChainStep]>) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut rest = lines;

    while !rest.is_empty() {
        let step = steps.and_then(|steps| steps.get(chunks.len()));
        let chunk = match step {
            Some(step) if rest.len() > MAX_LINES => {
                let (head, tail) = rest.split_at(MAX_LINES - 1);
                rest = tail;
                let mut chunk = to_owned_lines(head);
                chunk.push(step.command().to_string());
                chunk
            }
            _ => {
                let (head, tail) = rest.split_at(rest.len().min(MAX_LINES));
                rest = tail;
                to_owned_lines(head)
            }
        };
        chunks.push(chunk);
    }

    chunks
}

fn to_owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Produces the record for every linked slot of a macro, in link order.
///
/// Slots past the end of the content receive an empty record so stale content is always
/// overwritten. Chaining is applied only when `link_with_chain` is set and the whole link is a
/// snake; otherwise no continuation command is added anywhere.
pub fn materialize(name: &str, def: &MacroDef) -> Vec<(SlotRef, VanillaMacro)> {
    if def.link.is_empty() {
        return Vec::new();
    }

    let steps = if def.link_with_chain {
        let steps = chain_steps(&def.link);
        if steps.is_none() {
            debug!(
                macro_name = name,
                slots = ?def.link.slots(),
                "link is not a snake, chaining skipped"
            );
        }
        steps
    } else {
        None
    };

    let lines = def.lines();
    let chunks = chunk_lines(&lines, steps.as_deref());
    if chunks.len() > def.link.len() {
        debug!(
            macro_name = name,
            chunks = chunks.len(),
            slots = def.link.len(),
            "macro body does not fit its linked slots, trailing lines dropped"
        );
    }

    let numbered = chunks.len() > 1;
    let mut chunks = chunks.into_iter();

    def.link
        .slot_refs()
        .enumerate()
        .map(|(index, slot)| {
            let record = match chunks.next() {
                Some(lines) => {
                    let title = if numbered {
                        format!("{} {}", name, index + 1)
                    } else {
                        name.to_string()
                    };
                    VanillaMacro::new(def.icon_id, title, lines)
                }
                None => VanillaMacro::empty(),
            };
            (slot, record)
        })
        .collect()
}
