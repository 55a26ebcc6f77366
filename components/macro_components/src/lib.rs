//! Macro library model: the node tree, slot links and the fixed-size records written into the
//! game's macro banks.

mod link;
mod node;
mod path;
mod record;
mod tree;

pub use link::*;
pub use node::*;
pub use path::*;
pub use record::*;
pub use tree::*;
