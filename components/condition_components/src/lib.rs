//! Condition language for macro activation.
//!
//! A [`Condition`] describes one observable fact about the game client. Conditions are combined
//! into [`OpExpr`] comparisons, which in turn form an Or-of-And [`OrExpr`] formula evaluated
//! against a [`CurrentConditions`] snapshot.

mod condition;
mod expr;
mod op_expr;
mod snapshot;

pub use condition::*;
pub use expr::*;
pub use op_expr::*;
pub use snapshot::*;
