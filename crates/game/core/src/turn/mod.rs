//! Turn ordering.
mod queue;

pub use queue::{TurnEntry, TurnQueue};
