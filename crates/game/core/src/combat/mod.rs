//! Combat resolution helpers.
//!
//! - [`DamageCalculator`]: pure damage/heal formulas
//! - [`ComboTracker`]: time-windowed attack chains
//! - [`ThreatTable`]: per-defender aggro accumulation

pub mod combo;
pub mod damage;
pub mod threat;

pub use combo::{ComboChain, ComboTracker};
pub use damage::{DamageCalculator, DamageResult};
pub use threat::ThreatTable;
