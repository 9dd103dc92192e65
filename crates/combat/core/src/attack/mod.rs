//! Attack definitions, weapon tables, and per-instance hit tracking.

mod definition;
mod flags;
mod hit_counter;
mod table;

pub use definition::{AttackDefinition, AttackId, ComboCondition, PhaseThresholds, WeaponId};
pub use flags::{AttackFlags, CancelFlags};
pub use hit_counter::{HitCounter, HitCounterEntry};
pub use table::AttackTable;
