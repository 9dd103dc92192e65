//! Hit resolution: validity checks, damage, mitigation and side effects.

mod damage;
pub(crate) mod pipeline;
mod request;
mod validation;

pub use damage::{Mitigation, MitigationTier, mitigate, raw_damage};
pub use request::{HitDelivery, HitOutcome, HitRejection, HitReport, HitRequest};
pub use validation::{ValidHit, check as validate};
