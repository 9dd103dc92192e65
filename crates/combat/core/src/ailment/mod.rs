//! Control-loss states (stun, stagger, knockdown, ...) and how they combine.

mod kind;
mod resolver;
mod timer;

pub use kind::{AilmentKind, ResetPolicy};
pub use resolver::{Override, Resolution, resolve};
pub use timer::{AilmentExpiry, AilmentTimer};
