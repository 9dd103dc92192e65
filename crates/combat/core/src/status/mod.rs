//! Timed, reversible modifiers (buffs, debuffs, damage-over-time).
//!
//! [`StatusEffects`] owns the per-agent timers. Multiplicative and channel
//! modifiers are kept in handle-keyed stacks so that expiry and cancellation
//! restore the exact pre-application value.

mod conditional;
mod effects;
mod kind;
mod payload;
mod stack;

pub use conditional::{ConditionalHandle, ConditionalRegistry};
pub use effects::{StatusEffects, StatusHandle, StatusTick};
pub use kind::{Accumulator, Channel, Direction, EffectClass, PeriodicTarget, StatusKind};
pub use payload::StatusPayload;
pub use stack::{ChannelSnapshot, ChannelStack, Channels, FactorStack, Multipliers};
