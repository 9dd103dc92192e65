//! Reversible modifier accumulators.
//!
//! Each live status contributes one entry keyed by its handle. Values are
//! recomputed from the remaining entries, so removing a contribution restores
//! the accumulator to exactly the value it had before that contribution was
//! pushed.

use std::collections::BTreeMap;

use super::effects::StatusHandle;
use super::kind::{Accumulator, Channel};

/// Product of live multiplicative factors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactorStack {
    factors: BTreeMap<StatusHandle, f32>,
}

impl FactorStack {
    pub fn push(&mut self, handle: StatusHandle, factor: f32) {
        self.factors.insert(handle, factor);
    }

    pub fn remove(&mut self, handle: StatusHandle) -> Option<f32> {
        self.factors.remove(&handle)
    }

    /// Current multiplier; `1.0` when nothing is active.
    pub fn value(&self) -> f32 {
        self.factors.values().product()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn clear(&mut self) {
        self.factors.clear();
    }
}

/// Flat and percentage contributions to a speed-like channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelStack {
    flat: BTreeMap<StatusHandle, f32>,
    percent: BTreeMap<StatusHandle, f32>,
}

impl ChannelStack {
    pub fn push(&mut self, handle: StatusHandle, percentage: bool, amount: f32) {
        if percentage {
            self.percent.insert(handle, amount);
        } else {
            self.flat.insert(handle, amount);
        }
    }

    pub fn remove(&mut self, handle: StatusHandle) {
        self.flat.remove(&handle);
        self.percent.remove(&handle);
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            flat: self.flat.values().sum(),
            percent: self.percent.values().sum(),
        }
    }

    pub fn clear(&mut self) {
        self.flat.clear();
        self.percent.clear();
    }
}

/// Net signed contribution to a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSnapshot {
    pub flat: f32,
    pub percent: f32,
}

impl ChannelSnapshot {
    /// Visible flat decrease; never negative.
    pub fn decrease_flat(&self) -> f32 {
        (-self.flat).max(0.0)
    }

    /// Visible percentage decrease; never negative.
    pub fn decrease_percent(&self) -> f32 {
        (-self.percent).max(0.0)
    }

    /// Applies the channel to a base value, never going below zero.
    pub fn apply(&self, base: f32) -> f32 {
        ((base + self.flat) * (1.0 + self.percent / 100.0)).max(0.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Multipliers {
    pub damage: FactorStack,
    pub damage_received: FactorStack,
    pub defense: FactorStack,
    pub healing: FactorStack,
}

impl Multipliers {
    pub fn get(&self, accumulator: Accumulator) -> &FactorStack {
        match accumulator {
            Accumulator::Damage => &self.damage,
            Accumulator::DamageReceived => &self.damage_received,
            Accumulator::Defense => &self.defense,
            Accumulator::Healing => &self.healing,
        }
    }

    pub fn get_mut(&mut self, accumulator: Accumulator) -> &mut FactorStack {
        match accumulator {
            Accumulator::Damage => &mut self.damage,
            Accumulator::DamageReceived => &mut self.damage_received,
            Accumulator::Defense => &mut self.defense,
            Accumulator::Healing => &mut self.healing,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Channels {
    pub movement_speed: ChannelStack,
    pub attack_speed: ChannelStack,
    pub cooldown: ChannelStack,
}

impl Channels {
    pub fn get(&self, channel: Channel) -> &ChannelStack {
        match channel {
            Channel::MovementSpeed => &self.movement_speed,
            Channel::AttackSpeed => &self.attack_speed,
            Channel::Cooldown => &self.cooldown,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut ChannelStack {
        match channel {
            Channel::MovementSpeed => &mut self.movement_speed,
            Channel::AttackSpeed => &mut self.attack_speed,
            Channel::Cooldown => &mut self.cooldown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_factor_restores_previous_product() {
        let mut stack = FactorStack::default();
        stack.push(StatusHandle(1), 1.3);
        let before = stack.value();

        stack.push(StatusHandle(2), 0.7);
        stack.push(StatusHandle(3), 1.1);
        stack.remove(StatusHandle(2));
        stack.remove(StatusHandle(3));

        assert_eq!(stack.value(), before);
    }

    #[test]
    fn channel_decrease_clamps_at_zero() {
        let mut stack = ChannelStack::default();
        stack.push(StatusHandle(1), false, 2.0);
        stack.push(StatusHandle(2), true, -30.0);

        let snapshot = stack.snapshot();
        assert_eq!(snapshot.decrease_flat(), 0.0);
        assert_eq!(snapshot.decrease_percent(), 30.0);
        assert!((snapshot.apply(8.0) - 7.0).abs() < 1e-5);
    }
}
