use std::fmt;

/// Unique identifier for any combatant tracked in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team affiliation used by the friendly-fire rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team-{}", self.0)
    }
}

/// Fixed simulation step counter.
///
/// Every timestamp on an agent (invincibility, hit-stop, timers) is a `Tick`.
/// Wall-clock durations are converted with [`crate::CombatConfig::ticks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Number of ticks elapsed since `earlier` (zero if `earlier` is in the future).
    pub const fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::AddAssign<u64> for Tick {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// World-space point reported by the collision layer.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Analog move input relative to the agent: `x` is strafe (right positive),
/// `y` is forward (forward positive).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveInput {
    pub x: f32,
    pub y: f32,
}

impl MoveInput {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Clamped resource meter (HP, stamina, defense, rage).
///
/// `current` stays within `[0, maximum]` for every operation except
/// [`Meter::grant_overheal`]. Once above `maximum`, the value only decreases
/// and restoration never pulls it back up to (or down to) the cap.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub current: f32,
    pub maximum: f32,
}

impl Meter {
    pub const fn new(current: f32, maximum: f32) -> Self {
        Self { current, maximum }
    }

    pub const fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub const fn empty(maximum: f32) -> Self {
        Self {
            current: 0.0,
            maximum,
        }
    }

    /// Removes up to `amount`, returning what was actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let drained = amount.min(self.current.max(0.0));
        self.current = (self.current - drained).max(0.0);
        drained
    }

    /// Adds up to `amount` without crossing `maximum`, returning what was added.
    pub fn restore(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        if self.current >= self.maximum {
            return 0.0;
        }
        let restored = amount.min(self.maximum - self.current);
        self.current += restored;
        restored
    }

    /// Applies a signed delta through [`Meter::drain`] or [`Meter::restore`].
    pub fn apply_delta(&mut self, delta: f32) -> f32 {
        if delta < 0.0 {
            -self.drain(-delta)
        } else {
            self.restore(delta)
        }
    }

    /// Raises `current` past `maximum`. Only externally granted effects use this.
    pub fn grant_overheal(&mut self, amount: f32) {
        self.current += amount.max(0.0);
    }

    pub fn fill(&mut self) {
        self.current = self.maximum;
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }
}
