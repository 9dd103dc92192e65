use super::kind::{Direction, StatusKind};
use crate::state::AgentId;

/// A timed modifier waiting to be applied to an agent.
///
/// Lives for `delay_millis + duration_millis` unless cancelled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusPayload {
    pub kind: StatusKind,
    /// Percent (when `percentage`) or absolute amount. Periodic kinds read
    /// this as a per-second rate.
    pub magnitude: f32,
    pub percentage: bool,
    pub duration_millis: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay_millis: u32,
    /// Cancelled when the agent switches weapons.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon_bound: bool,
    /// Agent credited for kills caused by this status.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<AgentId>,
}

impl StatusPayload {
    pub fn new(kind: StatusKind, magnitude: f32, duration_millis: u32) -> Self {
        Self {
            kind,
            magnitude,
            percentage: false,
            duration_millis,
            delay_millis: 0,
            weapon_bound: false,
            source: None,
        }
    }

    pub fn percent(kind: StatusKind, percent: f32, duration_millis: u32) -> Self {
        Self {
            percentage: true,
            ..Self::new(kind, percent, duration_millis)
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay_millis: u32) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    #[must_use]
    pub fn weapon_bound(mut self) -> Self {
        self.weapon_bound = true;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: AgentId) -> Self {
        self.source = Some(source);
        self
    }

    /// Factor pushed onto a multiplicative accumulator.
    ///
    /// Percentages become `1 ± m/100`; absolute magnitudes are the factor itself.
    pub fn factor(&self, direction: Direction) -> f32 {
        if self.percentage {
            (1.0 + direction.sign() * self.magnitude / 100.0).max(0.0)
        } else {
            self.magnitude.max(0.0)
        }
    }
}
