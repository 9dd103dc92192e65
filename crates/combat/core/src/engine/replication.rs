//! Replicated agent fields and dirty tracking.

use bitflags::bitflags;

use crate::ailment::AilmentKind;
use crate::state::{AgentId, CombatAgent};
use crate::status::StatusKind;

bitflags! {
    /// Which replicated fields of an agent changed since the last drain.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ReplicatedFields: u8 {
        const HP             = 1 << 0;
        const STAMINA        = 1 << 1;
        const DEFENSE        = 1 << 2;
        const RAGE           = 1 << 3;
        const AILMENT        = 1 << 4;
        const STATUSES       = 1 << 5;
        const COMBO_COUNTER  = 1 << 6;
    }
}

/// Snapshot of the fields clients mirror for one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicatedAgent {
    pub id: AgentId,
    pub fields: ReplicatedFields,
    pub hp: f32,
    pub stamina: f32,
    pub defense: f32,
    pub rage: f32,
    pub ailment: AilmentKind,
    pub statuses: Vec<StatusKind>,
    pub combo_counter: u32,
}

impl ReplicatedAgent {
    pub fn capture(agent: &CombatAgent, fields: ReplicatedFields) -> Self {
        Self {
            id: agent.id,
            fields,
            hp: agent.vitals.hp.current,
            stamina: agent.vitals.stamina.current,
            defense: agent.vitals.defense.current,
            rage: agent.vitals.rage.current,
            ailment: agent.ailment,
            statuses: agent.statuses.active_kinds().collect(),
            combo_counter: agent.combo_counter,
        }
    }

    /// Writes the flagged fields into a client-side mirror.
    ///
    /// The active-status set is presentation only; mirrors never run timers.
    pub fn apply_to(&self, agent: &mut CombatAgent) {
        if self.fields.contains(ReplicatedFields::HP) {
            agent.vitals.hp.current = self.hp;
        }
        if self.fields.contains(ReplicatedFields::STAMINA) {
            agent.vitals.stamina.current = self.stamina;
        }
        if self.fields.contains(ReplicatedFields::DEFENSE) {
            agent.vitals.defense.current = self.defense;
        }
        if self.fields.contains(ReplicatedFields::RAGE) {
            agent.vitals.rage.current = self.rage;
        }
        if self.fields.contains(ReplicatedFields::AILMENT) {
            agent.ailment = self.ailment;
            agent.ailment_timer = None;
        }
        if self.fields.contains(ReplicatedFields::COMBO_COUNTER) {
            agent.combo_counter = self.combo_counter;
        }
    }
}
