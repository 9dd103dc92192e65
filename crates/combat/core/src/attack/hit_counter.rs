use std::collections::BTreeMap;

use super::definition::AttackId;
use crate::state::{AgentId, Tick};

/// Hits one victim has taken from the current attack instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitCounterEntry {
    pub hits: u32,
    pub last_hit: Tick,
}

/// Per-attack-instance record of victims hit.
///
/// Shared by every hitbox of one attack (weapon sub-parts, multi-part swings)
/// and reset whenever its owner starts a new attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitCounter {
    owner: AgentId,
    attack: Option<AttackId>,
    entries: BTreeMap<AgentId, HitCounterEntry>,
}

impl HitCounter {
    pub fn new(owner: AgentId) -> Self {
        Self {
            owner,
            attack: None,
            entries: BTreeMap::new(),
        }
    }

    /// Counter for a fresh instance of `attack`, e.g. a newly fired projectile.
    pub fn for_attack(owner: AgentId, attack: AttackId) -> Self {
        Self {
            attack: Some(attack),
            ..Self::new(owner)
        }
    }

    pub fn owner(&self) -> AgentId {
        self.owner
    }

    pub fn attack(&self) -> Option<AttackId> {
        self.attack
    }

    /// Starts a new attack instance; every victim may be hit again.
    pub fn reset(&mut self, attack: AttackId) {
        self.attack = Some(attack);
        self.entries.clear();
    }

    pub fn entry(&self, victim: AgentId) -> Option<&HitCounterEntry> {
        self.entries.get(&victim)
    }

    pub fn hits(&self, victim: AgentId) -> u32 {
        self.entries.get(&victim).map_or(0, |entry| entry.hits)
    }

    /// Whether another hit on `victim` is allowed at `now`.
    pub fn allows(
        &self,
        victim: AgentId,
        now: Tick,
        hit_limit: u8,
        min_interval_ticks: u64,
    ) -> bool {
        match self.entries.get(&victim) {
            None => hit_limit > 0,
            Some(entry) => {
                entry.hits < u32::from(hit_limit)
                    && now.since(entry.last_hit) >= min_interval_ticks
            }
        }
    }

    /// Records a hit and returns the 1-based hit number on this victim.
    pub fn register(&mut self, victim: AgentId, now: Tick) -> u32 {
        let entry = self.entries.entry(victim).or_insert(HitCounterEntry {
            hits: 0,
            last_hit: now,
        });
        entry.hits += 1;
        entry.last_hit = now;
        entry.hits
    }

    pub fn victims(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.entries.keys().copied()
    }
}
