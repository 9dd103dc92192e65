/// Combat tuning constants and tunable parameters.
///
/// Durations are wall-clock milliseconds; [`CombatConfig::ticks`] converts them
/// into simulation steps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Length of one fixed simulation step.
    pub step_millis: u32,

    // ===== hit-stop =====
    /// Freeze-frame window pushed to attacker and victim on a connecting hit.
    pub hit_stop_millis: u32,
    /// Extra activation delay for on-hit statuses so they start after the freeze-frame.
    pub post_hit_stop_status_delay_millis: u32,

    // ===== ailments =====
    pub stun_millis: u32,
    pub knockdown_millis: u32,
    /// Invincibility granted when a knockdown expires.
    pub knockdown_invincibility_millis: u32,
    /// Maximum airtime of a knockup before the victim lands.
    pub knockup_millis: u32,
    /// Hits a knocked-up victim absorbs before being released.
    pub juggle_hit_ceiling: u8,
    /// Invincibility granted on a forced juggle release.
    pub juggle_release_invincibility_millis: u32,

    // ===== mitigation =====
    /// Defense fraction at or above which hits are fully absorbed even without blocking.
    pub full_defense_fraction: f32,
    /// Share of incoming damage converted into defense loss on a fully absorbed hit.
    pub full_defense_absorb_ratio: f32,
    /// Share of incoming damage routed to defense on a partially mitigated hit.
    pub partial_defense_ratio: f32,
    /// Stamina drained per point of damage when blocking without defense.
    pub block_stamina_drain_ratio: f32,
    /// Stamina level under which a guard-broken victim is forced into Stagger.
    pub block_stagger_stamina_threshold: f32,

    // ===== attacker scalars =====
    /// Charge time at which a heavy attack reaches `max_charge_scalar`.
    pub max_charge_millis: u32,
    pub max_charge_scalar: f32,
    pub rage_damage_scalar: f32,
    /// Rage gained per point of damage dealt.
    pub rage_gain_dealt: f32,
    /// Rage gained per point of damage taken.
    pub rage_gain_taken: f32,
    pub rage_duration_millis: u32,

    // ===== combo =====
    /// Move input magnitude needed to satisfy a directional combo condition.
    pub combo_direction_threshold: f32,
    pub reload_millis: u32,

    // ===== regeneration =====
    pub stamina_regen_per_second: f32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Longest attack chain any weapon table may define.
    pub const MAX_COMBO_CHAIN: usize = 8;
    /// Longest per-hit ailment eligibility sequence on an attack.
    pub const MAX_AILMENT_HITS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STEP_MILLIS: u32 = 20;

    pub fn new() -> Self {
        Self {
            step_millis: Self::DEFAULT_STEP_MILLIS,
            hit_stop_millis: 80,
            post_hit_stop_status_delay_millis: 80,
            stun_millis: 2_000,
            knockdown_millis: 2_500,
            knockdown_invincibility_millis: 1_000,
            knockup_millis: 1_500,
            juggle_hit_ceiling: 6,
            juggle_release_invincibility_millis: 500,
            full_defense_fraction: 1.0,
            full_defense_absorb_ratio: 0.5,
            partial_defense_ratio: 0.5,
            block_stamina_drain_ratio: 1.0,
            block_stagger_stamina_threshold: 10.0,
            max_charge_millis: 1_500,
            max_charge_scalar: 2.0,
            rage_damage_scalar: 1.5,
            rage_gain_dealt: 0.1,
            rage_gain_taken: 0.2,
            rage_duration_millis: 8_000,
            combo_direction_threshold: 0.5,
            reload_millis: 1_500,
            stamina_regen_per_second: 15.0,
        }
    }

    pub fn with_step_millis(step_millis: u32) -> Self {
        Self {
            step_millis,
            ..Self::new()
        }
    }

    /// Converts a wall-clock duration into simulation ticks, rounding up so that
    /// any non-zero duration lasts at least one tick.
    pub fn ticks(&self, millis: u32) -> u64 {
        let step = u64::from(self.step_millis.max(1));
        u64::from(millis).div_ceil(step)
    }

    /// Length of one step in seconds (used by per-second rates).
    pub fn step_seconds(&self) -> f32 {
        self.step_millis.max(1) as f32 / 1_000.0
    }

    /// Damage scalar for a heavy attack charged for `charge_millis`.
    pub fn charge_scalar(&self, charge_millis: u32) -> f32 {
        if self.max_charge_millis == 0 {
            return self.max_charge_scalar;
        }
        let progress = charge_millis.min(self.max_charge_millis) as f32 / self.max_charge_millis as f32;
        1.0 + progress * (self.max_charge_scalar - 1.0)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
