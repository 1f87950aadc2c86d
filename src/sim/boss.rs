//! Boss encounter
//!
//! One boss with health, a phase counter driven by HP thresholds and two
//! independent attack cooldowns. Phase changes permanently speed the boss up.
//!
//! States: `Active` → `InTransition` → `Active` (next phase) … → `Dying` →
//! `Destroyed`. Lethal damage pre-empts a running transition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attack::{AttackPattern, ProjectileSpec};
use super::schedule::Scheduler;
use crate::consts::*;

/// Named boss configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossArchetype {
    Tank,
    Speed,
    Mage,
}

/// Fixed stat table for one archetype
#[derive(Debug, Clone, PartialEq)]
pub struct BossStats {
    pub name: &'static str,
    pub max_hp: f32,
    /// Diameter
    pub size: f32,
    pub color: u32,
    pub accent_color: u32,
    /// Seconds between basic attacks
    pub attack_cooldown: f32,
    /// Seconds between special attacks
    pub special_cooldown: f32,
    pub movement_speed: f32,
    pub score: u64,
    pub phase_count: u8,
    pub basic: AttackPattern,
    pub special: AttackPattern,
}

static TANK_STATS: BossStats = BossStats {
    name: "Iron Colossus",
    max_hp: 500.0,
    size: 96.0,
    color: 0x8B4513,
    accent_color: 0xFF6600,
    attack_cooldown: 2.0,
    special_cooldown: 8.0,
    movement_speed: 40.0,
    score: 5000,
    phase_count: 4,
    basic: AttackPattern::RadialSpread {
        base_count: 8,
        per_phase: 2,
        speed: 140.0,
        damage: 1.0,
    },
    special: AttackPattern::HazardSweep {
        lanes: 8,
        speed: 110.0,
        damage: 1.0,
    },
};

static SPEED_STATS: BossStats = BossStats {
    name: "Blitz Runner",
    max_hp: 300.0,
    size: 64.0,
    color: 0x00CED1,
    accent_color: 0xFFFFFF,
    attack_cooldown: 1.2,
    special_cooldown: 5.0,
    movement_speed: 130.0,
    score: 3000,
    phase_count: 2,
    basic: AttackPattern::Burst {
        base_shots: 3,
        per_phase: 2,
        interval: 0.12,
        speed: 220.0,
        damage: 1.0,
    },
    special: AttackPattern::HomingVolley {
        base_count: 3,
        per_phase: 2,
        speed: 160.0,
        turn_rate: 1.5,
        damage: 1.0,
    },
};

static MAGE_STATS: BossStats = BossStats {
    name: "Hex Warden",
    max_hp: 400.0,
    size: 80.0,
    color: 0x8A2BE2,
    accent_color: 0xDA70D6,
    attack_cooldown: 1.5,
    special_cooldown: 6.0,
    movement_speed: 60.0,
    score: 4000,
    phase_count: 4,
    basic: AttackPattern::HomingVolley {
        base_count: 2,
        per_phase: 1,
        speed: 150.0,
        turn_rate: 1.2,
        damage: 1.0,
    },
    special: AttackPattern::SummonMinions {
        base_count: 2,
        per_phase: 1,
        min_phase: 2,
    },
};

impl BossArchetype {
    pub const ALL: [BossArchetype; 3] = [BossArchetype::Tank, BossArchetype::Speed, BossArchetype::Mage];

    pub fn stats(&self) -> &'static BossStats {
        match self {
            BossArchetype::Tank => &TANK_STATS,
            BossArchetype::Speed => &SPEED_STATS,
            BossArchetype::Mage => &MAGE_STATS,
        }
    }
}

/// Encounter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    Active,
    /// Short lockout after a phase change; no movement or attacks
    InTransition,
    /// Death sequence playing
    Dying,
    /// Terminal
    Destroyed,
}

/// Outbound notifications for the host game
#[derive(Debug, Clone, PartialEq)]
pub enum BossEvent {
    Fire(ProjectileSpec),
    Summon { count: u32, origin: Vec2 },
    PhaseChanged { phase: u8 },
    /// Death sequence started
    Died { archetype: BossArchetype },
    /// Death sequence finished; award the score
    Defeated { archetype: BossArchetype, score: u64 },
}

/// Outcome of `Boss::take_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Boss already dying or destroyed
    Ignored,
    Hit,
    /// This hit started the death sequence
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum BossTimer {
    EndTransition,
    Destroy,
    BurstShot(ProjectileSpec),
}

/// The boss entity
#[derive(Debug, Clone)]
pub struct Boss {
    pub archetype: BossArchetype,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    /// 1..=phase_count, never decreases
    pub phase: u8,
    pub state: BossState,
    pub attack_cooldown: f32,
    pub special_cooldown: f32,
    pub movement_speed: f32,
    pub last_attack_at: f32,
    pub last_special_at: f32,
    /// Remaining hit flash time (visual feedback only)
    pub hit_flash: f32,
    /// Patrol direction (+1 right, -1 left)
    dir: f32,
    half_width: f32,
    salvos: u32,
    timers: Scheduler<BossTimer>,
}

impl Boss {
    /// Spawn a boss at `pos`, patrolling a bridge of the given half width
    pub fn spawn(archetype: BossArchetype, pos: Vec2, half_width: f32, now: f32) -> Self {
        let stats = archetype.stats();
        log::info!("Boss spawned: {} ({:?}, {} HP)", stats.name, archetype, stats.max_hp);
        Self {
            archetype,
            pos,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            phase: 1,
            state: BossState::Active,
            attack_cooldown: stats.attack_cooldown,
            special_cooldown: stats.special_cooldown,
            movement_speed: stats.movement_speed,
            last_attack_at: now,
            last_special_at: now,
            hit_flash: 0.0,
            dir: 1.0,
            half_width,
            salvos: 0,
            timers: Scheduler::new(),
        }
    }

    pub fn stats(&self) -> &'static BossStats {
        self.archetype.stats()
    }

    pub fn radius(&self) -> f32 {
        self.stats().size / 2.0
    }

    pub fn is_in_phase_transition(&self) -> bool {
        self.state == BossState::InTransition
    }

    /// Can still be damaged
    pub fn is_alive(&self) -> bool {
        matches!(self.state, BossState::Active | BossState::InTransition)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == BossState::Destroyed
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Phase the current HP calls for. Phase p (2..=P) starts once
    /// hp / max_hp <= 1 - (p - 1) / P.
    pub fn phase_for_hp(&self) -> u8 {
        let count = self.stats().phase_count;
        let p_count = f32::from(count);
        for p in (2..=count).rev() {
            // Cross-multiplied to keep exact thresholds exact
            if self.hp * p_count <= self.max_hp * (p_count - f32::from(p - 1)) {
                return p;
            }
        }
        1
    }

    /// Apply damage, then re-check death and phase thresholds
    pub fn take_damage(&mut self, amount: f32, now: f32, out: &mut Vec<BossEvent>) -> DamageResult {
        if !self.is_alive() || amount.is_nan() || amount <= 0.0 {
            return DamageResult::Ignored;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.hit_flash = BOSS_HIT_FLASH_SECS;

        if self.hp <= 0.0 {
            self.begin_death(now, out);
            return DamageResult::Killed;
        }
        self.check_phase(now, out);
        DamageResult::Hit
    }

    fn check_phase(&mut self, now: f32, out: &mut Vec<BossEvent>) {
        if self.state == BossState::Active && self.phase_for_hp() > self.phase {
            self.transition_to_phase(self.phase + 1, now, out);
        }
    }

    /// Enter phase `next` with its escalation. No-op unless the boss is
    /// active, not transitioning, and `next` is a later valid phase.
    pub fn transition_to_phase(&mut self, next: u8, now: f32, out: &mut Vec<BossEvent>) -> bool {
        if self.state != BossState::Active
            || next <= self.phase
            || next > self.stats().phase_count
        {
            return false;
        }
        self.state = BossState::InTransition;
        self.phase = next;
        self.attack_cooldown *= PHASE_ATTACK_COOLDOWN_MULT;
        self.special_cooldown *= PHASE_SPECIAL_COOLDOWN_MULT;
        self.movement_speed *= PHASE_MOVEMENT_SPEED_MULT;
        self.timers.schedule(now + PHASE_TRANSITION_SECS, BossTimer::EndTransition);
        log::info!(
            "{} enters phase {} ({:.0}/{:.0} HP)",
            self.stats().name,
            next,
            self.hp,
            self.max_hp
        );
        out.push(BossEvent::PhaseChanged { phase: next });
        true
    }

    fn begin_death(&mut self, now: f32, out: &mut Vec<BossEvent>) {
        self.state = BossState::Dying;
        // Pending follow-ups and transition ends no longer apply
        self.timers.clear();
        self.timers.schedule(now + BOSS_DEATH_SECS, BossTimer::Destroy);
        log::info!("{} defeated, death sequence started", self.stats().name);
        out.push(BossEvent::Died {
            archetype: self.archetype,
        });
    }

    /// Per-tick update: timers, movement and attack cadence
    pub fn update(&mut self, now: f32, dt: f32, target: Vec2, out: &mut Vec<BossEvent>) {
        for timer in self.timers.drain_due(now) {
            match timer {
                BossTimer::EndTransition => {
                    if self.state == BossState::InTransition {
                        self.state = BossState::Active;
                        // Several thresholds may have been crossed at once
                        self.check_phase(now, out);
                    }
                }
                BossTimer::BurstShot(spec) => {
                    if self.state == BossState::Active {
                        out.push(BossEvent::Fire(spec));
                    }
                }
                BossTimer::Destroy => {
                    if self.state == BossState::Dying {
                        self.state = BossState::Destroyed;
                        out.push(BossEvent::Defeated {
                            archetype: self.archetype,
                            score: self.stats().score,
                        });
                    }
                }
            }
        }

        self.hit_flash = (self.hit_flash - dt).max(0.0);

        if self.state != BossState::Active {
            return;
        }

        self.patrol(dt);

        if now >= self.last_attack_at + self.attack_cooldown {
            self.last_attack_at = now;
            let pattern = self.stats().basic;
            self.fire(pattern, now, target, out);
        }
        if now >= self.last_special_at + self.special_cooldown {
            self.last_special_at = now;
            let pattern = self.stats().special;
            self.fire(pattern, now, target, out);
        }
    }

    fn patrol(&mut self, dt: f32) {
        let limit = (self.half_width - self.radius()).max(0.0);
        self.pos.x += self.dir * self.movement_speed * dt;
        if self.pos.x > limit {
            self.pos.x = limit;
            self.dir = -1.0;
        } else if self.pos.x < -limit {
            self.pos.x = -limit;
            self.dir = 1.0;
        }
    }

    fn fire(&mut self, pattern: AttackPattern, now: f32, target: Vec2, out: &mut Vec<BossEvent>) {
        let volley = pattern.volley(self.phase, self.pos, target, self.half_width, self.salvos);
        self.salvos += 1;
        out.extend(volley.shots.into_iter().map(BossEvent::Fire));
        for (delay, spec) in volley.delayed {
            self.timers.schedule(now + delay, BossTimer::BurstShot(spec));
        }
        if volley.summon > 0 {
            out.push(BossEvent::Summon {
                count: volley.summon,
                origin: self.pos,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Vec2 = Vec2::new(0.0, -300.0);

    fn boss(archetype: BossArchetype) -> Boss {
        Boss::spawn(archetype, Vec2::ZERO, 180.0, 0.0)
    }

    fn count_fire(events: &[BossEvent]) -> usize {
        events.iter().filter(|e| matches!(e, BossEvent::Fire(_))).count()
    }

    #[test]
    fn test_four_phase_thresholds() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        let mut now = 0.0;

        b.take_damage(124.0, now, &mut out);
        assert_eq!(b.phase, 1);

        // 375 HP = 75%
        b.take_damage(1.0, now, &mut out);
        assert_eq!(b.hp, 375.0);
        assert_eq!(b.phase, 2);
        assert!(b.is_in_phase_transition());

        now += 0.6;
        b.update(now, 0.6, TARGET, &mut out);
        assert_eq!(b.state, BossState::Active);

        b.take_damage(124.0, now, &mut out);
        assert_eq!(b.phase, 2);
        b.take_damage(1.0, now, &mut out);
        assert_eq!(b.phase, 3);

        now += 0.6;
        b.update(now, 0.6, TARGET, &mut out);
        b.take_damage(125.0, now, &mut out);
        assert_eq!(b.hp, 125.0);
        assert_eq!(b.phase, 4);

        let changes: Vec<u8> = out
            .iter()
            .filter_map(|e| match e {
                BossEvent::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![2, 3, 4]);
    }

    #[test]
    fn test_two_phase_threshold() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        b.take_damage(149.0, 0.0, &mut out);
        assert_eq!(b.phase, 1);
        b.take_damage(1.0, 0.0, &mut out);
        assert_eq!(b.phase, 2);
        b.update(1.0, 1.0, TARGET, &mut out);
        b.take_damage(100.0, 1.0, &mut out);
        assert_eq!(b.phase, 2);
    }

    #[test]
    fn test_phase_never_regresses() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        b.take_damage(260.0, 0.0, &mut out);
        b.update(1.0, 0.1, TARGET, &mut out);
        b.update(2.0, 0.1, TARGET, &mut out);
        assert_eq!(b.phase, 3);

        b.hp = b.max_hp;
        b.update(3.0, 0.1, TARGET, &mut out);
        b.take_damage(1.0, 3.0, &mut out);
        assert_eq!(b.phase, 3);
    }

    #[test]
    fn test_multi_threshold_hit_steps_one_phase_at_a_time() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        // 500 -> 200: crosses 75% and 50%
        b.take_damage(300.0, 0.0, &mut out);
        assert_eq!(b.phase, 2);
        b.update(0.5, 0.5, TARGET, &mut out);
        assert_eq!(b.phase, 3);
        assert!(b.is_in_phase_transition());
        b.update(1.0, 0.5, TARGET, &mut out);
        assert_eq!(b.phase, 3);
        assert_eq!(b.state, BossState::Active);
    }

    #[test]
    fn test_transition_is_idempotent_while_transitioning() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        assert!(b.transition_to_phase(2, 0.0, &mut out));
        assert!(!b.transition_to_phase(3, 0.0, &mut out));
        assert_eq!(b.phase, 2);
        // Backwards or out-of-range requests are refused too
        b.update(1.0, 0.1, TARGET, &mut out);
        assert!(!b.transition_to_phase(2, 1.0, &mut out));
        assert!(!b.transition_to_phase(5, 1.0, &mut out));
    }

    #[test]
    fn test_escalation_compounds() {
        let mut b = boss(BossArchetype::Tank);
        let stats = b.stats();
        let mut out = Vec::new();
        b.transition_to_phase(2, 0.0, &mut out);
        b.update(1.0, 0.1, TARGET, &mut out);
        b.transition_to_phase(3, 1.0, &mut out);

        assert!((b.attack_cooldown - stats.attack_cooldown * 0.85 * 0.85).abs() < 1e-5);
        assert!((b.special_cooldown - stats.special_cooldown * 0.9 * 0.9).abs() < 1e-5);
        assert!((b.movement_speed - stats.movement_speed * 1.2 * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_damage_is_ignored() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        for amount in [f32::NAN, 0.0, -50.0] {
            assert_eq!(b.take_damage(amount, 0.0, &mut out), DamageResult::Ignored);
        }
        assert_eq!(b.hp, b.max_hp);
        assert_eq!(b.state, BossState::Active);
        assert_eq!(b.hit_flash, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_overkill_clamps_and_dies_once() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        b.hp = 10.0;
        assert_eq!(b.take_damage(15.0, 0.0, &mut out), DamageResult::Killed);
        assert_eq!(b.hp, 0.0);
        assert_eq!(b.state, BossState::Dying);
        assert_eq!(b.take_damage(15.0, 0.1, &mut out), DamageResult::Ignored);

        b.update(1.0, 0.1, TARGET, &mut out);
        assert_eq!(b.state, BossState::Dying);
        b.update(2.0, 0.1, TARGET, &mut out);
        assert!(b.is_destroyed());
        b.update(5.0, 0.1, TARGET, &mut out);
        assert_eq!(b.take_damage(15.0, 5.0, &mut out), DamageResult::Ignored);

        let died = out.iter().filter(|e| matches!(e, BossEvent::Died { .. })).count();
        let defeated: Vec<&BossEvent> = out
            .iter()
            .filter(|e| matches!(e, BossEvent::Defeated { .. }))
            .collect();
        assert_eq!(died, 1);
        assert_eq!(
            defeated,
            vec![&BossEvent::Defeated {
                archetype: BossArchetype::Speed,
                score: 3000
            }]
        );
    }

    #[test]
    fn test_death_preempts_transition() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        b.take_damage(130.0, 0.0, &mut out);
        assert!(b.is_in_phase_transition());
        assert_eq!(b.take_damage(1000.0, 0.1, &mut out), DamageResult::Killed);
        assert_eq!(b.state, BossState::Dying);
        // The pending end-of-transition must not revive the boss
        b.update(0.6, 0.5, TARGET, &mut out);
        assert_eq!(b.state, BossState::Dying);
        b.update(2.2, 0.1, TARGET, &mut out);
        assert!(b.is_destroyed());
    }

    #[test]
    fn test_basic_attack_cadence() {
        let mut b = boss(BossArchetype::Tank);
        let mut out = Vec::new();
        b.update(1.9, 0.1, TARGET, &mut out);
        assert_eq!(count_fire(&out), 0);
        b.update(2.0, 0.1, TARGET, &mut out);
        assert_eq!(count_fire(&out), 8);
        out.clear();
        b.update(2.1, 0.1, TARGET, &mut out);
        assert_eq!(count_fire(&out), 0);
    }

    #[test]
    fn test_burst_follow_ups_fire_later() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        b.update(1.2, 0.1, TARGET, &mut out);
        assert_eq!(count_fire(&out), 1);
        b.update(1.33, 0.13, TARGET, &mut out);
        assert_eq!(count_fire(&out), 2);
        b.update(1.45, 0.12, TARGET, &mut out);
        assert_eq!(count_fire(&out), 3);
    }

    #[test]
    fn test_burst_cancelled_by_transition() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        b.update(1.2, 0.1, TARGET, &mut out);
        b.transition_to_phase(2, 1.2, &mut out);
        b.update(1.5, 0.3, TARGET, &mut out);
        assert_eq!(count_fire(&out), 1);
    }

    #[test]
    fn test_summon_only_from_phase_two() {
        let mut b = boss(BossArchetype::Mage);
        let mut out = Vec::new();
        b.update(6.0, 0.1, TARGET, &mut out);
        assert!(!out.iter().any(|e| matches!(e, BossEvent::Summon { .. })));

        b.transition_to_phase(2, 6.0, &mut out);
        b.update(7.0, 0.1, TARGET, &mut out);
        // Special cooldown shrank to 5.4s; next special just after 11.4
        b.update(11.5, 0.1, TARGET, &mut out);
        assert!(out.contains(&BossEvent::Summon {
            count: 2,
            origin: b.pos
        }));
    }

    #[test]
    fn test_frozen_during_transition() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        b.transition_to_phase(2, 0.0, &mut out);
        let pos = b.pos;
        b.update(0.1, 0.1, TARGET, &mut out);
        b.update(0.2, 0.1, TARGET, &mut out);
        assert_eq!(b.pos, pos);
        b.update(0.6, 0.1, TARGET, &mut out);
        b.update(0.7, 0.1, TARGET, &mut out);
        assert_ne!(b.pos, pos);
    }

    #[test]
    fn test_patrol_stays_on_bridge() {
        let mut b = boss(BossArchetype::Speed);
        let mut out = Vec::new();
        let limit = 180.0 - b.radius();
        for i in 1..2000 {
            b.update(i as f32 * SIM_DT, SIM_DT, TARGET, &mut out);
            assert!(b.pos.x.abs() <= limit + 1e-3);
        }
    }

    #[test]
    fn test_phase_counts_match_archetypes() {
        assert_eq!(BossArchetype::Tank.stats().phase_count, 4);
        assert_eq!(BossArchetype::Speed.stats().phase_count, 2);
        assert_eq!(BossArchetype::Mage.stats().phase_count, 4);
    }
}
