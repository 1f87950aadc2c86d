//! Boss attack patterns
//!
//! Patterns are data. `AttackPattern::volley` expands a pattern into concrete
//! projectiles for the boss's current phase; it has no side effects.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision radius of boss projectiles
pub const BOSS_PROJECTILE_RADIUS: f32 = 8.0;
/// Angle between neighbouring shots of an aimed fan (radians)
const FAN_SPREAD: f32 = 0.25;
/// Rotation applied to each successive radial salvo (radians)
const RADIAL_SALVO_TWIST: f32 = 0.17;

/// A projectile the boss wants fired
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Turn rate toward the squad (radians/s); 0 flies straight
    pub homing: f32,
}

/// Named attack pattern, parameterised by phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Full circle of shots; grows by `per_phase` each phase
    RadialSpread {
        base_count: u32,
        per_phase: u32,
        speed: f32,
        damage: f32,
    },
    /// Aimed shots fired one after another, `interval` seconds apart
    Burst {
        base_shots: u32,
        per_phase: u32,
        interval: f32,
        speed: f32,
        damage: f32,
    },
    /// Fan of homing shots aimed at the squad
    HomingVolley {
        base_count: u32,
        per_phase: u32,
        speed: f32,
        turn_rate: f32,
        damage: f32,
    },
    /// Wall of shots spanning the bridge with one open lane
    HazardSweep { lanes: u32, speed: f32, damage: f32 },
    /// Minion spawn, only from `min_phase` on
    SummonMinions {
        base_count: u32,
        per_phase: u32,
        min_phase: u8,
    },
}

/// Concrete output of one attack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volley {
    /// Fired immediately
    pub shots: Vec<ProjectileSpec>,
    /// Fired after the given delay (seconds)
    pub delayed: Vec<(f32, ProjectileSpec)>,
    /// Minions to summon
    pub summon: u32,
}

fn scaled(base: u32, per_phase: u32, phase: u8) -> u32 {
    base + per_phase * u32::from(phase.saturating_sub(1))
}

fn aim(origin: Vec2, target: Vec2) -> Vec2 {
    let dir = (target - origin).normalize_or_zero();
    if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir }
}

impl AttackPattern {
    /// Expand into projectiles. `salvo` counts previous attacks and varies
    /// rotation and gap placement deterministically.
    pub fn volley(
        &self,
        phase: u8,
        origin: Vec2,
        target: Vec2,
        half_width: f32,
        salvo: u32,
    ) -> Volley {
        let mut volley = Volley::default();
        match *self {
            AttackPattern::RadialSpread {
                base_count,
                per_phase,
                speed,
                damage,
            } => {
                let count = scaled(base_count, per_phase, phase);
                let twist = salvo as f32 * RADIAL_SALVO_TWIST;
                for i in 0..count {
                    let theta = twist + TAU * i as f32 / count as f32;
                    volley.shots.push(ProjectileSpec {
                        origin,
                        vel: Vec2::from_angle(theta) * speed,
                        radius: BOSS_PROJECTILE_RADIUS,
                        damage,
                        homing: 0.0,
                    });
                }
            }
            AttackPattern::Burst {
                base_shots,
                per_phase,
                interval,
                speed,
                damage,
            } => {
                let shot = ProjectileSpec {
                    origin,
                    vel: aim(origin, target) * speed,
                    radius: BOSS_PROJECTILE_RADIUS,
                    damage,
                    homing: 0.0,
                };
                let count = scaled(base_shots, per_phase, phase);
                for i in 0..count {
                    if i == 0 {
                        volley.shots.push(shot);
                    } else {
                        volley.delayed.push((interval * i as f32, shot));
                    }
                }
            }
            AttackPattern::HomingVolley {
                base_count,
                per_phase,
                speed,
                turn_rate,
                damage,
            } => {
                let count = scaled(base_count, per_phase, phase);
                let center = aim(origin, target).to_angle();
                let start = center - FAN_SPREAD * (count.saturating_sub(1)) as f32 / 2.0;
                for i in 0..count {
                    volley.shots.push(ProjectileSpec {
                        origin,
                        vel: Vec2::from_angle(start + FAN_SPREAD * i as f32) * speed,
                        radius: BOSS_PROJECTILE_RADIUS,
                        damage,
                        homing: turn_rate,
                    });
                }
            }
            AttackPattern::HazardSweep {
                lanes,
                speed,
                damage,
            } => {
                if lanes == 0 {
                    return volley;
                }
                let lane_width = 2.0 * half_width / lanes as f32;
                let gap = salvo % lanes;
                for lane in (0..lanes).filter(|&l| l != gap) {
                    let x = -half_width + (lane as f32 + 0.5) * lane_width;
                    volley.shots.push(ProjectileSpec {
                        origin: Vec2::new(x, origin.y),
                        vel: Vec2::new(0.0, -speed),
                        radius: BOSS_PROJECTILE_RADIUS,
                        damage,
                        homing: 0.0,
                    });
                }
            }
            AttackPattern::SummonMinions {
                base_count,
                per_phase,
                min_phase,
            } => {
                if phase >= min_phase {
                    volley.summon =
                        scaled(base_count, per_phase, phase - min_phase.saturating_sub(1));
                }
            }
        }
        volley
    }
}
