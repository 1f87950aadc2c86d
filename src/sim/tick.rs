//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within one tick
//! the squad moves first, then everything that reads the squad's position.

use glam::Vec2;
use rand::Rng;

use super::boss::{BossArchetype, BossEvent, DamageResult};
use super::pool::{Faction, Gate, Obstacle, ObstacleKind, Projectile};
use super::state::{GameEvent, GamePhase, GameState};

/// Content behind the squad by more than this is recycled
const CULL_BEHIND: f32 = 300.0;
/// Obstacles are not placed within this distance of a gate line
const GATE_CLEARANCE: f32 = 60.0;
/// Horizontal spacing between summoned minions
const MINION_SPACING: f32 = 40.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired horizontal squad offset (from pointer/touch position)
    pub steer_x: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI steers the squad
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Advancing | GamePhase::BossFight => {
                state.resume_phase = state.phase;
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                state.phase = state.resume_phase;
            }
            _ => {}
        }
    }

    // Don't tick if paused or the run is over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => return,
        _ => {}
    }

    let steer_x = if input.idle_mode {
        Some(autopilot_steer(state))
    } else {
        input.steer_x
    };
    if let Some(x) = steer_x {
        state.squad.set_steering_target(x);
    }

    state.time_ticks += 1;
    // Derived from the tick count so long runs don't accumulate rounding
    state.clock = (state.time_ticks as f64 * f64::from(dt)) as f32;
    let now = state.clock;

    // Squad first: everything below reads its positions
    state.squad.update(dt);
    let centroid = state.squad.centroid();

    if state.phase == GamePhase::Advancing {
        generate_course(state);
        if state.squad.anchor.y >= state.tuning.course.course_length && state.boss.is_none() {
            let archetype = match state.tuning.course.boss {
                Some(archetype) => archetype,
                None => BossArchetype::ALL[state.rng.random_range(0..BossArchetype::ALL.len())],
            };
            state.spawn_boss(archetype);
        }
    }

    update_gates(state, centroid);
    squad_fire(state, dt);

    let mut boss_events = Vec::new();
    update_bullets(state, dt, now, &mut boss_events);
    update_obstacles(state, dt, centroid);

    if let Some(boss) = state.boss.as_mut() {
        boss.update(now, dt, centroid, &mut boss_events);
    }
    handle_boss_events(state, boss_events);

    update_enemy_shots(state, dt, centroid);
}

/// Steering used in idle mode: take the best gate ahead, otherwise line up
/// under the boss, otherwise hold the centre.
fn autopilot_steer(state: &GameState) -> f32 {
    let anchor_y = state.squad.anchor.y;
    let next_gate = state
        .gates
        .iter_active()
        .filter(|g| g.y > anchor_y)
        .min_by(|a, b| {
            (a.y, -a.delta)
                .partial_cmp(&(b.y, -b.delta))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(gate) = next_gate {
        return (gate.x_min + gate.x_max) / 2.0;
    }
    if let Some(boss) = state.boss.as_ref().filter(|b| b.is_alive()) {
        return boss.pos.x;
    }
    0.0
}

/// Place gates and obstacles up to the lookahead distance
pub fn generate_course(state: &mut GameState) {
    let course = state.tuning.course.clone();
    let horizon = (state.squad.anchor.y + course.spawn_lookahead).min(course.course_length);
    let hw = course.bridge_half_width;

    while course.gate_interval > 0.0 && state.next_gate_y <= horizon {
        let y = state.next_gate_y;
        state.next_gate_y += course.gate_interval;

        let bonus = state.rng.random_range(course.gate_bonus_min..=course.gate_bonus_max);
        let penalty = -state.rng.random_range(course.gate_penalty_min..=course.gate_penalty_max);
        let (left, right) = if state.rng.random_bool(0.5) {
            (bonus, penalty)
        } else {
            (penalty, bonus)
        };
        let pair_id = state.next_pair_id;
        state.next_pair_id += 1;

        for (x_min, x_max, delta) in [(-hw, 0.0, left), (0.0, hw, right)] {
            state.gates.spawn(Gate {
                active: true,
                y,
                x_min,
                x_max,
                delta,
                pair_id,
            });
        }
        log::debug!("Gate pair {} at {:.0}: {:+} | {:+}", pair_id, y, left, right);
    }

    while course.obstacle_interval > 0.0 && state.next_obstacle_y <= horizon {
        let y = state.next_obstacle_y;
        state.next_obstacle_y += course.obstacle_interval;

        if course.gate_interval > 0.0 {
            let phase = y.rem_euclid(course.gate_interval);
            if phase.min(course.gate_interval - phase) < GATE_CLEARANCE {
                continue;
            }
        }

        let r = course.obstacle_radius;
        let x = state.rng.random_range((-hw + r)..(hw - r));
        let hp = state.rng.random_range(course.obstacle_hp_min..=course.obstacle_hp_max) as f32;
        state.obstacles.spawn(Obstacle {
            active: true,
            kind: ObstacleKind::Barrel,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: r,
            hp,
            max_hp: hp,
        });
    }
}

/// Apply the gate the squad passes through; each pair triggers once
fn update_gates(state: &mut GameState, centroid: Vec2) {
    let anchor_y = state.squad.anchor.y;
    let hw = state.tuning.course.bridge_half_width;
    let lane_x = centroid.x.clamp(-hw, hw - 1e-3);

    let mut crossed = Vec::new();
    for gate in state.gates.iter_active_mut() {
        if gate.y < anchor_y - CULL_BEHIND {
            gate.active = false;
        } else if gate.y <= anchor_y && gate.contains_x(lane_x) {
            crossed.push((gate.pair_id, gate.delta));
        }
    }

    for (pair_id, delta) in crossed {
        for gate in state.gates.iter_active_mut().filter(|g| g.pair_id == pair_id) {
            gate.active = false;
        }
        log::debug!("Gate passed: {:+}", delta);
        state.events.push(GameEvent::GatePassed { delta });
        let change = if delta >= 0 {
            state.squad.add_members(delta as usize)
        } else {
            state.squad.remove_members(delta.unsigned_abs() as usize)
        };
        state.apply_squad_change(change);
    }
}

/// Every member fires one bullet straight ahead per volley
fn squad_fire(state: &mut GameState, dt: f32) {
    let combat = &state.tuning.combat;
    state.fire_timer -= dt;
    if state.fire_timer > 0.0 {
        return;
    }
    state.fire_timer += combat.fire_interval.max(dt);

    let offset = Vec2::new(0.0, state.squad.member_radius);
    for member in state.squad.members() {
        let spawned = state.bullets.spawn(Projectile {
            active: true,
            faction: Faction::Squad,
            pos: member.pos + offset,
            vel: Vec2::new(0.0, combat.bullet_speed),
            radius: combat.bullet_radius,
            damage: combat.bullet_damage,
            homing: 0.0,
            ttl: combat.bullet_ttl,
        });
        if spawned.is_none() {
            // Pool exhausted, the rest of this volley is dropped
            break;
        }
    }
}

/// Move squad bullets and resolve hits on obstacles and the boss
fn update_bullets(state: &mut GameState, dt: f32, now: f32, boss_events: &mut Vec<BossEvent>) {
    let GameState {
        bullets,
        obstacles,
        boss,
        events,
        score,
        ..
    } = state;

    for bullet in bullets.iter_active_mut() {
        bullet.advance(dt, Vec2::ZERO);
        if !bullet.active {
            continue;
        }

        for obstacle in obstacles.iter_active_mut() {
            let reach = bullet.radius + obstacle.radius;
            if bullet.pos.distance_squared(obstacle.pos) < reach * reach {
                bullet.active = false;
                if obstacle.hit(bullet.damage) {
                    *score += obstacle.max_hp as u64 * 10;
                    events.push(GameEvent::ObstacleDestroyed {
                        kind: obstacle.kind,
                        pos: obstacle.pos,
                    });
                }
                break;
            }
        }
        if !bullet.active {
            continue;
        }

        if let Some(boss) = boss.as_mut().filter(|b| b.is_alive()) {
            let reach = bullet.radius + boss.radius();
            if bullet.pos.distance_squared(boss.pos) < reach * reach {
                bullet.active = false;
                if boss.take_damage(bullet.damage, now, boss_events) == DamageResult::Killed {
                    log::debug!("Killing blow at {:.2}s", now);
                }
            }
        }
    }
}

/// Steer minions, cull passed obstacles and resolve contact with members
fn update_obstacles(state: &mut GameState, dt: f32, centroid: Vec2) {
    let anchor_y = state.squad.anchor.y;
    let minion_speed = state.tuning.combat.minion_speed;
    let member_radius = state.squad.member_radius;

    let mut lost = Vec::new();
    for obstacle in state.obstacles.iter_active_mut() {
        if obstacle.kind == ObstacleKind::Minion {
            obstacle.vel = (centroid - obstacle.pos).normalize_or_zero() * minion_speed;
            obstacle.pos += obstacle.vel * dt;
        }
        if obstacle.pos.y < anchor_y - CULL_BEHIND {
            obstacle.active = false;
            continue;
        }
        let reach = member_radius + obstacle.radius;
        if let Some(member) = state
            .squad
            .members()
            .iter()
            .find(|m| m.pos.distance_squared(obstacle.pos) < reach * reach)
        {
            // Contact costs the member and absorbs the obstacle
            obstacle.active = false;
            lost.push((member.id, member.pos));
        }
    }

    remove_members(state, lost);
}

/// Move boss projectiles and resolve hits on members
fn update_enemy_shots(state: &mut GameState, dt: f32, centroid: Vec2) {
    let anchor_y = state.squad.anchor.y;
    let member_radius = state.squad.member_radius;

    let mut lost = Vec::new();
    for shot in state.enemy_shots.iter_active_mut() {
        shot.advance(dt, centroid);
        if !shot.active {
            continue;
        }
        if shot.pos.y < anchor_y - CULL_BEHIND {
            shot.active = false;
            continue;
        }
        let reach = member_radius + shot.radius;
        // A member already hit this tick can't absorb a second shot
        if let Some(member) = state.squad.members().iter().find(|m| {
            !lost.iter().any(|&(id, _)| id == m.id)
                && m.pos.distance_squared(shot.pos) < reach * reach
        }) {
            shot.active = false;
            lost.push((member.id, member.pos));
        }
    }

    remove_members(state, lost);
}

fn remove_members(state: &mut GameState, lost: Vec<(u32, Vec2)>) {
    for (id, pos) in lost {
        let change = state.squad.remove_member(id);
        if change != super::squad::SquadChange::Unchanged {
            state.events.push(GameEvent::MemberLost { id, pos });
        }
        state.apply_squad_change(change);
    }
}

/// Route boss output into pools, score and game events
pub(crate) fn handle_boss_events(state: &mut GameState, boss_events: Vec<BossEvent>) {
    for event in boss_events {
        match event {
            BossEvent::Fire(spec) => {
                state.enemy_shots.spawn(Projectile {
                    active: true,
                    faction: Faction::Boss,
                    pos: spec.origin,
                    vel: spec.vel,
                    radius: spec.radius,
                    damage: spec.damage,
                    homing: spec.homing,
                    ttl: state.tuning.combat.enemy_projectile_ttl,
                });
            }
            BossEvent::Summon { count, origin } => {
                spawn_minions(state, count, origin);
                state.events.push(GameEvent::MinionsSummoned { count });
            }
            BossEvent::PhaseChanged { phase } => {
                state.events.push(GameEvent::BossPhaseChanged { phase });
            }
            BossEvent::Died { archetype } => {
                state.events.push(GameEvent::BossDied { archetype });
            }
            BossEvent::Defeated { archetype, score } => {
                state.score += score;
                state.events.push(GameEvent::BossDefeated { archetype, score });
                if state.phase != GamePhase::GameOver {
                    log::info!("Victory! Final score {}", state.score);
                    state.phase = GamePhase::Victory;
                }
            }
        }
    }
}

fn spawn_minions(state: &mut GameState, count: u32, origin: Vec2) {
    let combat = &state.tuning.combat;
    let boss_radius = state.boss.as_ref().map_or(0.0, |b| b.radius());
    let hp = combat.minion_hp as f32;
    for i in 0..count {
        let x = origin.x + (i as f32 - count.saturating_sub(1) as f32 / 2.0) * MINION_SPACING;
        state.obstacles.spawn(Obstacle {
            active: true,
            kind: ObstacleKind::Minion,
            pos: Vec2::new(x, origin.y - boss_radius - MINION_SPACING),
            vel: Vec2::ZERO,
            radius: state.tuning.course.obstacle_radius * 0.75,
            hp,
            max_hp: hp,
        });
    }
}
