//! Game state and core simulation types
//!
//! `GameState` is the explicit context object for a run: tuning, squad, boss,
//! pools, RNG and the outbound event queue all live here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossArchetype, BossState};
use super::pool::{Gate, Obstacle, ObstacleKind, Pool, Projectile};
use super::squad::{Squad, SquadChange, SquadMember};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Squad runs the course: gates and obstacles
    Advancing,
    /// Boss on the bridge, squad holds position
    BossFight,
    /// Game is paused
    Paused,
    /// Boss defeated
    Victory,
    /// Squad eliminated
    GameOver,
}

/// Outbound notifications, drained by the host once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Squad size changed (HUD)
    MemberCountChanged { count: usize },
    /// A member was killed at `pos`
    MemberLost { id: u32, pos: Vec2 },
    /// Squad dropped to zero (game over flow)
    SquadEliminated,
    GatePassed { delta: i32 },
    ObstacleDestroyed { kind: ObstacleKind, pos: Vec2 },
    BossSpawned { archetype: BossArchetype },
    BossPhaseChanged { phase: u8 },
    MinionsSummoned { count: u32 },
    /// Death sequence started
    BossDied { archetype: BossArchetype },
    /// Death sequence finished (victory flow)
    BossDefeated { archetype: BossArchetype, score: u64 },
}

/// Complete game state (deterministic for a given seed, tuning and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock (seconds)
    pub clock: f32,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub(crate) resume_phase: GamePhase,
    pub score: u64,
    pub squad: Squad,
    pub boss: Option<Boss>,
    /// Squad bullets
    pub bullets: Pool<Projectile>,
    /// Boss projectiles
    pub enemy_shots: Pool<Projectile>,
    pub obstacles: Pool<Obstacle>,
    pub gates: Pool<Gate>,
    /// Pending outbound events
    pub events: Vec<GameEvent>,
    /// Course generation cursors (world y)
    pub(crate) next_gate_y: f32,
    pub(crate) next_obstacle_y: f32,
    pub(crate) next_pair_id: u32,
    /// Seconds until the next squad volley
    pub(crate) fire_timer: f32,
}

impl GameState {
    /// Create a new run with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut squad = Squad::new(&tuning.formation, Vec2::ZERO);
        squad.forward_speed = tuning.course.forward_speed;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            clock: 0.0,
            phase: GamePhase::Advancing,
            resume_phase: GamePhase::Advancing,
            score: 0,
            squad,
            boss: None,
            bullets: Pool::with_capacity(tuning.combat.player_bullet_pool),
            enemy_shots: Pool::with_capacity(tuning.combat.enemy_projectile_pool),
            obstacles: Pool::with_capacity(tuning.combat.obstacle_pool),
            gates: Pool::with_capacity(tuning.combat.gate_pool),
            events: Vec::new(),
            next_gate_y: tuning.course.gate_interval,
            next_obstacle_y: tuning.course.obstacle_interval * 0.5,
            next_pair_id: 1,
            fire_timer: tuning.combat.fire_interval,
            tuning,
        };

        let change = state.squad.set_member_count(state.tuning.course.start_members);
        state.apply_squad_change(change);
        state
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Set the squad size directly (pickups, debug, host scripting)
    pub fn set_member_count(&mut self, n: usize) {
        let change = self.squad.set_member_count(n);
        self.apply_squad_change(change);
    }

    /// Translate a squad membership change into events and game phase
    pub(crate) fn apply_squad_change(&mut self, change: SquadChange) {
        match change {
            SquadChange::Unchanged => {}
            SquadChange::Changed { to, .. } => {
                self.events.push(GameEvent::MemberCountChanged { count: to });
            }
            SquadChange::Eliminated => {
                self.events.push(GameEvent::MemberCountChanged { count: 0 });
                self.events.push(GameEvent::SquadEliminated);
                if !matches!(self.phase, GamePhase::Victory | GamePhase::GameOver) {
                    log::info!("Game over at distance {:.0}, score {}", self.squad.anchor.y, self.score);
                    self.phase = GamePhase::GameOver;
                }
            }
        }
    }

    /// Start the boss encounter. Returns false if a boss is already on the
    /// bridge or the run is over.
    pub fn spawn_boss(&mut self, archetype: BossArchetype) -> bool {
        if self.boss.as_ref().is_some_and(|b| !b.is_destroyed()) {
            return false;
        }
        if matches!(self.phase, GamePhase::Victory | GamePhase::GameOver) {
            return false;
        }
        let pos = Vec2::new(0.0, self.squad.anchor.y + self.tuning.course.boss_distance);
        self.boss = Some(Boss::spawn(
            archetype,
            pos,
            self.tuning.course.bridge_half_width,
            self.clock,
        ));
        self.squad.forward_speed = 0.0;
        if self.phase == GamePhase::Paused {
            self.resume_phase = GamePhase::BossFight;
        } else {
            self.phase = GamePhase::BossFight;
        }
        self.events.push(GameEvent::BossSpawned { archetype });
        true
    }

    /// Damage the boss directly (host-side hits, debug)
    pub fn damage_boss(&mut self, amount: f32) -> bool {
        let now = self.clock;
        let Some(boss) = self.boss.as_mut() else {
            return false;
        };
        let mut boss_events = Vec::new();
        let killed = boss.take_damage(amount, now, &mut boss_events)
            == super::boss::DamageResult::Killed;
        super::tick::handle_boss_events(self, boss_events);
        killed
    }

    /// Render/host view of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock,
            phase: self.phase,
            score: self.score,
            distance: self.squad.anchor.y,
            centroid: self.squad.centroid(),
            members: self.squad.members().to_vec(),
            targets: (0..self.squad.slots().len())
                .map(|slot| self.squad.target_position(slot))
                .collect(),
            steer_x: self.squad.steer_x(),
            max_members: self.squad.max_size(),
            boss: self.boss.as_ref().map(|b| BossView {
                archetype: b.archetype,
                name: b.stats().name.to_string(),
                pos: b.pos,
                radius: b.radius(),
                hp: b.hp,
                max_hp: b.max_hp,
                hp_fraction: b.hp_fraction(),
                phase: b.phase,
                state: b.state,
                hit_flash: b.hit_flash > 0.0,
                color: b.stats().color,
                accent_color: b.stats().accent_color,
            }),
            bullets: self.bullets.iter_active().cloned().collect(),
            enemy_shots: self.enemy_shots.iter_active().cloned().collect(),
            obstacles: self.obstacles.iter_active().cloned().collect(),
            gates: self.gates.iter_active().cloned().collect(),
        }
    }
}

/// Boss summary for the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub archetype: BossArchetype,
    pub name: String,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Health bar fill (0.0 - 1.0)
    pub hp_fraction: f32,
    pub phase: u8,
    pub state: BossState,
    pub hit_flash: bool,
    pub color: u32,
    pub accent_color: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub distance: f32,
    pub centroid: Vec2,
    pub members: Vec<SquadMember>,
    /// Where each formation slot currently wants its member
    pub targets: Vec<Vec2>,
    pub steer_x: f32,
    pub max_members: usize,
    pub boss: Option<BossView>,
    pub bullets: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub gates: Vec<Gate>,
}
