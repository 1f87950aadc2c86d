//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot / member order)
//! - No rendering or platform dependencies

pub mod attack;
pub mod boss;
pub mod formation;
pub mod pool;
pub mod schedule;
pub mod squad;
pub mod state;
pub mod tick;

pub use attack::{AttackPattern, ProjectileSpec, Volley};
pub use boss::{Boss, BossArchetype, BossEvent, BossState, BossStats, DamageResult};
pub use formation::{FormationPattern, compute_slots, slot_offset};
pub use pool::{Faction, Gate, Obstacle, ObstacleKind, Pool, Poolable, Projectile};
pub use schedule::Scheduler;
pub use squad::{Squad, SquadChange, SquadMember};
pub use state::{BossView, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, generate_course, tick};
