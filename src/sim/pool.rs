//! Fixed-capacity object pools and the pooled world records
//!
//! Slots are recycled by scanning for the first inactive entry; a full pool
//! drops the spawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A record that can live in a `Pool`
pub trait Poolable: Default {
    fn is_active(&self) -> bool;
}

/// Fixed-capacity pool with first-inactive-slot reuse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: (0..capacity).map(|_| T::default()).collect(),
        }
    }

    /// Store `item` in the first free slot; returns the slot index
    pub fn spawn(&mut self, item: T) -> Option<usize> {
        let index = self.items.iter().position(|i| !i.is_active())?;
        self.items[index] = item;
        Some(index)
    }

    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_active()).count()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|i| i.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|i| i.is_active())
    }

}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Squad,
    Boss,
}

/// A bullet or boss projectile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub active: bool,
    pub faction: Faction,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Turn rate toward the target (radians/s); 0 flies straight
    pub homing: f32,
    /// Seconds until expiry
    pub ttl: f32,
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Projectile {
    /// Integrate one step, steering toward `target` when homing
    pub fn advance(&mut self, dt: f32, target: Vec2) {
        if self.homing > 0.0 {
            let speed = self.vel.length();
            let desired = (target - self.pos).to_angle();
            let current = self.vel.to_angle();
            let diff = crate::normalize_angle(desired - current);
            let max_turn = self.homing * dt;
            let heading = current + diff.clamp(-max_turn, max_turn);
            self.vel = Vec2::from_angle(heading) * speed;
        }
        self.pos += self.vel * dt;
        self.ttl -= dt;
        if self.ttl <= 0.0 {
            self.active = false;
        }
    }
}

/// A gate: crossing it adds (positive) or removes (negative) members
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gate {
    pub active: bool,
    /// Gate line position (y) and lane span [x_min, x_max]
    pub y: f32,
    pub x_min: f32,
    pub x_max: f32,
    pub delta: i32,
    /// Shared by both gates of a pair; a pair triggers once
    pub pair_id: u32,
}

impl Poolable for Gate {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Gate {
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x_min && x < self.x_max
    }
}

/// Obstacle flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Static barrel placed on the course
    #[default]
    Barrel,
    /// Boss-summoned enemy marching at the squad
    Minion,
}

/// Destructible obstacle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Obstacle {
    pub active: bool,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
}

impl Poolable for Obstacle {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Obstacle {
    /// Apply damage; returns true if this destroyed the obstacle
    pub fn hit(&mut self, damage: f32) -> bool {
        if !self.active {
            return false;
        }
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }
}
