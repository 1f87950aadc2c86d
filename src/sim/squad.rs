//! Squad formation controller
//!
//! Keeps the squad packed around a moving anchor: every member glides toward
//! its formation slot, then overlapping members push each other apart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::formation::{FormationPattern, compute_slots};
use crate::tuning::FormationTuning;

/// One squad member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadMember {
    /// Stable id, used by the host to map members to sprites
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Index into the formation ordering (dense 0..count)
    pub slot: usize,
}

/// Result of a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadChange {
    Unchanged,
    Changed { from: usize, to: usize },
    /// Squad dropped to zero members (reported once per wipe)
    Eliminated,
}

/// The player's squad
#[derive(Debug, Clone)]
pub struct Squad {
    pattern: FormationPattern,
    spacing: f32,
    min_separation: f32,
    separation_strength: f32,
    follow_rate: f32,
    max_size: usize,
    steer_limit: f32,
    /// Collision radius of one member
    pub member_radius: f32,
    /// Forward progress point; slots are laid out around it
    pub anchor: Vec2,
    /// Forward speed of the anchor (units/s)
    pub forward_speed: f32,
    /// Clamped horizontal offset requested by the player
    steer_x: f32,
    members: Vec<SquadMember>,
    slots: Vec<Vec2>,
    /// Separation scratch buffer, reused every frame
    push_buf: Vec<Vec2>,
    last_centroid: Vec2,
    eliminated: bool,
    next_id: u32,
}

impl Squad {
    pub fn new(tuning: &FormationTuning, origin: Vec2) -> Self {
        if let Some(gap) = tuning.min_slot_gap().filter(|gap| *gap < tuning.min_separation) {
            log::warn!(
                "{:?} slots come {:.1} apart, below min_separation {}",
                tuning.pattern,
                gap,
                tuning.min_separation
            );
        }
        Self {
            pattern: tuning.pattern,
            spacing: tuning.spacing,
            min_separation: tuning.min_separation,
            separation_strength: tuning.separation_strength,
            follow_rate: tuning.follow_rate,
            max_size: tuning.max_size,
            steer_limit: tuning.steer_limit,
            member_radius: tuning.member_radius,
            anchor: origin,
            forward_speed: 0.0,
            steer_x: 0.0,
            members: Vec::new(),
            slots: Vec::new(),
            push_buf: Vec::new(),
            last_centroid: origin,
            eliminated: false,
            next_id: 1,
        }
    }

    pub fn members(&self) -> &[SquadMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn slots(&self) -> &[Vec2] {
        &self.slots
    }

    pub fn steer_x(&self) -> f32 {
        self.steer_x
    }

    /// Grow or shrink the squad to `n` members (clamped to the max size)
    pub fn set_member_count(&mut self, n: usize) -> SquadChange {
        let from = self.members.len();
        let to = n.min(self.max_size);
        if to == from {
            return SquadChange::Unchanged;
        }

        if to > from {
            // New members pop in at the centroid and glide to their slots
            let spawn_at = self.centroid();
            for _ in from..to {
                let id = self.next_id;
                self.next_id += 1;
                self.members.push(SquadMember {
                    id,
                    pos: spawn_at,
                    vel: Vec2::ZERO,
                    slot: 0,
                });
            }
        } else {
            if to == 0 {
                self.last_centroid = self.centroid();
            }
            self.members.truncate(to);
        }

        self.recompute_slots();
        self.membership_changed(from)
    }

    pub fn add_members(&mut self, k: usize) -> SquadChange {
        self.set_member_count(self.members.len().saturating_add(k))
    }

    pub fn remove_members(&mut self, k: usize) -> SquadChange {
        self.set_member_count(self.members.len().saturating_sub(k))
    }

    /// Remove a specific member (hit by a projectile or obstacle)
    pub fn remove_member(&mut self, id: u32) -> SquadChange {
        let Some(index) = self.members.iter().position(|m| m.id == id) else {
            return SquadChange::Unchanged;
        };
        let from = self.members.len();
        if from == 1 {
            self.last_centroid = self.centroid();
        }
        self.members.remove(index);
        self.recompute_slots();
        self.membership_changed(from)
    }

    fn membership_changed(&mut self, from: usize) -> SquadChange {
        let to = self.members.len();
        if to == 0 {
            if self.eliminated {
                return SquadChange::Unchanged;
            }
            self.eliminated = true;
            log::info!("Squad eliminated (had {} members)", from);
            return SquadChange::Eliminated;
        }
        self.eliminated = false;
        SquadChange::Changed { from, to }
    }

    /// Reassign dense slot indices and offsets for the current membership
    pub fn recompute_slots(&mut self) {
        self.slots = compute_slots(self.pattern, self.members.len(), self.spacing);
        for (i, member) in self.members.iter_mut().enumerate() {
            member.slot = i;
        }
    }

    /// Record the desired horizontal offset from player input
    pub fn set_steering_target(&mut self, x: f32) {
        debug_assert!(!x.is_nan(), "steering target must not be NaN");
        self.steer_x = x.clamp(-self.steer_limit, self.steer_limit);
    }

    /// Desired world position for slot `slot`
    pub fn target_position(&self, slot: usize) -> Vec2 {
        self.anchor + Vec2::new(self.steer_x, 0.0) + self.slots[slot]
    }

    /// Advance the anchor, glide members toward their slots and separate them
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.anchor.y += self.forward_speed * dt;

        if self.members.is_empty() {
            return;
        }

        let follow = (self.follow_rate * dt).min(1.0);
        let steer = Vec2::new(self.steer_x, 0.0);
        for member in &mut self.members {
            let desired = self.anchor + steer + self.slots[member.slot];
            let prev = member.pos;
            member.pos += (desired - member.pos) * follow;
            member.vel = (member.pos - prev) / dt;
        }

        self.apply_separation(dt);
        self.last_centroid = self.centroid();
    }

    /// Pairwise push-apart from a single position snapshot
    fn apply_separation(&mut self, dt: f32) {
        let len = self.members.len();
        if len < 2 {
            return;
        }
        let min_dist = self.min_separation;
        let min_dist_sq = min_dist * min_dist;

        self.push_buf.clear();
        self.push_buf.resize(len, Vec2::ZERO);

        for i in 0..len {
            let pi = self.members[i].pos;
            for j in (i + 1)..len {
                let delta = pi - self.members[j].pos;
                let dist_sq = delta.length_squared();
                if dist_sq >= min_dist_sq {
                    continue;
                }
                let dist = dist_sq.sqrt();
                let dir = if dist > 1e-4 {
                    delta / dist
                } else {
                    // Coincident members: split along an index-derived direction
                    Vec2::from_angle((i * 7 + j * 13) as f32)
                };
                let push = dir * ((min_dist - dist) / min_dist) * self.separation_strength * dt;
                self.push_buf[i] += push * 0.5;
                self.push_buf[j] -= push * 0.5;
            }
        }

        for (member, push) in self.members.iter_mut().zip(&self.push_buf) {
            member.pos += *push;
            member.vel += *push / dt;
        }
    }

    /// Mean member position; the last known centroid when the squad is empty
    pub fn centroid(&self) -> Vec2 {
        if self.members.is_empty() {
            return self.last_centroid;
        }
        let sum: Vec2 = self.members.iter().map(|m| m.pos).sum();
        sum / self.members.len() as f32
    }

    /// Smallest distance between any two members (for diagnostics and tests)
    pub fn min_pair_distance(&self) -> Option<f32> {
        let mut best: Option<f32> = None;
        for (i, a) in self.members.iter().enumerate() {
            for b in &self.members[i + 1..] {
                let d = a.pos.distance(b.pos);
                best = Some(best.map_or(d, |m| m.min(d)));
            }
        }
        best
    }
}
