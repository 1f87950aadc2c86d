//! Formation slot packing
//!
//! A slot is an offset from the squad anchor derived only from the member's
//! index and the squad size. There is no hidden state, so recomputing with the
//! same inputs always yields the same offsets.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Packing strategy for squad members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormationPattern {
    /// Square-ish grid centred on its bounding box
    Grid,
    /// Concentric rings holding ceil(2πr) slots each
    Spiral,
    /// Concentric rings holding 6r slots each
    #[default]
    Hex,
}

impl FormationPattern {
    /// Number of slots on ring `ring` (ring 0 is the centre slot).
    /// Grid has no rings and always returns 0.
    pub fn ring_capacity(&self, ring: u32) -> usize {
        match self {
            FormationPattern::Grid => 0,
            _ if ring == 0 => 1,
            FormationPattern::Spiral => (TAU * ring as f32).ceil() as usize,
            FormationPattern::Hex => 6 * ring as usize,
        }
    }
}

/// Locate `index` in a ring pattern: (ring, position within ring, ring capacity)
fn ring_position(pattern: FormationPattern, index: usize) -> (u32, usize, usize) {
    let mut ring = 0;
    let mut first = 0;
    loop {
        let capacity = pattern.ring_capacity(ring);
        if index < first + capacity {
            return (ring, index - first, capacity);
        }
        first += capacity;
        ring += 1;
    }
}

/// Offset of slot `index` in a squad of `count` members
pub fn slot_offset(pattern: FormationPattern, index: usize, count: usize, spacing: f32) -> Vec2 {
    debug_assert!(index < count, "slot {index} out of range for {count} members");
    match pattern {
        FormationPattern::Grid => {
            let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
            let rows = count.div_ceil(cols);
            let col = index % cols;
            let row = index / cols;
            Vec2::new(
                (col as f32 - (cols - 1) as f32 / 2.0) * spacing,
                (row as f32 - (rows - 1) as f32 / 2.0) * spacing,
            )
        }
        FormationPattern::Spiral | FormationPattern::Hex => {
            let (ring, k, capacity) = ring_position(pattern, index);
            if ring == 0 {
                return Vec2::ZERO;
            }
            let theta = TAU * k as f32 / capacity as f32;
            polar_to_cartesian(ring as f32 * spacing, theta)
        }
    }
}

/// All slot offsets for a squad of `count` members
pub fn compute_slots(pattern: FormationPattern, count: usize, spacing: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| slot_offset(pattern, i, count, spacing))
        .collect()
}

/// Smallest distance between two slots of a `count`-member squad, `None`
/// below two members. Smaller squads use a prefix of the same slots, so this
/// also bounds every smaller squad.
pub fn min_slot_gap(pattern: FormationPattern, count: usize, spacing: f32) -> Option<f32> {
    if count < 2 {
        return None;
    }
    match pattern {
        FormationPattern::Grid => Some(spacing),
        FormationPattern::Spiral | FormationPattern::Hex => {
            // Rings are `spacing` apart radially, so only neighbours on one ring
            // can sit closer than that
            let (last_ring, last_k, _) = ring_position(pattern, count - 1);
            let mut gap = spacing;
            for ring in 1..=last_ring {
                let capacity = pattern.ring_capacity(ring);
                let filled = if ring == last_ring { last_k + 1 } else { capacity };
                if filled >= 2 {
                    let chord = 2.0 * ring as f32 * spacing * (PI / capacity as f32).sin();
                    gap = gap.min(chord);
                }
            }
            Some(gap)
        }
    }
}
