//! Data-driven game balance
//!
//! Constructed once at startup and handed to `GameState::new`. Every field has
//! a default, so a JSON override only needs the values it changes.

use serde::{Deserialize, Serialize};

use crate::sim::boss::BossArchetype;
use crate::sim::formation::{FormationPattern, min_slot_gap};

/// Largest squad a tuning may allow
pub const MAX_SQUAD_SIZE: usize = 10_000;
/// Largest pool a tuning may allocate
pub const MAX_POOL_SIZE: usize = 65_536;
/// Longest course a tuning may describe
pub const MAX_COURSE_LENGTH: f32 = 1.0e6;

/// Squad packing and motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    /// Packing strategy (fixed for the lifetime of a squad)
    pub pattern: FormationPattern,
    /// Distance between neighbouring slots / rings
    pub spacing: f32,
    /// Members closer than this push each other apart
    pub min_separation: f32,
    /// Separation push speed at full overlap (units/s)
    pub separation_strength: f32,
    /// Exponential follow rate toward the slot position (1/s)
    pub follow_rate: f32,
    /// Hard cap on squad size
    pub max_size: usize,
    /// Steering target is clamped to ± this value
    pub steer_limit: f32,
    /// Collision radius of one member
    pub member_radius: f32,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            pattern: FormationPattern::Hex,
            spacing: 28.0,
            min_separation: 24.0,
            separation_strength: 240.0,
            follow_rate: 10.0,
            max_size: 200,
            steer_limit: 150.0,
            member_radius: 10.0,
        }
    }
}

/// Course layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseTuning {
    /// Half width of the bridge (x extent)
    pub bridge_half_width: f32,
    /// Squad forward speed while advancing (units/s)
    pub forward_speed: f32,
    /// Distance to travel before the boss appears
    pub course_length: f32,
    /// Distance between gate pairs
    pub gate_interval: f32,
    /// Distance between obstacles
    pub obstacle_interval: f32,
    /// How far ahead of the squad content is placed when generated
    pub spawn_lookahead: f32,
    /// Boss spawns this far ahead of the squad
    pub boss_distance: f32,
    /// Fixed boss archetype, or `None` to pick from the run seed
    pub boss: Option<BossArchetype>,
    /// Squad size at the start of a run
    pub start_members: usize,
    /// Bonus gate range (inclusive)
    pub gate_bonus_min: i32,
    pub gate_bonus_max: i32,
    /// Penalty gate range (inclusive, positive numbers)
    pub gate_penalty_min: i32,
    pub gate_penalty_max: i32,
    /// Obstacle hit points range (inclusive)
    pub obstacle_hp_min: u32,
    pub obstacle_hp_max: u32,
    pub obstacle_radius: f32,
}

impl Default for CourseTuning {
    fn default() -> Self {
        Self {
            bridge_half_width: 180.0,
            forward_speed: 120.0,
            course_length: 3000.0,
            gate_interval: 450.0,
            obstacle_interval: 300.0,
            spawn_lookahead: 600.0,
            boss_distance: 320.0,
            boss: None,
            start_members: 5,
            gate_bonus_min: 3,
            gate_bonus_max: 12,
            gate_penalty_min: 2,
            gate_penalty_max: 8,
            obstacle_hp_min: 3,
            obstacle_hp_max: 12,
            obstacle_radius: 18.0,
        }
    }
}

/// Weapons, projectiles and pools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Seconds between squad volleys
    pub fire_interval: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_radius: f32,
    /// Bullets expire after this many seconds
    pub bullet_ttl: f32,
    /// Boss projectiles expire after this many seconds
    pub enemy_projectile_ttl: f32,
    /// Minion march speed toward the squad
    pub minion_speed: f32,
    pub minion_hp: u32,
    pub player_bullet_pool: usize,
    pub enemy_projectile_pool: usize,
    pub obstacle_pool: usize,
    pub gate_pool: usize,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            fire_interval: 0.3,
            bullet_speed: 600.0,
            bullet_damage: 1.0,
            bullet_radius: 4.0,
            bullet_ttl: 1.2,
            enemy_projectile_ttl: 6.0,
            minion_speed: 60.0,
            minion_hp: 4,
            player_bullet_pool: 512,
            enemy_projectile_pool: 256,
            obstacle_pool: 64,
            gate_pool: 16,
        }
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub formation: FormationTuning,
    pub course: CourseTuning,
    pub combat: CombatTuning,
}

fn ensure(ok: bool, what: &str) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("invalid tuning: {what}"))
    }
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Content intervals are either 0 (disabled) or at least one world unit
fn interval(value: f32) -> bool {
    value == 0.0 || (value.is_finite() && value >= 1.0)
}

impl FormationTuning {
    pub fn validate(&self) -> Result<(), String> {
        ensure(self.spacing.is_finite() && self.spacing > 0.0, "formation.spacing must be > 0")?;
        ensure(non_negative(self.min_separation), "formation.min_separation must be >= 0")?;
        ensure(
            non_negative(self.separation_strength),
            "formation.separation_strength must be >= 0",
        )?;
        ensure(non_negative(self.follow_rate), "formation.follow_rate must be >= 0")?;
        ensure(non_negative(self.steer_limit), "formation.steer_limit must be >= 0")?;
        ensure(non_negative(self.member_radius), "formation.member_radius must be >= 0")?;
        ensure(
            self.max_size <= MAX_SQUAD_SIZE,
            "formation.max_size exceeds the squad size limit",
        )?;
        // Slots closer than min_separation would leave members overlapping at rest
        if let Some(gap) = self.min_slot_gap() {
            if gap + 1e-3 < self.min_separation {
                return Err(format!(
                    "invalid tuning: {:?} slots at spacing {} come {:.2} apart, closer than min_separation {}",
                    self.pattern, self.spacing, gap, self.min_separation
                ));
            }
        }
        Ok(())
    }

    /// Closest two slots can get in a squad of `max_size`
    pub fn min_slot_gap(&self) -> Option<f32> {
        min_slot_gap(self.pattern, self.max_size, self.spacing)
    }
}

impl CourseTuning {
    pub fn validate(&self) -> Result<(), String> {
        ensure(
            non_negative(self.obstacle_radius),
            "course.obstacle_radius must be >= 0",
        )?;
        ensure(
            self.bridge_half_width.is_finite() && self.bridge_half_width > self.obstacle_radius,
            "course.bridge_half_width must exceed course.obstacle_radius",
        )?;
        ensure(non_negative(self.forward_speed), "course.forward_speed must be >= 0")?;
        ensure(
            non_negative(self.course_length) && self.course_length <= MAX_COURSE_LENGTH,
            "course.course_length out of range",
        )?;
        ensure(interval(self.gate_interval), "course.gate_interval must be 0 or >= 1")?;
        ensure(
            interval(self.obstacle_interval),
            "course.obstacle_interval must be 0 or >= 1",
        )?;
        ensure(non_negative(self.spawn_lookahead), "course.spawn_lookahead must be >= 0")?;
        ensure(non_negative(self.boss_distance), "course.boss_distance must be >= 0")?;
        ensure(
            0 <= self.gate_bonus_min && self.gate_bonus_min <= self.gate_bonus_max,
            "course.gate_bonus_min must be in 0..=gate_bonus_max",
        )?;
        ensure(
            0 <= self.gate_penalty_min && self.gate_penalty_min <= self.gate_penalty_max,
            "course.gate_penalty_min must be in 0..=gate_penalty_max",
        )?;
        ensure(
            1 <= self.obstacle_hp_min && self.obstacle_hp_min <= self.obstacle_hp_max,
            "course.obstacle_hp_min must be in 1..=obstacle_hp_max",
        )
    }
}

impl CombatTuning {
    pub fn validate(&self) -> Result<(), String> {
        for (value, name) in [
            (self.fire_interval, "combat.fire_interval"),
            (self.bullet_speed, "combat.bullet_speed"),
            (self.bullet_damage, "combat.bullet_damage"),
            (self.bullet_radius, "combat.bullet_radius"),
            (self.bullet_ttl, "combat.bullet_ttl"),
            (self.enemy_projectile_ttl, "combat.enemy_projectile_ttl"),
            (self.minion_speed, "combat.minion_speed"),
        ] {
            ensure(non_negative(value), &format!("{name} must be >= 0"))?;
        }
        for (size, name) in [
            (self.player_bullet_pool, "combat.player_bullet_pool"),
            (self.enemy_projectile_pool, "combat.enemy_projectile_pool"),
            (self.obstacle_pool, "combat.obstacle_pool"),
            (self.gate_pool, "combat.gate_pool"),
        ] {
            ensure(size <= MAX_POOL_SIZE, &format!("{name} exceeds the pool size limit"))?;
        }
        Ok(())
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override. Values that parse but can't
    /// drive a run are rejected as well.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(tuning)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), String> {
        self.formation.validate()?;
        self.course.validate()?;
        self.combat.validate()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "formation": { "spacing": 40.0 } }"#).unwrap();
        assert_eq!(tuning.formation.spacing, 40.0);
        assert_eq!(tuning.formation.pattern, FormationPattern::Hex);
        assert_eq!(tuning.course.start_members, 5);
    }

    #[test]
    fn test_pattern_and_boss_from_json() {
        let tuning =
            Tuning::from_json(r#"{ "formation": { "pattern": "Grid" }, "course": { "boss": "Mage" } }"#)
                .unwrap();
        assert_eq!(tuning.formation.pattern, FormationPattern::Grid);
        assert_eq!(tuning.course.boss, Some(BossArchetype::Mage));
    }

    #[test]
    fn test_printed_tuning_loads_back() {
        let json = Tuning::default().to_json().unwrap();
        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.course.gate_interval, 450.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Tuning::default().validate(), Ok(()));
        for pattern in [FormationPattern::Hex, FormationPattern::Spiral, FormationPattern::Grid] {
            let formation = FormationTuning {
                pattern,
                ..Default::default()
            };
            assert_eq!(formation.validate(), Ok(()), "{pattern:?}");
        }
    }

    #[test]
    fn test_bridge_narrower_than_obstacle_rejected() {
        let err = Tuning::from_json(r#"{ "course": { "bridge_half_width": 15.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("bridge_half_width"), "{err}");
        assert!(Tuning::from_json(r#"{ "course": { "bridge_half_width": 18.0 } }"#).is_err());
        assert!(Tuning::from_json(r#"{ "course": { "bridge_half_width": 19.0 } }"#).is_ok());
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        for json in [
            r#"{ "course": { "gate_bonus_min": 10, "gate_bonus_max": 5 } }"#,
            r#"{ "course": { "gate_penalty_min": 9, "gate_penalty_max": 8 } }"#,
            r#"{ "course": { "obstacle_hp_min": 20, "obstacle_hp_max": 12 } }"#,
            r#"{ "course": { "obstacle_hp_min": 0 } }"#,
            r#"{ "course": { "gate_bonus_min": -1 } }"#,
        ] {
            assert!(Tuning::from_json(json).is_err(), "{json}");
        }
        // Equal bounds are a valid single-value range
        assert!(Tuning::from_json(r#"{ "course": { "gate_bonus_min": 5, "gate_bonus_max": 5 } }"#).is_ok());
    }

    #[test]
    fn test_degenerate_values_rejected() {
        for json in [
            r#"{ "formation": { "spacing": 0.0 } }"#,
            r#"{ "formation": { "follow_rate": -1.0 } }"#,
            r#"{ "formation": { "max_size": 1000000 } }"#,
            r#"{ "course": { "gate_interval": 0.001 } }"#,
            r#"{ "course": { "course_length": 1e9 } }"#,
            r#"{ "combat": { "bullet_speed": -600.0 } }"#,
            r#"{ "combat": { "obstacle_pool": 100000000 } }"#,
        ] {
            assert!(Tuning::from_json(json).is_err(), "{json}");
        }
        // 0 disables generated content
        assert!(Tuning::from_json(r#"{ "course": { "gate_interval": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_tight_spiral_rejected() {
        // Spiral ring 1 neighbours sit ~0.87 * spacing apart
        let json = r#"{ "formation": { "pattern": "Spiral", "spacing": 24.0, "min_separation": 24.0 } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(err.to_string().contains("min_separation"), "{err}");
        // The same spacing is fine for hex and grid packing
        assert!(Tuning::from_json(&json.replace("Spiral", "Hex")).is_ok());
        assert!(Tuning::from_json(&json.replace("Spiral", "Grid")).is_ok());
    }

    #[test]
    fn test_single_member_squad_skips_gap_check() {
        let formation = FormationTuning {
            pattern: FormationPattern::Spiral,
            spacing: 1.0,
            min_separation: 24.0,
            max_size: 1,
            ..Default::default()
        };
        assert_eq!(formation.min_slot_gap(), None);
        assert_eq!(formation.validate(), Ok(()));
    }
}
