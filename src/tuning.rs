//! Data-driven game balance
//!
//! Every gameplay constant lives here so a level designer can tweak a JSON
//! file instead of recompiling. Velocities of players and particles are in
//! units per tick; enemy speeds are in units per second.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Horizontal speed (units/tick)
    pub move_speed: f32,
    /// Spin while moving (degrees/tick)
    pub rotation_speed: f32,
    /// Initial upward speed of a jump (units/tick)
    pub jump_speed: f32,
    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Dash speed (units/tick)
    pub dash_speed: f32,
    /// Dash duration (seconds)
    pub dash_time: f32,
    /// Vertical speed kept when a rising dash ends
    pub dash_exit_rise: f32,

    // === Missile ===
    pub missile_width: f32,
    pub missile_height: f32,

    // === Seeker head ===
    /// Seconds before a seeker blows up
    pub seeker_lifespan: f32,
    /// Strength of the push between seekers (divided by distance)
    pub seeker_repulsion: f32,
    /// How long the shockwave lasts (seconds)
    pub shockwave_lifespan: f32,
    /// Shockwave radius growth (units/second)
    pub shockwave_growth: f32,

    // === Boss ===
    /// Countdown before the boss picks a direction (seconds)
    pub boss_aim_time: f32,
    /// Seconds before the boss blows up
    pub boss_lifespan: f32,
    /// Chance (out of 4) the boss dashes in a random cardinal direction
    pub boss_evade_odds: u32,

    // === Screen shake intensities ===
    pub shake_seeker: f32,
    pub shake_boss: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            rotation_speed: 7.0,
            jump_speed: 6.0,
            gravity: 0.15,
            dash_speed: 10.0,
            dash_time: 0.1,
            dash_exit_rise: 2.0,

            missile_width: 8.0,
            missile_height: 26.0,

            seeker_lifespan: 5.0,
            seeker_repulsion: 500.0,
            shockwave_lifespan: 0.4,
            shockwave_growth: 30.0,

            boss_aim_time: 1.5,
            boss_lifespan: 30.0,
            boss_evade_odds: 1,

            shake_seeker: 10.0,
            shake_boss: 15.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(tuning) => Some(tuning),
            Err(e) => {
                log::warn!("Invalid tuning JSON: {}", e);
                None
            }
        }
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Some(tuning) = Self::from_json(&json) {
                log::info!("Loaded tuning from {}", path.display());
                return tuning;
            }
        } else {
            log::warn!("Could not read {}, using default tuning", path.display());
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.3, "boss_aim_time": 2.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.3);
        assert_eq!(tuning.boss_aim_time, 2.0);
        assert_eq!(tuning.move_speed, Tuning::default().move_speed);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Tuning::from_json("{ gravity: ").is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load(Path::new("/nonexistent/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
