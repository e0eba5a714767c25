//! Simulation configuration
//!
//! Every block has a sensible default, so a config file only needs the
//! values it changes:
//!
//! ```toml
//! seed = 7
//! max_delta = 0.05
//!
//! [weapon]
//! name = "Carbine"
//! magazine_size = 20
//! fire_rate = 8.0
//!
//! [waves]
//! max_waves = 5
//! grace_delay = 2.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use strafe_ai::{EnemyKind, EnemyStats};
use strafe_combat::WeaponStats;
use strafe_gamestate::{PickupConfig, WaveConfig};
use strafe_math::{Vec3, AABB};
use strafe_physics::LevelGeometry;
use strafe_player::PlayerStats;
use thiserror::Error;

use crate::render::VisualSet;
use crate::time::DEFAULT_MAX_DELTA;

/// Errors from loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Stat blocks used when the wave director orders an archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyPresets {
    pub grunt: EnemyStats,
    pub soldier: EnemyStats,
    pub heavy: EnemyStats,
    pub sniper: EnemyStats,
    pub boss: EnemyStats,
}

impl Default for EnemyPresets {
    fn default() -> Self {
        Self {
            grunt: EnemyStats::grunt(),
            soldier: EnemyStats::soldier(),
            heavy: EnemyStats::heavy(),
            sniper: EnemyStats::sniper(),
            boss: EnemyStats::boss(),
        }
    }
}

impl EnemyPresets {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Grunt => &self.grunt,
            EnemyKind::Soldier => &self.soldier,
            EnemyKind::Heavy => &self.heavy,
            EnemyKind::Sniper => &self.sniper,
            EnemyKind::Boss => &self.boss,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &EnemyStats> {
        [&self.grunt, &self.soldier, &self.heavy, &self.sniper, &self.boss].into_iter()
    }
}

/// Everything needed to build a [`Simulation`](crate::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random roll in the session
    pub seed: u64,
    /// Upper bound on a single tick's delta, seconds
    pub max_delta: f32,
    /// Feet position the player starts at
    pub player_spawn: Vec3,
    pub player: PlayerStats,
    pub weapon: WeaponStats,
    pub enemies: EnemyPresets,
    pub waves: WaveConfig,
    pub pickups: PickupConfig,
    pub level: LevelGeometry,
    pub visuals: VisualSet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_delta: DEFAULT_MAX_DELTA,
            player_spawn: Vec3::ZERO,
            player: PlayerStats::default(),
            weapon: WeaponStats::rifle(),
            enemies: EnemyPresets::default(),
            waves: WaveConfig::default(),
            pickups: PickupConfig::default(),
            level: default_level(),
            visuals: VisualSet::default(),
        }
    }
}

/// 80x80 arena with four pillars for cover
fn default_level() -> LevelGeometry {
    let pillar = |x: f32, z: f32| AABB::new(Vec3::new(x - 1.0, 0.0, z - 1.0), Vec3::new(x + 1.0, 3.0, z + 1.0));
    LevelGeometry::arena(40.0)
        .with_collider(pillar(8.0, 8.0))
        .with_collider(pillar(-8.0, 8.0))
        .with_collider(pillar(8.0, -8.0))
        .with_collider(pillar(-8.0, -8.0))
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.max_delta > 0.0) || !self.max_delta.is_finite() {
            return invalid(format!("max_delta must be positive, got {}", self.max_delta));
        }

        let weapon = &self.weapon;
        if !(weapon.fire_rate > 0.0) {
            return invalid(format!("weapon '{}': fire_rate must be positive", weapon.name));
        }
        if weapon.magazine_size == 0 {
            return invalid(format!("weapon '{}': magazine_size must be at least 1", weapon.name));
        }
        if weapon.pellets == 0 {
            return invalid(format!("weapon '{}': pellets must be at least 1", weapon.name));
        }
        if weapon.falloff_end < weapon.falloff_start {
            return invalid(format!(
                "weapon '{}': falloff_end ({}) is before falloff_start ({})",
                weapon.name, weapon.falloff_end, weapon.falloff_start
            ));
        }

        if self.waves.spawn_points.is_empty() {
            return invalid("waves: at least one spawn point is required".into());
        }

        if !(self.player.max_health > 0.0) {
            return invalid("player: max_health must be positive".into());
        }
        if let Some(stats) = self.enemies.iter().find(|s| !(s.max_health > 0.0)) {
            return invalid(format!("enemy '{}': max_health must be positive", stats.name));
        }

        if !self.level.bounds.is_valid() {
            return invalid("level: bounds are inverted".into());
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponStats) -> Self {
        self.weapon = weapon;
        self
    }

    pub fn with_waves(mut self, waves: WaveConfig) -> Self {
        self.waves = waves;
        self
    }

    pub fn with_level(mut self, level: LevelGeometry) -> Self {
        self.level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 7

            [weapon]
            name = "Carbine"
            magazine_size = 20

            [waves]
            max_waves = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.weapon.name, "Carbine");
        assert_eq!(config.weapon.magazine_size, 20);
        assert_eq!(config.weapon.reserve_ammo, WeaponStats::default().reserve_ammo);
        assert_eq!(config.waves.max_waves, Some(5));
        assert_eq!(config.max_delta, DEFAULT_MAX_DELTA);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig::default().with_seed(99);
        let text = config.to_toml_string().unwrap();
        let back = SimConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            "max_delta = 0.0",
            "[weapon]\nfire_rate = 0.0",
            "[weapon]\nmagazine_size = 0",
            "[weapon]\nfalloff_start = 80.0\nfalloff_end = 20.0",
            "[waves]\nspawn_points = []",
        ];
        for case in cases {
            match SimConfig::from_toml_str(case) {
                Err(ConfigError::Invalid(_)) => {}
                other => panic!("expected rejection for {:?}, got {:?}", case, other),
            }
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimConfig::from_toml_str("seed = \"not a number\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/strafe.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
