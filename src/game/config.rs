// Match configuration
//
// Everything the simulation needs before the first tick: arena size, kit per
// player, stat overrides, animation tables and spawn points. Loaded from JSON
// and immutable once the match starts.

use crate::engine::physics::SeparationPolicy;
use crate::game::animation::AnimationTable;
use crate::game::characters::kit::REQUIRED_ANIMATIONS;
use crate::game::characters::{CharacterKind, KitOverrides, KitStats, Locomotion};
use crate::game::entity::{Arena, PlayerSlot};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid match config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{kit} is missing the `{state}` animation")]
    MissingAnimation { kit: CharacterKind, state: String },

    #[error("{kit} animation `{state}`: {reason}")]
    InvalidClip {
        kit: CharacterKind,
        state: String,
        reason: String,
    },

    #[error("{kit} stat `{stat}`: {reason}")]
    InvalidStat {
        kit: CharacterKind,
        stat: &'static str,
        reason: String,
    },

    #[error("arena must have a positive size, got {width}x{ground_y}")]
    InvalidArena { width: f32, ground_y: f32 },
}

/// One player's fighter choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSetup {
    pub kit: CharacterKind,
    /// Top-left of the collision box; a default spot is picked when unset
    pub spawn: Option<Vec2>,
    pub overrides: KitOverrides,
    /// Replaces the kit's built-in animation table
    pub animations: Option<AnimationTable>,
}

impl PlayerSetup {
    pub fn new(kit: CharacterKind) -> Self {
        Self {
            kit,
            spawn: None,
            overrides: KitOverrides::default(),
            animations: None,
        }
    }
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self::new(CharacterKind::Butterfly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub arena: Arena,
    pub player_one: PlayerSetup,
    pub player_two: PlayerSetup,
    /// Forces a separation policy between fighters instead of going by weight
    pub separation: Option<SeparationPolicy>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            player_one: PlayerSetup::new(CharacterKind::Butterfly),
            player_two: PlayerSetup::new(CharacterKind::Toaster),
            separation: None,
        }
    }
}

/// A kit with overrides applied and a spawn point picked
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKit {
    pub slot: PlayerSlot,
    pub kit: CharacterKind,
    pub stats: KitStats,
    pub animations: AnimationTable,
    pub spawn: Vec2,
}

impl MatchConfig {
    pub fn new(player_one: CharacterKind, player_two: CharacterKind) -> Self {
        Self {
            player_one: PlayerSetup::new(player_one),
            player_two: PlayerSetup::new(player_two),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded match config from {}", path.display());
        Ok(config)
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerSetup {
        match slot {
            PlayerSlot::One => &self.player_one,
            PlayerSlot::Two => &self.player_two,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena.width <= 0.0 || self.arena.ground_y <= 0.0 {
            return Err(ConfigError::InvalidArena {
                width: self.arena.width,
                ground_y: self.arena.ground_y,
            });
        }

        for slot in PlayerSlot::ALL {
            self.resolve_kit(slot)?;
        }
        Ok(())
    }

    /// Final stats, animations and spawn point for `slot`
    pub fn resolve_kit(&self, slot: PlayerSlot) -> Result<ResolvedKit, ConfigError> {
        let setup = self.player(slot);
        let kit = setup.kit;

        let mut stats = kit.default_stats();
        setup.overrides.apply(&mut stats);
        validate_stats(kit, &stats)?;

        let animations = setup
            .animations
            .clone()
            .unwrap_or_else(|| kit.default_animations());
        validate_animations(kit, &animations)?;

        let spawn = match setup.spawn {
            Some(spawn) => spawn,
            None => {
                let spawn = default_spawn(slot, kit, &stats, &self.arena);
                log::debug!("{} spawn not set, using {:?}", slot, spawn);
                spawn
            }
        };

        Ok(ResolvedKit {
            slot,
            kit,
            stats,
            animations,
            spawn,
        })
    }
}

/// Quarter of the way in from each side. Grounded kits stand on the ground,
/// flying kits start halfway up.
fn default_spawn(slot: PlayerSlot, kit: CharacterKind, stats: &KitStats, arena: &Arena) -> Vec2 {
    let size = stats.scaled_collision_size();
    let center_x = match slot {
        PlayerSlot::One => arena.width * 0.25,
        PlayerSlot::Two => arena.width * 0.75,
    };
    let y = match kit.locomotion() {
        Locomotion::Grounded => arena.ground_y - size.y,
        Locomotion::Flying => arena.ground_y * 0.5 - size.y * 0.5,
    };
    Vec2::new(center_x - size.x * 0.5, y)
}

fn validate_stats(kit: CharacterKind, stats: &KitStats) -> Result<(), ConfigError> {
    let invalid = |stat: &'static str, reason: &str| ConfigError::InvalidStat {
        kit,
        stat,
        reason: reason.to_string(),
    };

    if stats.max_health <= 0 {
        return Err(invalid("max_health", "must be positive"));
    }
    if stats.scale <= 0.0 {
        return Err(invalid("scale", "must be positive"));
    }
    if stats.move_speed < 0.0 {
        return Err(invalid("move_speed", "must not be negative"));
    }
    if stats.melee_damage < 0 {
        return Err(invalid("melee_damage", "must not be negative"));
    }
    if !(0.0..=1.0).contains(&stats.block_multiplier) {
        return Err(invalid("block_multiplier", "must be between 0 and 1"));
    }
    if stats.weight <= 0.0 {
        return Err(invalid("weight", "must be positive"));
    }
    Ok(())
}

fn validate_animations(kit: CharacterKind, animations: &AnimationTable) -> Result<(), ConfigError> {
    for state in REQUIRED_ANIMATIONS {
        if !animations.contains_key(state) {
            return Err(ConfigError::MissingAnimation {
                kit,
                state: state.to_string(),
            });
        }
    }

    for (state, clip) in animations {
        let invalid = |reason: &str| ConfigError::InvalidClip {
            kit,
            state: state.clone(),
            reason: reason.to_string(),
        };

        if clip.start > clip.end {
            return Err(invalid("start frame is after end frame"));
        }
        if clip.speed == 0 {
            return Err(invalid("speed must be at least one tick per frame"));
        }
        if clip.frames_per_row == 0 {
            return Err(invalid("frames_per_row must be at least one"));
        }
        if let Some(next) = &clip.next_state {
            if !animations.contains_key(next) {
                return Err(invalid("next_state names an unknown animation"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::AnimationClip;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player_one.kit, CharacterKind::Butterfly);
        assert_eq!(config.player_two.kit, CharacterKind::Toaster);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = MatchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MatchConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "arena": { "width": 640 },
            "player_one": { "kit": "toaster", "overrides": { "max_health": 120 } },
            "player_two": { "kit": "butterfly", "spawn": [500.0, 100.0] },
            "separation": "symmetric"
        }"#;
        let config = MatchConfig::from_json_str(json).unwrap();

        assert_eq!(config.arena.width, 640.0);
        assert_eq!(config.arena.ground_y, 450.0);
        assert_eq!(config.separation, Some(SeparationPolicy::Symmetric));

        let one = config.resolve_kit(PlayerSlot::One).unwrap();
        assert_eq!(one.kit, CharacterKind::Toaster);
        assert_eq!(one.stats.max_health, 120);

        let two = config.resolve_kit(PlayerSlot::Two).unwrap();
        assert_eq!(two.spawn, Vec2::new(500.0, 100.0));
    }

    #[test]
    fn test_grounded_kit_spawns_on_ground() {
        let config = MatchConfig::default();
        let toaster = config.resolve_kit(PlayerSlot::Two).unwrap();
        let size = toaster.stats.scaled_collision_size();
        assert_eq!(toaster.spawn.y + size.y, config.arena.ground_y);
        assert_eq!(toaster.spawn.x + size.x * 0.5, 600.0);
    }

    #[test]
    fn test_unknown_kit_is_parse_error() {
        let result = MatchConfig::from_json_str(r#"{ "player_one": { "kit": "kettle" } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_animation() {
        let mut animations = CharacterKind::Butterfly.default_animations();
        animations.remove("hitDown");

        let mut config = MatchConfig::default();
        config.player_one.animations = Some(animations);

        match config.validate() {
            Err(ConfigError::MissingAnimation { kit, state }) => {
                assert_eq!(kit, CharacterKind::Butterfly);
                assert_eq!(state, "hitDown");
            }
            other => panic!("expected missing animation, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_clip_range() {
        let mut animations = CharacterKind::Toaster.default_animations();
        animations.insert("hitUp".to_string(), AnimationClip::commit(4, 9, 4, 5, "idle"));

        let mut config = MatchConfig::default();
        config.player_two.animations = Some(animations);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClip { .. })
        ));
    }

    #[test]
    fn test_invalid_stat() {
        let mut config = MatchConfig::default();
        config.player_two.overrides.block_multiplier = Some(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStat {
                stat: "block_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_arena() {
        let mut config = MatchConfig::default();
        config.arena.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidArena { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = MatchConfig::load("/nonexistent/duel.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
