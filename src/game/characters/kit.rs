// Character kits: the selectable fighters and their tuning
//
// Stats are per kit. Differentiation comes from how each kit moves and which
// special and ability it carries, not only from the numbers.

use crate::game::animation::{AnimationClip, AnimationPlayer, AnimationTable};
use crate::game::entity::{CombatProfile, Entity, EntityId, EntityKind, Facing, PlayerSlot};
use crate::game::projectiles::ProjectileKind;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Clips every fighter's animation table must provide
pub const REQUIRED_ANIMATIONS: [&str; 5] = ["idle", "hitUp", "hitDown", "hitLeft", "hitRight"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Butterfly,
    Toaster,
}

/// How a kit moves around the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    /// Free movement on both axes
    Flying,
    /// Walks along the ground and jumps
    Grounded,
}

/// What the ability button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    /// Short burst of speed in the facing direction
    Dash,
    /// Hold to raise a shield that discounts incoming damage
    Block,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 2] = [CharacterKind::Butterfly, CharacterKind::Toaster];

    pub fn name(self) -> &'static str {
        match self {
            Self::Butterfly => "butterfly",
            Self::Toaster => "toaster",
        }
    }

    pub fn locomotion(self) -> Locomotion {
        match self {
            Self::Butterfly => Locomotion::Flying,
            Self::Toaster => Locomotion::Grounded,
        }
    }

    pub fn special(self) -> ProjectileKind {
        match self {
            Self::Butterfly => ProjectileKind::Tornado,
            Self::Toaster => ProjectileKind::Toast,
        }
    }

    pub fn ability(self) -> Ability {
        match self {
            Self::Butterfly => Ability::Dash,
            Self::Toaster => Ability::Block,
        }
    }

    pub fn default_stats(self) -> KitStats {
        match self {
            Self::Butterfly => KitStats {
                max_health: 100,
                move_speed: 3.0,
                melee_damage: 15,
                block_multiplier: 1.0,
                weight: 1.0,
                frame_size: Vec2::new(16.0, 16.0),
                collision_size: Vec2::new(8.0, 8.0),
                scale: 4.5,
                hitbox_reach: 4.5,
                melee_cooldown: 45,
                special_cooldown: 120,
                dash_speed: 10.0,
                dash_duration: 10,
                dash_cooldown: 60,
                invincibility_ticks: 30,
                jump_height: 0.0,
                jump_ticks: 0,
            },
            Self::Toaster => KitStats {
                max_health: 100,
                move_speed: 2.5,
                melee_damage: 12,
                block_multiplier: 0.25,
                weight: 2.0,
                frame_size: Vec2::new(8.0, 8.0),
                collision_size: Vec2::new(8.0, 8.0),
                scale: 4.5,
                hitbox_reach: 4.5,
                melee_cooldown: 45,
                special_cooldown: 90,
                dash_speed: 0.0,
                dash_duration: 0,
                dash_cooldown: 0,
                invincibility_ticks: 30,
                jump_height: 60.0,
                jump_ticks: 20,
            },
        }
    }

    pub fn default_animations(self) -> AnimationTable {
        let clips = match self {
            Self::Butterfly => [
                ("idle", AnimationClip::looping(6, 0, 4, 10)),
                ("hitUp", AnimationClip::commit(6, 5, 10, 5, "idle")),
                ("hitLeft", AnimationClip::commit(6, 11, 18, 5, "idle")),
                ("hitRight", AnimationClip::commit(6, 19, 25, 5, "idle")),
                ("hitDown", AnimationClip::commit(6, 26, 32, 5, "idle")),
            ],
            Self::Toaster => [
                ("idle", AnimationClip::looping(4, 0, 0, 10)),
                ("hitUp", AnimationClip::commit(4, 4, 7, 5, "idle")),
                ("hitLeft", AnimationClip::commit(4, 8, 11, 5, "idle")),
                ("hitRight", AnimationClip::commit(4, 12, 15, 5, "idle")),
                ("hitDown", AnimationClip::commit(4, 16, 19, 5, "idle")),
            ],
        };

        clips
            .into_iter()
            .map(|(name, clip)| (name.to_string(), clip))
            .collect()
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kit `{0}` (expected butterfly or toaster)")]
pub struct UnknownKit(pub String);

impl FromStr for CharacterKind {
    type Err = UnknownKit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "butterfly" => Ok(Self::Butterfly),
            "toaster" => Ok(Self::Toaster),
            _ => Err(UnknownKit(s.to_string())),
        }
    }
}

/// Tuning for one kit. Durations are in ticks, speeds in pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitStats {
    pub max_health: i32,
    pub move_speed: f32,
    pub melee_damage: i32,
    /// Fraction of damage taken while blocking
    pub block_multiplier: f32,
    pub weight: f32,
    pub frame_size: Vec2,
    pub collision_size: Vec2,
    pub scale: f32,
    /// Unscaled melee reach added to the collision box during a swing
    pub hitbox_reach: f32,
    pub melee_cooldown: u32,
    pub special_cooldown: u32,
    pub dash_speed: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    pub invincibility_ticks: u32,
    /// Pixels risen by a jump
    pub jump_height: f32,
    /// Ticks spent rising (and again falling)
    pub jump_ticks: u32,
}

impl KitStats {
    pub fn combat_profile(&self) -> CombatProfile {
        CombatProfile {
            melee_damage: self.melee_damage,
            block_multiplier: self.block_multiplier,
            weight: self.weight,
        }
    }

    /// Vertical speed of a jump, in pixels per tick
    pub fn jump_speed(&self) -> f32 {
        if self.jump_ticks == 0 {
            0.0
        } else {
            self.jump_height / self.jump_ticks as f32
        }
    }

    pub fn scaled_collision_size(&self) -> Vec2 {
        self.collision_size * self.scale
    }
}

/// Partial stat changes layered over a kit's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitOverrides {
    pub max_health: Option<i32>,
    pub move_speed: Option<f32>,
    pub melee_damage: Option<i32>,
    pub block_multiplier: Option<f32>,
    pub weight: Option<f32>,
    pub melee_cooldown: Option<u32>,
    pub special_cooldown: Option<u32>,
    pub dash_cooldown: Option<u32>,
    pub invincibility_ticks: Option<u32>,
}

impl KitOverrides {
    pub fn apply(&self, stats: &mut KitStats) {
        if let Some(value) = self.max_health {
            stats.max_health = value;
        }
        if let Some(value) = self.move_speed {
            stats.move_speed = value;
        }
        if let Some(value) = self.melee_damage {
            stats.melee_damage = value;
        }
        if let Some(value) = self.block_multiplier {
            stats.block_multiplier = value;
        }
        if let Some(value) = self.weight {
            stats.weight = value;
        }
        if let Some(value) = self.melee_cooldown {
            stats.melee_cooldown = value;
        }
        if let Some(value) = self.special_cooldown {
            stats.special_cooldown = value;
        }
        if let Some(value) = self.dash_cooldown {
            stats.dash_cooldown = value;
        }
        if let Some(value) = self.invincibility_ticks {
            stats.invincibility_ticks = value;
        }
    }
}

/// Create the entity for a fighter at `position`
pub fn build_fighter(
    id: EntityId,
    slot: PlayerSlot,
    kit: CharacterKind,
    stats: &KitStats,
    animations: AnimationTable,
    position: Vec2,
) -> Entity {
    let facing = match slot {
        PlayerSlot::One => Facing::Right,
        PlayerSlot::Two => Facing::Left,
    };

    Entity::new(
        id,
        EntityKind::Character { slot, kit },
        position,
        AnimationPlayer::new(animations, "idle"),
    )
    .with_size(stats.frame_size, stats.collision_size, stats.scale)
    .with_health(stats.max_health, stats.invincibility_ticks)
    .with_facing(facing)
    .with_combat(stats.combat_profile())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("butterfly".parse::<CharacterKind>(), Ok(CharacterKind::Butterfly));
        assert_eq!("Toaster".parse::<CharacterKind>(), Ok(CharacterKind::Toaster));
        let err = "kettle".parse::<CharacterKind>().unwrap_err();
        assert_eq!(err, UnknownKit("kettle".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown kit `kettle` (expected butterfly or toaster)"
        );
    }

    #[test]
    fn test_default_tables_are_complete() {
        for kind in CharacterKind::ALL {
            let clips = kind.default_animations();
            for state in REQUIRED_ANIMATIONS {
                let clip = clips.get(state).unwrap();
                assert!(clip.start <= clip.end);
                if state != "idle" {
                    assert!(!clip.looping);
                    assert_eq!(clip.next_state.as_deref(), Some("idle"));
                }
            }
        }
    }

    #[test]
    fn test_melee_recovers_before_cooldown() {
        for kind in CharacterKind::ALL {
            let stats = kind.default_stats();
            let clips = kind.default_animations();
            for state in &REQUIRED_ANIMATIONS[1..] {
                assert!(clips[*state].duration_ticks() < stats.melee_cooldown);
            }
        }
    }

    #[test]
    fn test_toaster_outweighs_butterfly() {
        let butterfly = CharacterKind::Butterfly.default_stats();
        let toaster = CharacterKind::Toaster.default_stats();
        assert!(toaster.weight > butterfly.weight);
        assert_eq!(toaster.jump_speed(), 3.0);
        assert_eq!(butterfly.jump_speed(), 0.0);
    }

    #[test]
    fn test_overrides_apply() {
        let mut stats = CharacterKind::Butterfly.default_stats();
        let overrides = KitOverrides {
            max_health: Some(150),
            block_multiplier: Some(0.5),
            ..KitOverrides::default()
        };
        overrides.apply(&mut stats);
        assert_eq!(stats.max_health, 150);
        assert_eq!(stats.block_multiplier, 0.5);
        assert_eq!(stats.melee_damage, 15);
    }

    #[test]
    fn test_build_fighter() {
        let stats = CharacterKind::Toaster.default_stats();
        let fighter = build_fighter(
            3,
            PlayerSlot::Two,
            CharacterKind::Toaster,
            &stats,
            CharacterKind::Toaster.default_animations(),
            Vec2::new(500.0, 414.0),
        );
        assert_eq!(fighter.health, 100);
        assert_eq!(fighter.facing, Facing::Left);
        assert_eq!(fighter.animation.current_state(), "idle");
        assert_eq!(fighter.combat.map(|c| c.weight), Some(2.0));
        assert_eq!(fighter.body_box().size, Vec2::splat(36.0));
    }
}
