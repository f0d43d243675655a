// Projectile kinds and their fixed behavior
//
// Each kind maps to one static behavior descriptor. Instances never carry
// their own update logic.

use crate::game::animation::{AnimationClip, AnimationPlayer, AnimationTable};
use crate::game::entity::{Entity, EntityId, EntityKind};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Charge level of a projectile, picked by how long the trigger was held
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChargeTier {
    #[default]
    One,
    Two,
    Three,
}

impl ChargeTier {
    /// Held longer than this reaches tier two (one second)
    pub const TIER_TWO_TICKS: u32 = 60;
    /// Held longer than this reaches tier three (two seconds)
    pub const TIER_THREE_TICKS: u32 = 120;

    pub fn from_held_ticks(ticks: u32) -> Self {
        if ticks > Self::TIER_THREE_TICKS {
            Self::Three
        } else if ticks > Self::TIER_TWO_TICKS {
            Self::Two
        } else {
            Self::One
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
        }
    }

    /// Clip showing this tier on a charged projectile
    pub fn animation_name(self) -> &'static str {
        match self {
            Self::One => "tier1",
            Self::Two => "tier2",
            Self::Three => "tier3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    /// Butterfly's vortex: fired instantly, lingers and shoves
    Tornado,
    /// Toaster's charged shot: consumed on the first hit
    Toast,
}

/// Fixed rules for one projectile kind
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileBehavior {
    /// Held to charge before launch, rather than fired on press
    pub charged: bool,
    /// Removed on its first hit; otherwise it persists and knocks back
    pub despawn_on_hit: bool,
    /// Knockback speed given to a target it touches
    pub knockback: f32,
    /// Damage per charge tier
    pub damage: [i32; 3],
    /// Launch speed per charge tier, in pixels per tick
    pub speed: [f32; 3],
    /// Ticks it lives after launch
    pub lifetime: u32,
    pub frame_size: Vec2,
    pub collision_size: Vec2,
}

const TORNADO: ProjectileBehavior = ProjectileBehavior {
    charged: false,
    despawn_on_hit: false,
    knockback: 6.0,
    damage: [6, 6, 6],
    speed: [2.0, 2.0, 2.0],
    lifetime: 120,
    frame_size: Vec2::new(8.0, 8.0),
    collision_size: Vec2::new(8.0, 8.0),
};

const TOAST: ProjectileBehavior = ProjectileBehavior {
    charged: true,
    despawn_on_hit: true,
    knockback: 0.0,
    damage: [5, 10, 15],
    speed: [4.0, 6.0, 8.0],
    lifetime: 90,
    frame_size: Vec2::new(8.0, 8.0),
    collision_size: Vec2::new(8.0, 8.0),
};

impl ProjectileKind {
    pub fn behavior(self) -> &'static ProjectileBehavior {
        match self {
            Self::Tornado => &TORNADO,
            Self::Toast => &TOAST,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tornado => "tornado",
            Self::Toast => "toast",
        }
    }

    pub fn damage(self, tier: ChargeTier) -> i32 {
        self.behavior().damage[tier.index()]
    }

    pub fn speed(self, tier: ChargeTier) -> f32 {
        self.behavior().speed[tier.index()]
    }

    pub fn animations(self) -> AnimationTable {
        let mut clips = AnimationTable::new();
        match self {
            Self::Tornado => {
                clips.insert("default".to_string(), AnimationClip::looping(3, 0, 6, 5));
            }
            Self::Toast => {
                clips.insert("tier1".to_string(), AnimationClip::looping(3, 0, 2, 6));
                clips.insert("tier2".to_string(), AnimationClip::looping(3, 3, 5, 5));
                clips.insert("tier3".to_string(), AnimationClip::looping(3, 6, 8, 4));
            }
        }
        clips
    }

    /// Clip to show for `tier`
    pub fn animation_for(self, tier: ChargeTier) -> &'static str {
        match self {
            Self::Tornado => "default",
            Self::Toast => tier.animation_name(),
        }
    }
}

/// Build a projectile centered on `caster`'s body box, sized with the caster's scale.
///
/// A launched projectile starts its lifetime immediately. An attached one
/// (a charge indicator) has no lifetime until it is released.
pub fn spawn_projectile(
    id: EntityId,
    kind: ProjectileKind,
    caster: &Entity,
    tier: ChargeTier,
    velocity: Vec2,
    attached: bool,
) -> Entity {
    let behavior = kind.behavior();
    let animation = AnimationPlayer::new(kind.animations(), kind.animation_for(tier));

    let mut projectile = Entity::new(id, EntityKind::Projectile(kind), Vec2::ZERO, animation)
        .with_size(behavior.frame_size, behavior.collision_size, caster.scale)
        .with_caster(caster.id)
        .with_facing(caster.facing);
    projectile.center_on(caster.center());
    projectile.velocity = velocity;
    projectile.charge_tier = tier;

    if attached {
        projectile.attached()
    } else {
        projectile.with_lifetime(behavior.lifetime)
    }
}

/// Start an attached projectile flying: fix its tier, give it speed along
/// `direction` and start its lifetime
pub fn launch(projectile: &mut Entity, tier: ChargeTier, direction: Vec2) {
    let Some(kind) = projectile.kind.projectile() else {
        return;
    };

    projectile.charge_tier = tier;
    projectile.velocity = direction * kind.speed(tier);
    projectile.attached = false;
    projectile.lifetime = Some(kind.behavior().lifetime);
    projectile.set_animation(kind.animation_for(tier));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::CharacterKind;
    use crate::game::entity::PlayerSlot;

    fn caster() -> Entity {
        let mut clips = AnimationTable::new();
        clips.insert("idle".to_string(), AnimationClip::looping(1, 0, 0, 10));
        Entity::new(
            7,
            EntityKind::Character {
                slot: PlayerSlot::Two,
                kit: CharacterKind::Toaster,
            },
            Vec2::new(200.0, 300.0),
            AnimationPlayer::new(clips, "idle"),
        )
        .with_size(Vec2::splat(8.0), Vec2::splat(16.0), 2.0)
    }

    #[test]
    fn test_charge_tier_thresholds() {
        assert_eq!(ChargeTier::from_held_ticks(0), ChargeTier::One);
        assert_eq!(ChargeTier::from_held_ticks(60), ChargeTier::One);
        assert_eq!(ChargeTier::from_held_ticks(61), ChargeTier::Two);
        assert_eq!(ChargeTier::from_held_ticks(120), ChargeTier::Two);
        assert_eq!(ChargeTier::from_held_ticks(121), ChargeTier::Three);
    }

    #[test]
    fn test_damage_tiers_increase() {
        assert_eq!(ProjectileKind::Toast.damage(ChargeTier::One), 5);
        assert_eq!(ProjectileKind::Toast.damage(ChargeTier::Two), 10);
        assert_eq!(ProjectileKind::Toast.damage(ChargeTier::Three), 15);
        assert!(ProjectileKind::Toast.speed(ChargeTier::Three) > ProjectileKind::Toast.speed(ChargeTier::One));
    }

    #[test]
    fn test_behavior_per_kind() {
        assert!(ProjectileKind::Toast.behavior().despawn_on_hit);
        assert!(ProjectileKind::Toast.behavior().charged);
        assert!(!ProjectileKind::Tornado.behavior().despawn_on_hit);
        assert!(ProjectileKind::Tornado.behavior().knockback > 0.0);
    }

    #[test]
    fn test_every_tier_has_a_clip() {
        for kind in [ProjectileKind::Tornado, ProjectileKind::Toast] {
            let clips = kind.animations();
            for tier in [ChargeTier::One, ChargeTier::Two, ChargeTier::Three] {
                assert!(clips.contains_key(kind.animation_for(tier)));
            }
        }
    }

    #[test]
    fn test_spawn_centered_on_caster() {
        let caster = caster();
        let projectile = spawn_projectile(
            20,
            ProjectileKind::Tornado,
            &caster,
            ChargeTier::One,
            Vec2::new(2.0, 0.0),
            false,
        );

        assert_eq!(projectile.center(), caster.center());
        assert_eq!(projectile.caster, Some(7));
        assert_eq!(projectile.scale, 2.0);
        assert_eq!(projectile.lifetime, Some(120));
        assert!(!projectile.attached);
    }

    #[test]
    fn test_attached_then_launched() {
        let caster = caster();
        let mut toast = spawn_projectile(
            21,
            ProjectileKind::Toast,
            &caster,
            ChargeTier::One,
            Vec2::ZERO,
            true,
        );
        assert!(toast.attached);
        assert_eq!(toast.lifetime, None);

        launch(&mut toast, ChargeTier::Three, Vec2::NEG_X);
        assert!(!toast.attached);
        assert_eq!(toast.lifetime, Some(90));
        assert_eq!(toast.velocity, Vec2::new(-8.0, 0.0));
        assert_eq!(toast.animation.current_state(), "tier3");
    }
}
