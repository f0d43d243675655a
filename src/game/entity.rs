// Simulated objects: fighters, projectiles and effects

use crate::common::math;
use crate::engine::physics::{Axis, Collider, Push, Rect};
use crate::engine::renderer::SpriteView;
use crate::game::animation::AnimationPlayer;
use crate::game::characters::CharacterKind;
use crate::game::projectiles::{ChargeTier, ProjectileKind};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity within a match
pub type EntityId = u32;

/// Ticks between visibility toggles while invincible
pub const FLASH_INTERVAL: u32 = 4;

/// Knockback speed lost per tick
pub const KNOCKBACK_DECAY: f32 = 0.8;

/// Knockback below this speed stops
pub const KNOCKBACK_CUTOFF: f32 = 0.05;

/// Which player a fighter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Index into per-player arrays (0 or 1)
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One => write!(f, "P1"),
            Self::Two => write!(f, "P2"),
        }
    }
}

/// Last direction a fighter faced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Screen-space unit vector (y down)
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Self::Up => Vec2::NEG_Y,
            Self::Down => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Melee clip swung in this direction
    pub fn hit_state(self) -> &'static str {
        match self {
            Self::Up => "hitUp",
            Self::Down => "hitDown",
            Self::Left => "hitLeft",
            Self::Right => "hitRight",
        }
    }

    /// Facing implied by a movement vector. Horizontal input wins; vertical
    /// input only turns the fighter when there is no horizontal component.
    pub fn from_movement(movement: Vec2) -> Option<Self> {
        if movement.x < 0.0 {
            Some(Self::Left)
        } else if movement.x > 0.0 {
            Some(Self::Right)
        } else if movement.y < 0.0 {
            Some(Self::Up)
        } else if movement.y > 0.0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    BlockShield,
}

/// What an entity is. Combat rules match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character {
        slot: PlayerSlot,
        kit: CharacterKind,
    },
    Projectile(ProjectileKind),
    Effect(EffectKind),
}

impl EntityKind {
    /// Sprite sheet label handed to the renderer
    pub fn sheet(&self) -> &'static str {
        match self {
            Self::Character { kit, .. } => kit.name(),
            Self::Projectile(kind) => kind.name(),
            Self::Effect(EffectKind::BlockShield) => "shield",
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Self::Character { .. })
    }

    pub fn projectile(&self) -> Option<ProjectileKind> {
        match self {
            Self::Projectile(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<PlayerSlot> {
        match self {
            Self::Character { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

/// Playfield bounds. The ground is a fixed Y clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: f32,
    pub ground_y: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            ground_y: 450.0,
        }
    }
}

impl Arena {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.ground_y)
    }
}

/// Fighter numbers the combat resolver reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatProfile {
    pub melee_damage: i32,
    /// Fraction of incoming damage taken while blocking
    pub block_multiplier: f32,
    /// Heavier fighters push lighter ones around
    pub weight: f32,
}

/// A simulated, drawable object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,

    /// Top-left of the collision box
    pub position: Vec2,
    pub velocity: Vec2,
    /// Impulse on top of `velocity`, decaying every tick
    pub knockback: Vec2,

    /// Unscaled sprite frame size
    pub frame_size: Vec2,
    /// Unscaled collision box size
    pub collision_size: Vec2,
    pub scale: f32,
    /// Extra reach applied to the collision box during a melee swing
    pub hitbox_offset: Vec2,

    pub animation: AnimationPlayer,

    pub max_health: i32,
    pub health: i32,
    /// Ticks of invincibility left
    pub invincibility: u32,
    /// Invincibility granted by each hit
    pub invincibility_duration: u32,
    pub visible: bool,
    /// Set once the current swing has landed
    pub has_dealt_damage: bool,
    pub facing: Facing,
    pub blocking: bool,

    /// Ticks left to live; `None` lives until removed
    pub lifetime: Option<u32>,
    /// Fighter that spawned this projectile or effect
    pub caster: Option<EntityId>,
    pub charge_tier: ChargeTier,
    /// Follows its caster and takes no part in hits
    pub attached: bool,
    pub combat: Option<CombatProfile>,

    pub should_remove: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, animation: AnimationPlayer) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            knockback: Vec2::ZERO,
            frame_size: Vec2::splat(8.0),
            collision_size: Vec2::splat(8.0),
            scale: 1.0,
            hitbox_offset: Vec2::ZERO,
            animation,
            max_health: 1,
            health: 1,
            invincibility: 0,
            invincibility_duration: 0,
            visible: true,
            has_dealt_damage: false,
            facing: Facing::Right,
            blocking: false,
            lifetime: None,
            caster: None,
            charge_tier: ChargeTier::One,
            attached: false,
            combat: None,
            should_remove: false,
        }
    }

    pub fn with_size(mut self, frame_size: Vec2, collision_size: Vec2, scale: f32) -> Self {
        self.frame_size = frame_size;
        self.collision_size = collision_size;
        self.scale = scale;
        self
    }

    pub fn with_health(mut self, max_health: i32, invincibility_duration: u32) -> Self {
        self.max_health = max_health.max(1);
        self.health = self.max_health;
        self.invincibility_duration = invincibility_duration;
        self
    }

    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.lifetime = Some(ticks);
        self
    }

    pub fn with_caster(mut self, caster: EntityId) -> Self {
        self.caster = Some(caster);
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_combat(mut self, combat: CombatProfile) -> Self {
        self.combat = Some(combat);
        self
    }

    pub fn attached(mut self) -> Self {
        self.attached = true;
        self
    }

    /// Advance one tick: animation, invincibility flash, motion, arena clamp, lifetime
    pub fn advance(&mut self, arena: &Arena) {
        if self.should_remove {
            return;
        }

        self.animation.update();

        if self.invincibility > 0 {
            self.invincibility -= 1;
            self.visible = (self.invincibility / FLASH_INTERVAL) % 2 == 0;
        } else {
            self.visible = true;
        }

        self.position += self.velocity + self.knockback;
        self.knockback *= KNOCKBACK_DECAY;
        if self.knockback.length() < KNOCKBACK_CUTOFF {
            self.knockback = Vec2::ZERO;
        }

        self.clamp_to(arena);

        if let Some(remaining) = self.lifetime.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.should_remove = true;
            }
        }
    }

    /// Keep the body box inside the arena, stopping motion into a wall
    pub fn clamp_to(&mut self, arena: &Arena) {
        let size = self.scaled_collision_size();
        let max = Vec2::new(arena.width - size.x, arena.ground_y - size.y);

        let x = math::clamp(self.position.x, 0.0, max.x);
        if x != self.position.x {
            self.position.x = x;
            self.velocity.x = 0.0;
            self.knockback.x = 0.0;
        }

        let y = math::clamp(self.position.y, 0.0, max.y);
        if y != self.position.y {
            self.position.y = y;
            self.velocity.y = 0.0;
            self.knockback.y = 0.0;
        }
    }

    /// Switch animation. Unknown states are logged and the current clip keeps playing.
    pub fn set_animation(&mut self, state: &str) {
        if let Err(err) = self.animation.play(state) {
            log::warn!("Entity {} ({}): {}", self.id, self.kind.sheet(), err);
        }
    }

    /// Apply damage unless invincible. Returns whether health changed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.should_remove || self.invincibility > 0 || amount <= 0 {
            return false;
        }

        self.health = (self.health - amount).max(0);
        self.invincibility = self.invincibility_duration;
        if self.health == 0 {
            self.should_remove = true;
        }
        true
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn scaled_collision_size(&self) -> Vec2 {
        self.collision_size * self.scale
    }

    /// Collision box without any hitbox offset
    pub fn body_box(&self) -> Rect {
        Rect::from_min_size(self.position, self.scaled_collision_size())
    }

    /// Box every overlap test uses: the body box moved by the hitbox offset
    pub fn collision_box(&self) -> Rect {
        self.body_box().translated(self.hitbox_offset)
    }

    /// Drawn frame, concentric with the body box
    pub fn visual_rect(&self) -> Rect {
        Rect::from_center_size(self.body_box().center(), self.frame_size * self.scale)
    }

    pub fn center(&self) -> Vec2 {
        self.body_box().center()
    }

    /// Place the body box so its center lands on `center`
    pub fn center_on(&mut self, center: Vec2) {
        self.position = center - self.scaled_collision_size() * 0.5;
    }

    pub fn is_on_ground(&self, arena: &Arena) -> bool {
        self.body_box().max().y >= arena.ground_y - f32::EPSILON
    }

    /// Mid-swing with an extended hitbox
    pub fn is_swinging(&self) -> bool {
        self.animation.is_committed()
            && self.animation.current_state().starts_with("hit")
            && self.hitbox_offset != Vec2::ZERO
    }

    pub fn reset_hitbox_offset(&mut self) {
        self.hitbox_offset = Vec2::ZERO;
    }

    /// Read-only view for the renderer
    pub fn sprite_view(&self) -> SpriteView {
        SpriteView {
            entity_id: self.id,
            sheet: self.kind.sheet(),
            animation: self.animation.current_state().to_string(),
            position: self.position,
            collision_box: self.collision_box(),
            visual_rect: self.visual_rect(),
            frame_index: self.animation.current_frame(),
            frames_per_row: self.animation.frames_per_row(),
            frame_size: self.frame_size,
            scale: self.scale,
            visible: self.visible,
        }
    }
}

impl Collider for Entity {
    fn collision_box(&self) -> Rect {
        Entity::collision_box(self)
    }

    fn is_collidable(&self) -> bool {
        self.visible && !self.should_remove
    }

    fn displace(&mut self, push: Push) {
        self.position += push.delta;
        match push.axis {
            Axis::X => {
                self.velocity.x = 0.0;
                self.knockback.x = 0.0;
            }
            Axis::Y => {
                self.velocity.y = 0.0;
                self.knockback.y = 0.0;
            }
        }
    }
}

/// Entities created during a tick, inserted by the match before anything advances
#[derive(Debug)]
pub struct SpawnQueue {
    next_id: EntityId,
    pending: Vec<Entity>,
}

impl Default for SpawnQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Hand out the next unused id
    pub fn reserve_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, entity: Entity) {
        log::debug!("Spawning {} #{}", entity.kind.sheet(), entity.id);
        self.pending.push(entity);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Take every pending entity in the order they were pushed
    pub fn drain(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }
}
