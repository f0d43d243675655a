// Fighter controller: turns logical input into posture changes and kit actions
//
// The controller owns a fighter's cooldowns, posture and jump arc. It only
// mutates entity fields; new entities go through the spawn queue.

use super::kit::{Ability, CharacterKind, KitStats, Locomotion};
use super::state::{Posture, PostureMachine};
use crate::engine::input::{Action, PlayerInput};
use crate::game::animation::{AnimationClip, AnimationPlayer, AnimationTable};
use crate::game::entity::{
    Arena, EffectKind, Entity, EntityId, EntityKind, Facing, PlayerSlot, SpawnQueue,
};
use crate::game::projectiles::{self, spawn_projectile, ChargeTier};
use glam::Vec2;

/// What a player wants this tick, independent of the keys behind it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Unnormalized direction, y down
    pub movement: Vec2,
    pub melee: bool,
    pub special_pressed: bool,
    pub special_held: bool,
    pub ability_pressed: bool,
    pub ability_held: bool,
    pub jump: bool,
}

impl CharacterKind {
    /// Read this kit's intent out of a player's buttons
    pub fn map_input(self, input: &PlayerInput) -> Intent {
        let direction = input.direction();
        let (movement, jump) = match self.locomotion() {
            Locomotion::Flying => (direction, false),
            Locomotion::Grounded => (
                Vec2::new(direction.x, 0.0),
                input.just_pressed(Action::MoveUp),
            ),
        };

        Intent {
            movement,
            melee: input.just_pressed(Action::Melee),
            special_pressed: input.just_pressed(Action::Special),
            special_held: input.is_pressed(Action::Special),
            ability_pressed: input.just_pressed(Action::Ability),
            ability_held: input.is_pressed(Action::Ability),
            jump,
        }
    }
}

/// Independent countdowns, decremented every tick whether or not the fighter acts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub melee: u32,
    pub special: u32,
    pub dash: u32,
}

impl Cooldowns {
    pub fn tick(&mut self) {
        self.melee = self.melee.saturating_sub(1);
        self.special = self.special.saturating_sub(1);
        self.dash = self.dash.saturating_sub(1);
    }
}

/// Vertical arc of a grounded kit's jump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JumpState {
    #[default]
    Grounded,
    /// Ticks of rising left, this one included
    Rising { remaining: u32 },
    /// Ticks of falling left, this one included
    Falling { remaining: u32 },
}

fn shield_animations() -> AnimationTable {
    let mut clips = AnimationTable::new();
    clips.insert("default".to_string(), AnimationClip::looping(1, 0, 0, 10));
    clips
}

fn find_mut(entities: &mut [Entity], id: EntityId) -> Option<&mut Entity> {
    entities
        .iter_mut()
        .find(|entity| entity.id == id && !entity.should_remove)
}

/// Drives one fighter
#[derive(Debug)]
pub struct CharacterController {
    slot: PlayerSlot,
    kit: CharacterKind,
    entity: EntityId,
    stats: KitStats,
    arena: Arena,
    posture: PostureMachine,
    cooldowns: Cooldowns,
    jump: JumpState,
}

impl CharacterController {
    pub fn new(
        slot: PlayerSlot,
        kit: CharacterKind,
        entity: EntityId,
        stats: KitStats,
        arena: Arena,
    ) -> Self {
        Self {
            slot,
            kit,
            entity,
            stats,
            arena,
            posture: PostureMachine::new(),
            cooldowns: Cooldowns::default(),
            jump: JumpState::Grounded,
        }
    }

    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    pub fn kit(&self) -> CharacterKind {
        self.kit
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity
    }

    pub fn stats(&self) -> &KitStats {
        &self.stats
    }

    pub fn posture(&self) -> Posture {
        self.posture.state()
    }

    pub fn cooldowns(&self) -> Cooldowns {
        self.cooldowns
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    /// Count down cooldowns. Runs first in every tick.
    pub fn tick_timers(&mut self) {
        self.cooldowns.tick();
    }

    /// Apply one tick of input to this controller's fighter
    pub fn update(&mut self, input: &PlayerInput, entities: &mut [Entity], spawns: &mut SpawnQueue) {
        let Some(index) = entities
            .iter()
            .position(|entity| entity.id == self.entity && !entity.should_remove)
        else {
            return;
        };

        let intent = self.kit.map_input(input);
        self.finish_commit(&mut entities[index]);

        match self.posture.state() {
            Posture::Idle | Posture::Moving => {
                self.apply_movement(&mut entities[index], intent.movement);
                self.handle_triggers(index, &intent, entities, spawns);
            }
            Posture::Dashing {
                remaining,
                velocity,
            } => {
                let remaining = remaining.saturating_sub(1);
                if remaining > 0 {
                    entities[index].velocity = velocity;
                    self.posture.transition(Posture::Dashing {
                        remaining,
                        velocity,
                    });
                } else {
                    self.posture.transition(Posture::Idle);
                    self.apply_movement(&mut entities[index], intent.movement);
                }
            }
            Posture::MeleeAttack => {
                entities[index].velocity = Vec2::ZERO;
            }
            Posture::Charging {
                projectile,
                held_ticks,
            } => {
                if intent.special_held {
                    self.continue_charge(index, projectile, held_ticks + 1, entities);
                } else {
                    self.release_charge(index, projectile, held_ticks, entities);
                }
            }
            Posture::Blocking { shield } => {
                if intent.ability_held {
                    entities[index].velocity = Vec2::ZERO;
                } else {
                    self.lower_shield(index, shield, entities);
                    self.apply_movement(&mut entities[index], intent.movement);
                }
            }
        }

        self.update_jump(&mut entities[index], intent.jump);
    }

    /// Hand control back once a melee clip has played out
    fn finish_commit(&mut self, entity: &mut Entity) {
        if self.posture.state() != Posture::MeleeAttack {
            return;
        }
        if entity.animation.is_committed() && !entity.animation.is_finished() {
            return;
        }

        entity.reset_hitbox_offset();
        let next = entity.animation.next_state().to_string();
        entity.set_animation(&next);
        self.posture.transition(Posture::Idle);
    }

    fn apply_movement(&mut self, entity: &mut Entity, movement: Vec2) {
        entity.velocity = movement * self.stats.move_speed;
        if let Some(facing) = Facing::from_movement(movement) {
            entity.facing = facing;
        }
        self.posture.transition(if movement == Vec2::ZERO {
            Posture::Idle
        } else {
            Posture::Moving
        });
    }

    fn handle_triggers(
        &mut self,
        index: usize,
        intent: &Intent,
        entities: &mut [Entity],
        spawns: &mut SpawnQueue,
    ) {
        if intent.melee && self.try_melee(&mut entities[index]) {
            return;
        }

        let special_trigger = if self.kit.special().behavior().charged {
            intent.special_held
        } else {
            intent.special_pressed
        };
        if special_trigger && self.try_special(&mut entities[index], spawns) {
            return;
        }

        match self.kit.ability() {
            Ability::Dash if intent.ability_pressed => {
                self.try_dash(&mut entities[index]);
            }
            Ability::Block if intent.ability_held => {
                self.raise_shield(&mut entities[index], spawns);
            }
            _ => {}
        }
    }

    /// Start a swing toward the facing direction. Silent no-op on cooldown.
    fn try_melee(&mut self, entity: &mut Entity) -> bool {
        if self.cooldowns.melee > 0 {
            return false;
        }

        let state = entity.facing.hit_state();
        if !entity.animation.has_state(state) {
            log::warn!("{} {} has no `{}` clip", self.slot, self.kit, state);
            return false;
        }

        self.cooldowns.melee = self.stats.melee_cooldown;
        entity.has_dealt_damage = false;
        entity.hitbox_offset = entity.facing.unit_vector() * self.stats.hitbox_reach * entity.scale;
        entity.velocity = Vec2::ZERO;
        entity.set_animation(state);
        self.posture.transition(Posture::MeleeAttack);

        log::debug!("{} {} swings {}", self.slot, self.kit, state);
        true
    }

    /// Fire the kit's projectile, or start charging it
    fn try_special(&mut self, entity: &mut Entity, spawns: &mut SpawnQueue) -> bool {
        if self.cooldowns.special > 0 {
            return false;
        }

        let kind = self.kit.special();
        let id = spawns.reserve_id();

        if kind.behavior().charged {
            spawns.push(spawn_projectile(
                id,
                kind,
                entity,
                ChargeTier::One,
                Vec2::ZERO,
                true,
            ));
            entity.velocity = Vec2::ZERO;
            self.posture.transition(Posture::Charging {
                projectile: id,
                held_ticks: 0,
            });
        } else {
            // Moving fighters fire along their motion, idle ones along their facing
            let direction =
                entity.velocity.try_normalize().unwrap_or_else(|| entity.facing.unit_vector());
            let velocity = direction * kind.speed(ChargeTier::One);
            spawns.push(spawn_projectile(
                id,
                kind,
                entity,
                ChargeTier::One,
                velocity,
                false,
            ));
            self.cooldowns.special = self.stats.special_cooldown;
            log::debug!("{} {} fires {}", self.slot, self.kit, kind.name());
        }
        true
    }

    fn continue_charge(
        &mut self,
        index: usize,
        projectile: EntityId,
        held_ticks: u32,
        entities: &mut [Entity],
    ) {
        let tier = ChargeTier::from_held_ticks(held_ticks);
        if let Some(indicator) = find_mut(entities, projectile) {
            if let Some(kind) = indicator.kind.projectile() {
                indicator.charge_tier = tier;
                indicator.set_animation(kind.animation_for(tier));
            }
        }

        entities[index].velocity = Vec2::ZERO;
        self.posture.transition(Posture::Charging {
            projectile,
            held_ticks,
        });
    }

    fn release_charge(
        &mut self,
        index: usize,
        projectile: EntityId,
        held_ticks: u32,
        entities: &mut [Entity],
    ) {
        let tier = ChargeTier::from_held_ticks(held_ticks);
        let direction = entities[index].facing.unit_vector();

        if let Some(indicator) = find_mut(entities, projectile) {
            projectiles::launch(indicator, tier, direction);
            log::debug!(
                "{} {} releases a tier {} shot after {} ticks",
                self.slot,
                self.kit,
                tier.index() + 1,
                held_ticks
            );
        }

        self.cooldowns.special = self.stats.special_cooldown;
        self.posture.transition(Posture::Idle);
    }

    /// Burst along the facing direction. Silent no-op on cooldown.
    fn try_dash(&mut self, entity: &mut Entity) -> bool {
        if self.cooldowns.dash > 0 || self.stats.dash_duration == 0 {
            return false;
        }

        let velocity = entity.facing.unit_vector() * self.stats.dash_speed;
        self.cooldowns.dash = self.stats.dash_cooldown;
        entity.velocity = velocity;
        self.posture.transition(Posture::Dashing {
            remaining: self.stats.dash_duration,
            velocity,
        });
        true
    }

    fn raise_shield(&mut self, entity: &mut Entity, spawns: &mut SpawnQueue) {
        let id = spawns.reserve_id();
        let mut shield = Entity::new(
            id,
            EntityKind::Effect(EffectKind::BlockShield),
            Vec2::ZERO,
            AnimationPlayer::new(shield_animations(), "default"),
        )
        .with_size(entity.frame_size, entity.collision_size, entity.scale)
        .with_caster(entity.id)
        .attached();
        shield.center_on(entity.center());
        spawns.push(shield);

        entity.blocking = true;
        entity.velocity = Vec2::ZERO;
        self.posture.transition(Posture::Blocking { shield: id });
    }

    fn lower_shield(&mut self, index: usize, shield: EntityId, entities: &mut [Entity]) {
        entities[index].blocking = false;
        if let Some(shield) = find_mut(entities, shield) {
            shield.should_remove = true;
        }
        self.posture.transition(Posture::Idle);
    }

    /// Up-then-down arc over a fixed number of ticks, independent of posture
    fn update_jump(&mut self, entity: &mut Entity, jump_pressed: bool) {
        if self.kit.locomotion() != Locomotion::Grounded {
            return;
        }

        let speed = self.stats.jump_speed();
        let on_ground = entity.is_on_ground(&self.arena);

        if self.jump == JumpState::Grounded {
            if jump_pressed && speed > 0.0 && on_ground {
                self.jump = JumpState::Rising {
                    remaining: self.stats.jump_ticks,
                };
            } else {
                if !on_ground {
                    // Knocked off the ground: settle back down
                    entity.velocity.y = if speed > 0.0 {
                        speed
                    } else {
                        self.stats.move_speed.max(1.0)
                    };
                }
                return;
            }
        }

        match self.jump {
            JumpState::Rising { remaining } => {
                entity.velocity.y = -speed;
                self.jump = if remaining <= 1 {
                    JumpState::Falling {
                        remaining: self.stats.jump_ticks,
                    }
                } else {
                    JumpState::Rising {
                        remaining: remaining - 1,
                    }
                };
            }
            JumpState::Falling { remaining } => {
                entity.velocity.y = speed;
                self.jump = if remaining <= 1 {
                    JumpState::Grounded
                } else {
                    JumpState::Falling {
                        remaining: remaining - 1,
                    }
                };
            }
            JumpState::Grounded => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::kit::build_fighter;

    struct Rig {
        controller: CharacterController,
        entities: Vec<Entity>,
        spawns: SpawnQueue,
        arena: Arena,
    }

    impl Rig {
        fn new(kit: CharacterKind, slot: PlayerSlot, position: Vec2) -> Self {
            let arena = Arena::default();
            let mut spawns = SpawnQueue::new();
            let stats = kit.default_stats();
            let id = spawns.reserve_id();
            let fighter = build_fighter(id, slot, kit, &stats, kit.default_animations(), position);
            Self {
                controller: CharacterController::new(slot, kit, id, stats, arena),
                entities: vec![fighter],
                spawns,
                arena,
            }
        }

        fn grounded(kit: CharacterKind, slot: PlayerSlot, x: f32) -> Self {
            let y = Arena::default().ground_y - kit.default_stats().scaled_collision_size().y;
            Self::new(kit, slot, Vec2::new(x, y))
        }

        fn step(&mut self, held: &[Action]) {
            let input = PlayerInput::from_held(0, held);
            self.controller.tick_timers();
            self.controller
                .update(&input, &mut self.entities, &mut self.spawns);
            self.entities.extend(self.spawns.drain());
            for entity in &mut self.entities {
                entity.advance(&self.arena);
            }
        }

        fn idle(&mut self, ticks: u32) {
            for _ in 0..ticks {
                self.step(&[]);
            }
        }

        fn fighter(&self) -> &Entity {
            &self.entities[0]
        }
    }

    #[test]
    fn test_map_input_per_locomotion() {
        let input = PlayerInput::from_held(0, &[Action::MoveUp, Action::MoveLeft, Action::Special]);

        let flying = CharacterKind::Butterfly.map_input(&input);
        assert_eq!(flying.movement, Vec2::new(-1.0, -1.0));
        assert!(!flying.jump);
        assert!(flying.special_pressed && flying.special_held);

        let grounded = CharacterKind::Toaster.map_input(&input);
        assert_eq!(grounded.movement, Vec2::new(-1.0, 0.0));
        assert!(grounded.jump);
    }

    #[test]
    fn test_cooldowns_tick_independently() {
        let mut cooldowns = Cooldowns {
            melee: 2,
            special: 0,
            dash: 5,
        };
        cooldowns.tick();
        cooldowns.tick();
        cooldowns.tick();
        assert_eq!(
            cooldowns,
            Cooldowns {
                melee: 0,
                special: 0,
                dash: 2
            }
        );
    }

    #[test]
    fn test_movement_sets_velocity_and_facing() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.step(&[Action::MoveUp]);
        assert_eq!(rig.fighter().position, Vec2::new(100.0, 97.0));
        assert_eq!(rig.fighter().facing, Facing::Up);
        assert_eq!(rig.controller.posture(), Posture::Moving);

        rig.step(&[]);
        assert_eq!(rig.controller.posture(), Posture::Idle);
        assert_eq!(rig.fighter().velocity, Vec2::ZERO);
    }

    #[test]
    fn test_melee_swing_and_recovery() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.step(&[Action::Melee]);

        assert_eq!(rig.controller.posture(), Posture::MeleeAttack);
        assert_eq!(rig.controller.cooldowns().melee, 45);
        assert_eq!(rig.fighter().animation.current_state(), "hitRight");
        assert_eq!(rig.fighter().hitbox_offset, Vec2::new(4.5 * 4.5, 0.0));
        assert!(rig.fighter().is_swinging());

        // Movement is ignored mid-swing
        rig.step(&[Action::MoveDown]);
        assert_eq!(rig.fighter().position, Vec2::new(100.0, 100.0));

        rig.idle(39);
        assert_eq!(rig.controller.posture(), Posture::Idle);
        assert_eq!(rig.fighter().animation.current_state(), "idle");
        assert_eq!(rig.fighter().hitbox_offset, Vec2::ZERO);
    }

    #[test]
    fn test_melee_on_cooldown_is_silent() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.step(&[Action::Melee]);
        rig.idle(40);
        let cooldown = rig.controller.cooldowns().melee;
        assert!(cooldown > 0);

        rig.entities[0].has_dealt_damage = true;
        rig.step(&[Action::Melee]);

        assert_eq!(rig.fighter().animation.current_state(), "idle");
        assert!(rig.fighter().has_dealt_damage);
        assert_eq!(rig.fighter().hitbox_offset, Vec2::ZERO);
        assert_eq!(rig.controller.cooldowns().melee, cooldown - 1);
    }

    #[test]
    fn test_tornado_follows_motion_or_facing() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(300.0, 200.0));
        rig.step(&[Action::Special]);
        assert_eq!(rig.entities.len(), 2);
        assert_eq!(rig.entities[1].velocity, Vec2::new(2.0, 0.0));
        assert_eq!(rig.entities[1].caster, Some(rig.fighter().id));
        assert_eq!(rig.controller.cooldowns().special, 120);

        // Still cooling down
        rig.step(&[]);
        rig.step(&[Action::Special]);
        assert_eq!(rig.entities.len(), 2);

        let mut moving = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(300.0, 200.0));
        moving.step(&[Action::MoveDown, Action::Special]);
        assert_eq!(moving.entities[1].velocity, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_charge_and_release() {
        let mut rig = Rig::grounded(CharacterKind::Toaster, PlayerSlot::Two, 500.0);
        rig.step(&[Action::Special]);

        let toast_id = match rig.controller.posture() {
            Posture::Charging { projectile, .. } => projectile,
            other => panic!("expected charging, got {other:?}"),
        };
        assert!(rig.entities[1].attached);
        assert_eq!(rig.entities[1].id, toast_id);

        for _ in 0..61 {
            rig.step(&[Action::Special]);
        }
        assert_eq!(rig.entities[1].charge_tier, ChargeTier::Two);

        for _ in 0..60 {
            rig.step(&[Action::Special, Action::MoveLeft]);
        }
        assert_eq!(rig.entities[1].charge_tier, ChargeTier::Three);
        assert_eq!(rig.entities[1].lifetime, None);
        assert_eq!(rig.fighter().position.x, 500.0);

        rig.step(&[]);
        let toast = &rig.entities[1];
        assert!(!toast.attached);
        assert_eq!(toast.velocity, Vec2::new(-8.0, 0.0));
        assert_eq!(toast.lifetime, Some(89));
        assert_eq!(rig.controller.cooldowns().special, 90);
        assert_eq!(rig.controller.posture(), Posture::Idle);
    }

    #[test]
    fn test_quick_release_is_tier_one() {
        let mut rig = Rig::grounded(CharacterKind::Toaster, PlayerSlot::One, 100.0);
        rig.step(&[Action::Special]);
        rig.step(&[Action::Special]);
        rig.step(&[]);
        assert_eq!(rig.entities[1].charge_tier, ChargeTier::One);
        assert_eq!(rig.entities[1].velocity, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_dash_overrides_movement() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.step(&[Action::Ability]);
        assert!(matches!(rig.controller.posture(), Posture::Dashing { .. }));

        for _ in 0..9 {
            rig.step(&[Action::MoveUp]);
        }
        assert_eq!(rig.fighter().position, Vec2::new(200.0, 100.0));

        rig.step(&[]);
        assert_eq!(rig.controller.posture(), Posture::Idle);
        assert_eq!(rig.fighter().position, Vec2::new(200.0, 100.0));
        assert!(rig.controller.cooldowns().dash > 0);
    }

    #[test]
    fn test_dash_on_cooldown_is_ignored() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.controller.cooldowns.dash = 20;

        rig.step(&[Action::Ability]);
        assert_eq!(rig.controller.posture(), Posture::Idle);
        assert_eq!(rig.fighter().velocity, Vec2::ZERO);
        assert_eq!(rig.fighter().position, Vec2::new(100.0, 100.0));
        // Only the regular countdown moved
        assert_eq!(rig.controller.cooldowns().dash, 19);
    }

    #[test]
    fn test_block_holds_shield() {
        let mut rig = Rig::grounded(CharacterKind::Toaster, PlayerSlot::One, 100.0);
        rig.step(&[Action::Ability, Action::MoveRight]);
        rig.step(&[Action::Ability, Action::MoveRight]);

        assert!(rig.fighter().blocking);
        assert_eq!(rig.fighter().position.x, 100.0);
        assert_eq!(rig.entities.len(), 2);
        assert_eq!(
            rig.entities[1].kind,
            EntityKind::Effect(EffectKind::BlockShield)
        );
        assert_eq!(rig.entities[1].caster, Some(rig.fighter().id));

        rig.step(&[Action::MoveRight]);
        assert!(!rig.fighter().blocking);
        assert!(rig.entities[1].should_remove);
        assert_eq!(rig.fighter().position.x, 102.5);
    }

    #[test]
    fn test_jump_arc() {
        let mut rig = Rig::grounded(CharacterKind::Toaster, PlayerSlot::One, 100.0);
        let ground = rig.fighter().position.y;

        rig.step(&[Action::MoveUp]);
        for tick in 1..20 {
            // Pressing again mid-arc does nothing
            if tick == 10 {
                rig.step(&[Action::MoveUp]);
            } else {
                rig.step(&[]);
            }
        }
        assert_eq!(rig.fighter().position.y, ground - 60.0);

        rig.idle(20);
        assert_eq!(rig.fighter().position.y, ground);
        assert_eq!(rig.controller.jump_state(), JumpState::Grounded);
    }

    #[test]
    fn test_missing_fighter_is_ignored() {
        let mut rig = Rig::new(CharacterKind::Butterfly, PlayerSlot::One, Vec2::new(100.0, 100.0));
        rig.entities[0].should_remove = true;
        rig.step(&[Action::Special]);
        assert_eq!(rig.entities.len(), 1);
    }
}
