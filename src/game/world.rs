// Match state and the per-tick scheduler
//
// A `Match` owns every entity. Controllers and the combat resolver change
// entity fields; only the match adds entities to or removes them from the
// active set.

use crate::engine::input::PlayerInput;
use crate::engine::renderer::{Renderer, SpriteView};
use crate::game::characters::{build_fighter, CharacterController};
use crate::game::combat::{self, CombatRules, HitEvent};
use crate::game::config::{ConfigError, MatchConfig, ResolvedKit};
use crate::game::entity::{Entity, EntityId, PlayerSlot, SpawnQueue};
use glam::Vec2;

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner(PlayerSlot),
    /// Both fighters fell on the same tick
    Draw,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Ticks completed, this one included
    pub tick: u64,
    pub hits: Vec<HitEvent>,
    pub knocked_out: Vec<PlayerSlot>,
    pub outcome: Option<MatchOutcome>,
}

/// One duel between two fighters
#[derive(Debug)]
pub struct Match {
    config: MatchConfig,
    kits: Vec<ResolvedKit>,
    rules: CombatRules,
    entities: Vec<Entity>,
    spawns: SpawnQueue,
    controllers: Vec<CharacterController>,
    outcome: Option<MatchOutcome>,
    tick_count: u64,
}

impl Match {
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let kits = PlayerSlot::ALL
            .iter()
            .map(|&slot| config.resolve_kit(slot))
            .collect::<Result<Vec<_>, _>>()?;

        let mut duel = Self {
            rules: CombatRules {
                separation: config.separation,
            },
            config,
            kits,
            entities: Vec::new(),
            spawns: SpawnQueue::new(),
            controllers: Vec::new(),
            outcome: None,
            tick_count: 0,
        };
        duel.setup();
        Ok(duel)
    }

    fn setup(&mut self) {
        self.entities.clear();
        self.controllers.clear();
        self.spawns = SpawnQueue::new();
        self.outcome = None;
        self.tick_count = 0;

        for kit in &self.kits {
            let id = self.spawns.reserve_id();
            self.entities.push(build_fighter(
                id,
                kit.slot,
                kit.kit,
                &kit.stats,
                kit.animations.clone(),
                kit.spawn,
            ));
            self.controllers.push(CharacterController::new(
                kit.slot,
                kit.kit,
                id,
                kit.stats.clone(),
                self.config.arena,
            ));
        }

        log::info!(
            "Match start: {} ({}) vs {} ({})",
            PlayerSlot::One,
            self.config.player_one.kit,
            PlayerSlot::Two,
            self.config.player_two.kit
        );
    }

    /// Tear everything down and start over from the same config
    pub fn restart(&mut self) {
        log::info!("Restarting match after {} ticks", self.tick_count);
        self.setup();
    }

    /// Run one simulation tick. `inputs` is indexed by player; missing
    /// players hold no buttons. A finished match no longer changes.
    pub fn tick(&mut self, inputs: &[PlayerInput]) -> TickReport {
        if let Some(outcome) = self.outcome {
            return TickReport {
                tick: self.tick_count,
                outcome: Some(outcome),
                ..TickReport::default()
            };
        }

        for controller in &mut self.controllers {
            controller.tick_timers();
        }

        let idle = PlayerInput::default();
        for controller in &mut self.controllers {
            let input = inputs.get(controller.slot().index()).unwrap_or(&idle);
            controller.update(input, &mut self.entities, &mut self.spawns);
        }

        self.entities.extend(self.spawns.drain());

        for entity in &mut self.entities {
            entity.advance(&self.config.arena);
        }

        self.sync_attached();

        let hits = combat::resolve(&mut self.entities, &self.rules, &self.config.arena);
        let knocked_out = self.record_defeats();

        self.entities.retain(|entity| !entity.should_remove);
        self.tick_count += 1;

        TickReport {
            tick: self.tick_count,
            hits,
            knocked_out,
            outcome: self.outcome,
        }
    }

    /// Tick, then hand the surviving entities to `renderer`
    pub fn step<R: Renderer + ?Sized>(&mut self, inputs: &[PlayerInput], renderer: &mut R) -> TickReport {
        let report = self.tick(inputs);
        renderer.draw(&self.sprite_views());
        report
    }

    /// Keep attached projectiles and shields centered on their casters
    fn sync_attached(&mut self) {
        let anchors: Vec<(EntityId, Vec2, bool)> = self
            .entities
            .iter()
            .filter(|entity| entity.kind.is_character())
            .map(|entity| (entity.id, entity.center(), entity.should_remove))
            .collect();

        for entity in self.entities.iter_mut().filter(|entity| entity.attached) {
            let anchor = entity
                .caster
                .and_then(|caster| anchors.iter().find(|(id, _, _)| *id == caster));
            match anchor {
                Some(&(_, center, false)) => entity.center_on(center),
                // Caster is gone: nothing left to hold this up
                _ => entity.should_remove = true,
            }
        }
    }

    fn record_defeats(&mut self) -> Vec<PlayerSlot> {
        let knocked_out: Vec<PlayerSlot> = self
            .controllers
            .iter()
            .filter(|controller| {
                self.entities
                    .iter()
                    .find(|entity| entity.id == controller.entity_id())
                    .map_or(true, |entity| !entity.is_alive())
            })
            .map(|controller| controller.slot())
            .collect();

        for slot in &knocked_out {
            log::info!("{} is knocked out", slot);
        }

        self.outcome = match knocked_out.as_slice() {
            [] => None,
            [loser] => Some(MatchOutcome::Winner(loser.other())),
            _ => Some(MatchOutcome::Draw),
        };
        if let Some(outcome) = self.outcome {
            log::info!("Match over after {} ticks: {:?}", self.tick_count + 1, outcome);
        }

        knocked_out
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Active entities in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn controller(&self, slot: PlayerSlot) -> Option<&CharacterController> {
        self.controllers.iter().find(|controller| controller.slot() == slot)
    }

    pub fn character(&self, slot: PlayerSlot) -> Option<&Entity> {
        let id = self.controller(slot)?.entity_id();
        self.entity(id)
    }

    /// Direct access to a fighter, for hosts that script or debug a match
    pub fn character_mut(&mut self, slot: PlayerSlot) -> Option<&mut Entity> {
        let id = self.controller(slot)?.entity_id();
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sprite_views(&self) -> Vec<SpriteView> {
        self.entities.iter().map(Entity::sprite_view).collect()
    }
}
