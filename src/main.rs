use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::collections::HashSet;
use std::path::PathBuf;

use rusted_duel::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use rusted_duel::engine::input::{Action, InputManager};
use rusted_duel::engine::renderer::{Renderer, SpriteView};
use rusted_duel::game::characters::{CharacterKind, Locomotion};
use rusted_duel::game::{Match, MatchConfig, MatchOutcome, PlayerSlot};

/// Run a headless duel between two scripted fighters
#[derive(Parser, Debug)]
#[command(name = "rusted-duel", version, about)]
struct Args {
    /// Kit for player one (butterfly or toaster)
    #[arg(long)]
    p1: Option<CharacterKind>,

    /// Kit for player two (butterfly or toaster)
    #[arg(long)]
    p2: Option<CharacterKind>,

    /// Stop after this many ticks if nobody has won
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// JSON match config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace ticks with the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

/// Logs a summary of what it would draw
struct LogRenderer {
    every: u64,
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, sprites: &[SpriteView]) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }

        for sprite in sprites {
            log::debug!(
                "frame {}: {} #{} `{}` frame {} at ({:.1}, {:.1}){}",
                self.frames,
                sprite.sheet,
                sprite.entity_id,
                sprite.animation,
                sprite.frame_index,
                sprite.position.x,
                sprite.position.y,
                if sprite.visible { "" } else { " (hidden)" }
            );
        }
    }
}

/// Scripted player that presses keys like a (not very clever) human
struct Pilot {
    slot: PlayerSlot,
    held: HashSet<Action>,
}

impl Pilot {
    fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            held: HashSet::new(),
        }
    }

    /// Buttons to hold this tick
    fn plan(&self, duel: &Match) -> HashSet<Action> {
        let mut plan = HashSet::new();
        let (Some(me), Some(foe)) = (duel.character(self.slot), duel.character(self.slot.other()))
        else {
            return plan;
        };
        let Some(controller) = duel.controller(self.slot) else {
            return plan;
        };

        let tick = duel.tick_count();
        let delta = foe.center() - me.center();
        let distance = delta.length();

        if delta.x.abs() > 60.0 {
            plan.insert(if delta.x < 0.0 {
                Action::MoveLeft
            } else {
                Action::MoveRight
            });
        }
        if controller.kit().locomotion() == Locomotion::Flying && delta.y.abs() > 20.0 {
            plan.insert(if delta.y < 0.0 {
                Action::MoveUp
            } else {
                Action::MoveDown
            });
        }

        if distance < 90.0 && tick % 20 == 0 {
            plan.insert(Action::Melee);
        }

        match controller.kit() {
            CharacterKind::Butterfly => {
                if tick % 90 == 45 {
                    plan.insert(Action::Special);
                }
                if distance > 250.0 && tick % 150 == 0 {
                    plan.insert(Action::Ability);
                }
            }
            CharacterKind::Toaster => {
                if distance > 200.0 && tick % 240 < 100 {
                    plan.insert(Action::Special);
                }
                if distance < 120.0 && tick % 60 < 25 {
                    plan.insert(Action::Ability);
                }
                if tick % 180 == 90 {
                    plan.insert(Action::MoveUp);
                }
            }
        }

        plan
    }

    /// Turn the plan into key events against the player's bindings
    fn press_keys(&mut self, plan: HashSet<Action>, input: &mut InputManager) {
        let player_id = self.slot.index();

        for action in self.held.difference(&plan) {
            if let Some(key) = input.keys_for(player_id, *action).first().cloned() {
                input.key_up(key.name());
            }
        }
        for action in plan.difference(&self.held) {
            if let Some(key) = input.keys_for(player_id, *action).first().cloned() {
                input.key_down(key.name());
            }
        }

        self.held = plan;
    }
}

fn load_config(args: &Args) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load match config {}", path.display()))?,
        None => MatchConfig::default(),
    };

    if let Some(kit) = args.p1 {
        config.player_one.kit = kit;
    }
    if let Some(kit) = args.p2 {
        config.player_two.kit = kit;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    info!("Starting Rusted Duel...");

    let config = load_config(&args)?;
    let mut duel = Match::new(config).context("Invalid match setup")?;

    let mut input = InputManager::default();
    let mut pilots = [Pilot::new(PlayerSlot::One), Pilot::new(PlayerSlot::Two)];
    let mut renderer = LogRenderer {
        every: 60,
        frames: 0,
    };
    let mut clock = GameLoop::new();

    while !duel.is_over() && duel.tick_count() < args.ticks {
        let ticks = if args.realtime {
            std::thread::sleep(FIXED_TIMESTEP / 2);
            clock.begin_frame()
        } else {
            clock.advance(FIXED_TIMESTEP)
        };

        for _ in 0..ticks {
            for pilot in &mut pilots {
                let plan = pilot.plan(&duel);
                pilot.press_keys(plan, &mut input);
            }

            let report = duel.step(input.players(), &mut renderer);
            input.end_frame();

            if report.outcome.is_some() || duel.tick_count() >= args.ticks {
                break;
            }
        }
    }

    let health = |slot| duel.character(slot).map_or(0, |fighter| fighter.health);
    match duel.outcome() {
        Some(MatchOutcome::Winner(slot)) => info!(
            "{} ({}) wins after {} ticks with {} health left",
            slot,
            duel.config().player(slot).kit,
            duel.tick_count(),
            health(slot)
        ),
        Some(MatchOutcome::Draw) => info!("Double knockout after {} ticks", duel.tick_count()),
        None => info!(
            "Time up after {} ticks: P1 {} / P2 {}",
            duel.tick_count(),
            health(PlayerSlot::One),
            health(PlayerSlot::Two)
        ),
    }

    Ok(())
}
