// Fighting-game simulation: entities, animation, kits, combat and the match loop

pub mod animation;
pub mod characters;
pub mod combat;
pub mod config;
pub mod entity;
pub mod projectiles;
pub mod world;

pub use config::{ConfigError, MatchConfig};
pub use entity::{Arena, Entity, EntityId, EntityKind, PlayerSlot};
pub use world::{Match, MatchOutcome, TickReport};
