// Character system
//
// This module contains everything related to playable fighters:
// - Kits: selectable fighters, their stats and animation tables
// - Posture state machine
// - Controllers mapping input to kit actions

pub mod controller;
pub mod kit;
pub mod state;

// Re-export commonly used types
pub use controller::{CharacterController, Cooldowns, Intent, JumpState};
pub use kit::{build_fighter, Ability, CharacterKind, KitOverrides, KitStats, Locomotion, UnknownKit};
pub use state::{Posture, PostureMachine};
