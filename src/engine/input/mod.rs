// Input handling system
//
// The simulation only ever sees logical buttons per player. This module maps
// host key names onto those buttons and tracks press/release edges.
//
// ## Architecture
//
// - `action`: logical buttons and default key bindings
// - `player`: per-player button state, fed by events or by polled snapshots
// - `config`: key remapping per player
// - `manager`: routes host key events to players
//
// ## Usage Example
//
// ```rust
// use rusted_duel::engine::input::InputManager;
//
// let mut input = InputManager::new(2);
// input.key_down("p");
// // duel.tick(input.players());
// input.end_frame();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::{InputConfig, InputConfigManager};
pub use manager::InputManager;
pub use player::PlayerInput;
