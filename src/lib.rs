// Rusted Duel: simulation core for a two-player 2D arena fighter
//
// - `engine`: frame clock, input mapping, box collision, rendering contract
// - `game`: entities, animation, fighter kits, combat rules, the match loop
// - `common`: small math helpers

pub mod common;
pub mod engine;
pub mod game;
