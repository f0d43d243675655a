// Engine modules: frame clock, input, collision, rendering contract

pub mod game_loop;
pub mod input;
pub mod physics;
pub mod renderer;
