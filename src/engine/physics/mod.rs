// Axis-aligned collision and positional resolution
//
// The arena has no rigid-body physics: the ground is a fixed Y clamp and
// bodies are pushed apart along the axis of least penetration.

mod collision;

pub use collision::{
    overlaps, penetration, resolve_pair, separate, Axis, Collider, Push, Rect,
    SeparationPolicy, SEPARATION_EPSILON,
};
