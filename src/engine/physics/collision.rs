use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Gap left between two boxes after separation so that the inclusive
/// overlap test no longer reports them as touching
pub const SEPARATION_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle in arena pixels. `min` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Rectangle of `size` sharing its center with `center`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Inclusive intersection test: rectangles that only touch count
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }

    /// Overlap extent on each axis. Negative components mean a gap on that axis.
    pub fn overlap(&self, other: &Rect) -> Vec2 {
        self.max().min(other.max()) - self.min.max(other.min)
    }

    /// Whether this rectangle lies entirely inside `bounds`
    pub fn is_within(&self, bounds: &Rect) -> bool {
        let (max, bounds_max) = (self.max(), bounds.max());
        self.min.x >= bounds.min.x
            && self.min.y >= bounds.min.y
            && max.x <= bounds_max.x
            && max.y <= bounds_max.y
    }
}

/// Axis a separation push acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Minimum translation moving one box out of another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Push {
    pub delta: Vec2,
    pub axis: Axis,
}

impl Push {
    fn scaled(self, factor: f32) -> Self {
        Self {
            delta: self.delta * factor,
            axis: self.axis,
        }
    }
}

/// Anything with a collision box that the resolution engine can move
pub trait Collider {
    /// The box used by every overlap test
    fn collision_box(&self) -> Rect;

    /// Whether the collider takes part in collision this tick
    fn is_collidable(&self) -> bool;

    /// Move by `push.delta` and stop any motion along `push.axis`
    fn displace(&mut self, push: Push);
}

/// How two overlapping bodies are pushed apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationPolicy {
    /// Both bodies move half the distance
    Symmetric,
    /// Only the first body of the pair moves
    FirstYields,
    /// Only the second body of the pair moves
    SecondYields,
}

impl SeparationPolicy {
    /// The lighter body yields; equal weights bounce apart symmetrically
    pub fn from_weights(first: f32, second: f32) -> Self {
        if first < second {
            Self::FirstYields
        } else if second < first {
            Self::SecondYields
        } else {
            Self::Symmetric
        }
    }
}

/// True iff both colliders are active and their boxes intersect (touching counts)
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    a.is_collidable() && b.is_collidable() && a.collision_box().intersects(&b.collision_box())
}

/// Translation that moves `a` out of `b` along the axis of least penetration
pub fn penetration(a: &Rect, b: &Rect) -> Option<Push> {
    if !a.intersects(b) {
        return None;
    }

    let overlap = a.overlap(b);
    let (a_center, b_center) = (a.center(), b.center());

    let push = if overlap.x < overlap.y {
        let sign = if a_center.x < b_center.x { -1.0 } else { 1.0 };
        Push {
            delta: Vec2::new(sign * (overlap.x + SEPARATION_EPSILON), 0.0),
            axis: Axis::X,
        }
    } else {
        let sign = if a_center.y < b_center.y { -1.0 } else { 1.0 };
        Push {
            delta: Vec2::new(0.0, sign * (overlap.y + SEPARATION_EPSILON)),
            axis: Axis::Y,
        }
    };

    Some(push)
}

/// One-sided push: moves `a` out of `b`, zeroing `a`'s velocity on that axis.
/// `b` is never touched. Returns whether a push happened.
pub fn separate<A, B>(a: &mut A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    match penetration(&a.collision_box(), &b.collision_box()) {
        Some(push) => {
            a.displace(push);
            true
        }
        None => false,
    }
}

/// Separate an overlapping pair according to `policy`
pub fn resolve_pair<A, B>(a: &mut A, b: &mut B, policy: SeparationPolicy) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    match policy {
        SeparationPolicy::FirstYields => separate(a, b),
        SeparationPolicy::SecondYields => separate(b, a),
        SeparationPolicy::Symmetric => {
            let Some(push) = penetration(&a.collision_box(), &b.collision_box()) else {
                return false;
            };
            a.displace(push.scaled(0.5));
            b.displace(push.scaled(-0.5));
            true
        }
    }
}
