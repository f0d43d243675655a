// Per-player input state management

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Logical button state for a single player, with press/release edges
#[derive(Debug, Clone, Default)]
pub struct PlayerInput {
    /// Player index (0 or 1)
    player_id: usize,

    /// Buttons currently held
    pressed: HashSet<Action>,

    /// Buttons that went down since the last frame
    just_pressed: HashSet<Action>,

    /// Buttons that went up since the last frame
    just_released: HashSet<Action>,

    /// Buttons held on the previous frame
    previous_pressed: HashSet<Action>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    /// Input whose held buttons were all pressed this frame
    pub fn from_held(player_id: usize, held: &[Action]) -> Self {
        let mut input = Self::new(player_id);
        input.apply_snapshot(held.iter().copied());
        input
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if a button is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if a button went down this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if a button went up this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if a button has been held for more than one frame
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Replace the held set with a polled snapshot, deriving edges from the
    /// previous snapshot
    pub fn apply_snapshot<I>(&mut self, held: I)
    where
        I: IntoIterator<Item = Action>,
    {
        self.previous_pressed = std::mem::take(&mut self.pressed);
        self.pressed = held.into_iter().collect();
        self.just_pressed = self
            .pressed
            .difference(&self.previous_pressed)
            .copied()
            .collect();
        self.just_released = self
            .previous_pressed
            .difference(&self.pressed)
            .copied()
            .collect();
    }

    /// Register a button press event
    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register a button release event
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Close the frame: clear edges and remember what was held
    pub(crate) fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
    }

    /// Directional input in screen space (x right, y down). Left and up win
    /// over their opposites when both are held.
    pub fn direction(&self) -> Vec2 {
        let x = if self.is_pressed(Action::MoveLeft) {
            -1.0
        } else if self.is_pressed(Action::MoveRight) {
            1.0
        } else {
            0.0
        };
        let y = if self.is_pressed(Action::MoveUp) {
            -1.0
        } else if self.is_pressed(Action::MoveDown) {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}
