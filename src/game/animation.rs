// Sprite animation state machine
//
// Every entity carries a table of named clips over one sprite sheet. Clip
// timing is counted in simulation ticks, never in wall time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Named clips available to one entity
pub type AnimationTable = BTreeMap<String, AnimationClip>;

/// A frame range on a sprite sheet and how to play it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Frames per row in the sprite sheet
    pub frames_per_row: u32,
    /// First frame index (inclusive)
    pub start: u32,
    /// Last frame index (inclusive)
    pub end: u32,
    /// Ticks each frame stays on screen
    pub speed: u32,
    /// Whether the clip wraps back to `start`
    #[serde(default = "default_looping")]
    pub looping: bool,
    /// State the owning controller switches to once a non-looping clip ends
    #[serde(default)]
    pub next_state: Option<String>,
}

fn default_looping() -> bool {
    true
}

impl AnimationClip {
    /// Create a looping clip
    pub fn looping(frames_per_row: u32, start: u32, end: u32, speed: u32) -> Self {
        Self {
            frames_per_row,
            start,
            end,
            speed,
            looping: true,
            next_state: None,
        }
    }

    /// Create a commit clip: plays once, then hands over to `next_state`
    pub fn commit(frames_per_row: u32, start: u32, end: u32, speed: u32, next_state: &str) -> Self {
        Self {
            frames_per_row,
            start,
            end,
            speed,
            looping: false,
            next_state: Some(next_state.to_string()),
        }
    }

    /// Number of frames in the clip
    pub fn frame_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    /// Ticks needed to play the clip once from its first frame to its last
    pub fn duration_ticks(&self) -> u32 {
        (self.frame_count() - 1) * self.speed.max(1)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("unknown animation state `{0}`")]
    UnknownState(String),
}

/// Plays clips out of an [`AnimationTable`]
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clips: AnimationTable,
    current_state: String,
    current_frame: u32,
    /// Ticks spent on the current frame
    tick_counter: u32,
}

impl AnimationPlayer {
    /// Create a player showing `initial`. Falls back to the first clip in the
    /// table when `initial` is missing.
    pub fn new(clips: AnimationTable, initial: &str) -> Self {
        let current_state = if clips.contains_key(initial) {
            initial.to_string()
        } else {
            clips.keys().next().cloned().unwrap_or_default()
        };
        let current_frame = clips.get(&current_state).map_or(0, |clip| clip.start);

        Self {
            clips,
            current_state,
            current_frame,
            tick_counter: 0,
        }
    }

    /// Switch to `state`. Re-requesting the looping clip already playing keeps
    /// its progress; anything else restarts from the clip's first frame.
    pub fn play(&mut self, state: &str) -> Result<(), AnimationError> {
        let clip = self
            .clips
            .get(state)
            .ok_or_else(|| AnimationError::UnknownState(state.to_string()))?;

        if self.current_state == state && clip.looping {
            return Ok(());
        }

        self.current_frame = clip.start;
        self.tick_counter = 0;
        if self.current_state != state {
            self.current_state = state.to_string();
        }
        Ok(())
    }

    /// Advance by one tick
    pub fn update(&mut self) {
        let Some(clip) = self.clips.get(&self.current_state) else {
            return;
        };

        self.tick_counter += 1;
        if self.tick_counter < clip.speed.max(1) {
            return;
        }
        self.tick_counter = 0;

        if self.current_frame < clip.end {
            self.current_frame += 1;
        } else if clip.looping {
            self.current_frame = clip.start;
        }
        // Non-looping clips hold their last frame
    }

    /// Whether a non-looping clip has reached its last frame
    pub fn is_finished(&self) -> bool {
        self.current_clip()
            .is_some_and(|clip| !clip.looping && self.current_frame >= clip.end)
    }

    /// Whether the current clip is a commit clip
    pub fn is_committed(&self) -> bool {
        self.current_clip().is_some_and(|clip| !clip.looping)
    }

    /// Where to go once the current commit clip ends
    pub fn next_state(&self) -> &str {
        self.current_clip()
            .and_then(|clip| clip.next_state.as_deref())
            .unwrap_or("idle")
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.clips.get(&self.current_state)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.clips.contains_key(state)
    }

    /// Frames per row of the sheet the current clip is cut from
    pub fn frames_per_row(&self) -> u32 {
        self.current_clip().map_or(1, |clip| clip.frames_per_row)
    }
}
