// Rendering contract
//
// Drawing lives in the host. Once per tick the simulation hands the renderer
// a read-only view of every surviving entity, in insertion order.

mod sprite;

pub use sprite::SpriteView;

/// Host-side drawing backend
pub trait Renderer {
    /// Draw one frame. Views are ordered back to front.
    fn draw(&mut self, sprites: &[SpriteView]);
}

/// Renderer that keeps the last frame it was given, for headless hosts and tests
#[derive(Debug, Default)]
pub struct FrameRecorder {
    last_frame: Vec<SpriteView>,
    frames_drawn: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> &[SpriteView] {
        &self.last_frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, sprites: &[SpriteView]) {
        self.last_frame = sprites.to_vec();
        self.frames_drawn += 1;
    }
}
