// Read-only sprite views handed to the host renderer

use crate::engine::physics::Rect;
use glam::Vec2;

/// Everything a renderer needs to blit one entity for the current tick
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    /// Entity this view was taken from
    pub entity_id: u32,
    /// Short label for the sprite sheet to use (e.g. "butterfly", "toast")
    pub sheet: &'static str,
    /// Name of the animation clip being played
    pub animation: String,
    /// Top-left of the collision box
    pub position: Vec2,
    /// Box used for collision this tick, including any hitbox offset
    pub collision_box: Rect,
    /// Where the frame is drawn, concentric with the collision box
    pub visual_rect: Rect,
    /// Absolute frame index in the sprite sheet
    pub frame_index: u32,
    /// Frames per row in the sprite sheet
    pub frames_per_row: u32,
    /// Unscaled frame size in sheet pixels
    pub frame_size: Vec2,
    /// Draw scale
    pub scale: f32,
    /// False during the off half of an invincibility flash
    pub visible: bool,
}

impl SpriteView {
    /// Source rectangle of the current frame in sheet pixels
    pub fn source_rect(&self) -> Rect {
        let columns = self.frames_per_row.max(1);
        let col = self.frame_index % columns;
        let row = self.frame_index / columns;
        Rect::new(
            col as f32 * self.frame_size.x,
            row as f32 * self.frame_size.y,
            self.frame_size.x,
            self.frame_size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(frame_index: u32, frames_per_row: u32) -> SpriteView {
        SpriteView {
            entity_id: 1,
            sheet: "test",
            animation: "idle".to_string(),
            position: Vec2::ZERO,
            collision_box: Rect::new(0.0, 0.0, 8.0, 8.0),
            visual_rect: Rect::new(0.0, 0.0, 16.0, 16.0),
            frame_index,
            frames_per_row,
            frame_size: Vec2::new(16.0, 16.0),
            scale: 1.0,
            visible: true,
        }
    }

    #[test]
    fn test_source_rect_wraps_rows() {
        let first = view(0, 6).source_rect();
        assert_eq!(first.min, Vec2::ZERO);

        // Frame 19 on a 6-wide sheet: column 1, row 3
        let hit = view(19, 6).source_rect();
        assert_eq!(hit.min, Vec2::new(16.0, 48.0));
        assert_eq!(hit.size, Vec2::new(16.0, 16.0));
    }
}
