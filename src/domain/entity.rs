/// Shared building blocks for everything placed in the world.
///
/// A `Sprite` is the drawable part: position, size, and which image is
/// currently shown. Animations are static frame lists; advancing one
/// wraps the frame counter modulo the list length. Images are referred
/// to by path keys; the surface that draws them owns any decoding/cache.

use super::geometry::Rect;

/// Stable handle for entities that own timers.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EntityId(pub u32);

/// Ordered image keys making up one animation.
pub type FrameSet = &'static [&'static str];

#[derive(Clone, Debug)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Monotonic frame counter; the shown frame is `current_image % len`.
    pub current_image: usize,
    pub img: &'static str,
    /// Render horizontally mirrored (facing left).
    pub mirrored: bool,
}

impl Sprite {
    pub fn new(img: &'static str, x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Sprite {
            x, y, width, height,
            current_image: 0,
            img,
            mirrored: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Show the next frame of `frames`.
    pub fn play(&mut self, frames: FrameSet) {
        if frames.is_empty() {
            return;
        }
        self.img = frames[self.current_image % frames.len()];
        self.current_image += 1;
    }

    /// Show a single still image without touching the frame counter.
    pub fn show(&mut self, img: &'static str) {
        self.img = img;
    }

    pub fn reset_frames(&mut self) {
        self.current_image = 0;
    }
}
