/// Static parallax layers. Each level has two rows of four images
/// (sky, far, middle, near) placed side by side; the renderer repeats
/// them across the scroll range.

use super::entity::Sprite;

pub const TILE_WIDTH: f32 = 720.0;
pub const TILE_HEIGHT: f32 = 480.0;

#[derive(Clone, Debug)]
pub struct BackgroundObject {
    pub sprite: Sprite,
}

impl BackgroundObject {
    pub fn new(img: &'static str, x: f32) -> Self {
        BackgroundObject {
            sprite: Sprite::new(img, x, 0.0, TILE_WIDTH, TILE_HEIGHT),
        }
    }

    /// One full layer row at `x`, back to front.
    pub fn layer(images: &[&'static str], x: f32) -> Vec<BackgroundObject> {
        images.iter().map(|img| BackgroundObject::new(img, x)).collect()
    }
}
