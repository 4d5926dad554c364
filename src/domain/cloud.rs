/// Drifting background cloud.

use rand::Rng;

use super::entity::{EntityId, Sprite};

pub const MOVEMENT_TICK_MS: u64 = 7;
pub const DRIFT_SPEED: f32 = 0.15;

const IMAGE: &str = "img/5_background/layers/4_clouds/1.png";

#[derive(Clone, Debug)]
pub struct Cloud {
    pub id: EntityId,
    pub sprite: Sprite,
    pub speed: f32,
}

impl Cloud {
    pub fn new(x: f32) -> Self {
        Cloud {
            id: EntityId::default(),
            sprite: Sprite::new(IMAGE, x, 20.0, 500.0, 250.0),
            speed: DRIFT_SPEED,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Cloud::new(rng.gen::<f32>() * 500.0)
    }

    pub fn drift(&mut self) {
        self.sprite.x -= self.speed;
    }
}
