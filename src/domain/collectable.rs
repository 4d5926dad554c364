/// Pickups lying in the level: coins and salsa bottles.
///
/// `collected` is a one-shot latch: the first successful `collect()`
/// flips it, every later call is a no-op, so a pickup can never be
/// counted twice no matter how many checks overlap it.

use super::entity::Sprite;
use super::geometry::{Hitboxed, Insets, Rect};

const COIN_IMAGE: &str = "img/8_coin/coin_1.png";
const COIN_SIZE: f32 = 175.0;

const BOTTLE_IMAGE: &str = "img/6_salsa_bottle/1_salsa_bottle_on_ground.png";
const BOTTLE_SIZE: f32 = 80.0;
pub const BOTTLE_GROUND_Y: f32 = 350.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollectableKind {
    Coin,
    Bottle,
}

#[derive(Clone, Debug)]
pub struct Collectable {
    pub kind: CollectableKind,
    pub sprite: Sprite,
    pub collected: bool,
}

impl Collectable {
    pub fn coin(x: f32, y: f32) -> Self {
        Collectable {
            kind: CollectableKind::Coin,
            sprite: Sprite::new(COIN_IMAGE, x, y, COIN_SIZE, COIN_SIZE),
            collected: false,
        }
    }

    pub fn bottle(x: f32) -> Self {
        Collectable {
            kind: CollectableKind::Bottle,
            sprite: Sprite::new(BOTTLE_IMAGE, x, BOTTLE_GROUND_Y, BOTTLE_SIZE, BOTTLE_SIZE),
            collected: false,
        }
    }

    /// Mark as picked up. Returns true only the first time.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

impl Hitboxed for Collectable {
    fn bounds(&self) -> Rect {
        self.sprite.rect()
    }

    fn insets(&self) -> Insets {
        let w = self.sprite.width;
        let h = self.sprite.height;
        match self.kind {
            CollectableKind::Coin => Insets::new(w * 0.3, w * 0.3, h * 0.3, h * 0.3),
            CollectableKind::Bottle => Insets::new(w * 0.65, w * 0.4, h * 0.15, h * 0.075),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_latches() {
        let mut c = Collectable::coin(300.0, 100.0);
        assert!(c.collect());
        assert!(!c.collect());
        assert!(c.collected);
    }

    #[test]
    fn coin_hitbox_is_the_middle_two_fifths() {
        let hb = Collectable::coin(0.0, 0.0).hitbox();
        for (got, want) in [(hb.x, 52.5), (hb.y, 52.5), (hb.width, 70.0), (hb.height, 70.0)] {
            assert!((got - want).abs() < 1e-3, "{got} != {want}");
        }
    }

    #[test]
    fn bottle_hitbox_hugs_the_neck() {
        let hb = Collectable::bottle(400.0).hitbox();
        assert!((hb.x - 452.0).abs() < 1e-3);
        assert!((hb.right() - 448.0).abs() < 1e-3);
    }

    #[test]
    fn inverted_bottle_hitbox_still_catches_a_passing_body() {
        let bottle = Collectable::bottle(400.0);
        let body = Rect::new(440.0, 300.0, 20.0, 100.0);
        assert!(body.overlaps(&bottle.hitbox()));
        let beside = Rect::new(449.0, 300.0, 2.0, 100.0);
        assert!(!beside.overlaps(&bottle.hitbox()));
    }
}
