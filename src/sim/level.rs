/// Level definitions.
///
/// A level is a fixed set of entity collections plus the right-hand bound
/// of the character's walk. Collections never shrink: dead chickens and
/// picked-up items stay in place and are filtered by their flags.
///
/// Randomness (chicken spawn spots and speeds, cloud positions) comes from
/// the caller's RNG so a seeded session replays the same level.

use rand::Rng;

use crate::domain::background::{BackgroundObject, TILE_WIDTH};
use crate::domain::chicken::{Chicken, ChickenKind};
use crate::domain::cloud::Cloud;
use crate::domain::collectable::Collectable;
use crate::domain::endboss::Endboss;
use crate::domain::enemy::Enemy;

const LAYER_ONE: [&str; 4] = [
    "img/5_background/layers/air.png",
    "img/5_background/layers/3_third_layer/1.png",
    "img/5_background/layers/2_second_layer/1.png",
    "img/5_background/layers/1_first_layer/1.png",
];

const LAYER_TWO: [&str; 4] = [
    "img/5_background/layers/air.png",
    "img/5_background/layers/3_third_layer/2.png",
    "img/5_background/layers/2_second_layer/2.png",
    "img/5_background/layers/1_first_layer/2.png",
];

/// Five screens plus a little run-out.
pub const LEVEL_END_X: f32 = TILE_WIDTH * 5.0 + 100.0;

const COIN_SPOTS: [(f32, f32); 5] = [
    (300.0, 100.0),
    (500.0, 100.0),
    (700.0, 100.0),
    (900.0, 150.0),
    (1200.0, 100.0),
];

#[derive(Clone, Debug)]
pub struct Level {
    pub enemies: Vec<Enemy>,
    pub clouds: Vec<Cloud>,
    pub background: Vec<BackgroundObject>,
    pub background2: Vec<BackgroundObject>,
    pub coins: Vec<Collectable>,
    pub bottles: Vec<Collectable>,
    pub level_end_x: f32,
}

impl Level {
    /// Backgrounds and bounds only; callers add what they need.
    pub fn bare() -> Self {
        Level {
            enemies: Vec::new(),
            clouds: Vec::new(),
            background: BackgroundObject::layer(&LAYER_ONE, 0.0),
            background2: BackgroundObject::layer(&LAYER_TWO, TILE_WIDTH),
            coins: Vec::new(),
            bottles: Vec::new(),
            level_end_x: LEVEL_END_X,
        }
    }

    pub fn level_one<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut level = Level::bare();

        let kinds = [ChickenKind::Normal; 4].into_iter().chain([ChickenKind::Small; 4]);
        level.enemies = kinds
            .map(|k| Enemy::Chicken(Chicken::spawn(k, rng)))
            .chain(std::iter::once(Enemy::Endboss(Endboss::new())))
            .collect();

        level.clouds = (0..2).map(|_| Cloud::spawn(rng)).collect();
        level.coins = COIN_SPOTS.iter().map(|&(x, y)| Collectable::coin(x, y)).collect();
        level.bottles = (400..=2800).step_by(200).map(|x| Collectable::bottle(x as f32)).collect();

        level
    }

    pub fn endboss(&self) -> Option<&Endboss> {
        self.enemies.iter().find_map(Enemy::as_endboss)
    }
}
