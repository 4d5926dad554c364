/// Chicken enemies, normal and small.
///
/// Chickens walk left at a per-instance speed and die from a single stomp
/// or bottle. A dead chicken keeps its corpse image and stays in the enemy
/// list; the renderer stops drawing it a second after death.

use rand::Rng;

use super::entity::{EntityId, FrameSet, Sprite};
use super::geometry::{Hitboxed, Insets, Rect};

pub const MOVEMENT_TICK_MS: u64 = 7;
pub const ANIMATION_TICK_MS: u64 = 100;

/// Feet line shared by both sizes: `y = FEET_Y - height`.
const FEET_Y: f32 = 435.0;
const SPAWN_MIN_X: f32 = 600.0;
const SPAWN_RANGE_X: f32 = 3000.0;
const MIN_SPEED: f32 = 0.1;
const SPEED_RANGE: f32 = 0.25;

const NORMAL_WALK: FrameSet = &[
    "img/3_enemies_chicken/chicken_normal/1_walk/1_w.png",
    "img/3_enemies_chicken/chicken_normal/1_walk/2_w.png",
    "img/3_enemies_chicken/chicken_normal/1_walk/3_w.png",
];
const NORMAL_DEAD: &str = "img/3_enemies_chicken/chicken_normal/2_dead/dead.png";

const SMALL_WALK: FrameSet = &[
    "img/3_enemies_chicken/chicken_small/1_walk/1_w.png",
    "img/3_enemies_chicken/chicken_small/1_walk/2_w.png",
    "img/3_enemies_chicken/chicken_small/1_walk/3_w.png",
];
const SMALL_DEAD: &str = "img/3_enemies_chicken/chicken_small/2_dead/dead.png";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChickenKind {
    Normal,
    Small,
}

impl ChickenKind {
    fn size(self) -> (f32, f32) {
        match self {
            ChickenKind::Normal => (70.0, 100.0),
            ChickenKind::Small => (60.0, 80.0),
        }
    }

    fn walk_frames(self) -> FrameSet {
        match self {
            ChickenKind::Normal => NORMAL_WALK,
            ChickenKind::Small => SMALL_WALK,
        }
    }

    fn dead_image(self) -> &'static str {
        match self {
            ChickenKind::Normal => NORMAL_DEAD,
            ChickenKind::Small => SMALL_DEAD,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Chicken {
    pub id: EntityId,
    pub kind: ChickenKind,
    pub sprite: Sprite,
    pub speed: f32,
    pub is_dead: bool,
    pub dead_at: Option<u64>,
}

impl Chicken {
    pub fn new(kind: ChickenKind, x: f32, speed: f32) -> Self {
        let (w, h) = kind.size();
        let frames = kind.walk_frames();
        Chicken {
            id: EntityId::default(),
            kind,
            sprite: Sprite::new(frames[0], x, FEET_Y - h, w, h),
            speed,
            is_dead: false,
            dead_at: None,
        }
    }

    /// Random x somewhere past the start area, random walking speed.
    pub fn spawn<R: Rng + ?Sized>(kind: ChickenKind, rng: &mut R) -> Self {
        let x = SPAWN_MIN_X + rng.gen::<f32>() * SPAWN_RANGE_X;
        let speed = MIN_SPEED + rng.gen::<f32>() * SPEED_RANGE;
        Chicken::new(kind, x, speed)
    }

    pub fn walk(&mut self) {
        if !self.is_dead {
            self.sprite.x -= self.speed;
        }
    }

    pub fn animate(&mut self) {
        if !self.is_dead {
            self.sprite.play(self.kind.walk_frames());
        }
    }

    /// Kill instantly. Returns false if it was already dead.
    pub fn die(&mut self, now: u64) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.dead_at = Some(now);
        self.sprite.show(self.kind.dead_image());
        true
    }
}

impl Hitboxed for Chicken {
    fn bounds(&self) -> Rect {
        self.sprite.rect()
    }

    fn insets(&self) -> Insets {
        Insets::new(0.0, 0.0, self.sprite.height * 0.05, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sizes_stand_on_the_same_line() {
        let n = Chicken::new(ChickenKind::Normal, 700.0, 0.2);
        let s = Chicken::new(ChickenKind::Small, 700.0, 0.2);
        assert_eq!((n.sprite.width, n.sprite.height), (70.0, 100.0));
        assert_eq!((s.sprite.width, s.sprite.height), (60.0, 80.0));
        assert_eq!(n.sprite.rect().bottom(), 435.0);
        assert_eq!(s.sprite.rect().bottom(), 435.0);
    }

    #[test]
    fn spawn_stays_inside_bands() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = Chicken::spawn(ChickenKind::Small, &mut rng);
            assert!(c.sprite.x >= 600.0 && c.sprite.x <= 3600.0);
            assert!(c.speed >= 0.1 && c.speed <= 0.35);
        }
    }

    #[test]
    fn dead_chicken_stops_and_shows_corpse() {
        let mut c = Chicken::new(ChickenKind::Normal, 1000.0, 0.25);
        c.walk();
        assert_eq!(c.sprite.x, 999.75);
        assert!(c.die(50));
        assert!(!c.die(60));
        assert_eq!(c.dead_at, Some(50));
        assert_eq!(c.sprite.img, NORMAL_DEAD);
        c.walk();
        c.animate();
        assert_eq!(c.sprite.x, 999.75);
        assert_eq!(c.sprite.img, NORMAL_DEAD);
    }

    #[test]
    fn hitbox_trims_the_comb() {
        let c = Chicken::new(ChickenKind::Normal, 0.0, 0.1);
        let hb = c.hitbox();
        assert_eq!(hb.y, 335.0 + 5.0);
        assert_eq!(hb.height, 95.0);
    }
}
