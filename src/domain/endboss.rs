/// The boss hen waiting at the end of the level.
///
/// ## State selection (highest first)
///
///   Dead     health 0, terminal
///   Hurt     within HURT_DISPLAY_MS of the last accepted hit
///   Attack   0 < health <= 2
///   Alert    2 < health <= 4
///   Walking  otherwise
///
/// The boss stays hidden until the character comes within REVEAL_DISTANCE,
/// then stays revealed for good and walks towards the character, stopping
/// STOP_BUFFER short of it. Accepted hits are rate-limited by HIT_COOLDOWN_MS,
/// which is longer than the hurt display, so one volley counts once.

use super::entity::{EntityId, FrameSet, Sprite};
use super::geometry::{Hitboxed, Rect};

pub const ANIMATION_TICK_MS: u64 = 100;
pub const MOVEMENT_TICK_MS: u64 = 17;

pub const START_X: f32 = 4000.0;
pub const START_Y: f32 = -30.0;
pub const MAX_HEALTH: u32 = 5;
pub const REVEAL_DISTANCE: f32 = 550.0;
pub const STOP_BUFFER: f32 = 100.0;
pub const HURT_DISPLAY_MS: u64 = 500;
pub const HIT_COOLDOWN_MS: u64 = 1500;

const BASE_SPEED: f32 = 0.5;
const ANGRY_SPEED: f32 = 1.0;
const FRENZY_SPEED: f32 = 1.5;

pub const IMAGES_WALKING: FrameSet = &[
    "img/4_enemie_boss_chicken/1_walk/G1.png",
    "img/4_enemie_boss_chicken/1_walk/G2.png",
    "img/4_enemie_boss_chicken/1_walk/G3.png",
    "img/4_enemie_boss_chicken/1_walk/G4.png",
];

pub const IMAGES_ALERT: FrameSet = &[
    "img/4_enemie_boss_chicken/2_alert/G5.png",
    "img/4_enemie_boss_chicken/2_alert/G6.png",
    "img/4_enemie_boss_chicken/2_alert/G7.png",
    "img/4_enemie_boss_chicken/2_alert/G8.png",
    "img/4_enemie_boss_chicken/2_alert/G9.png",
    "img/4_enemie_boss_chicken/2_alert/G10.png",
    "img/4_enemie_boss_chicken/2_alert/G11.png",
    "img/4_enemie_boss_chicken/2_alert/G12.png",
];

pub const IMAGES_ATTACK: FrameSet = &[
    "img/4_enemie_boss_chicken/3_attack/G13.png",
    "img/4_enemie_boss_chicken/3_attack/G14.png",
    "img/4_enemie_boss_chicken/3_attack/G15.png",
    "img/4_enemie_boss_chicken/3_attack/G16.png",
    "img/4_enemie_boss_chicken/3_attack/G17.png",
    "img/4_enemie_boss_chicken/3_attack/G18.png",
    "img/4_enemie_boss_chicken/3_attack/G19.png",
    "img/4_enemie_boss_chicken/3_attack/G20.png",
];

pub const IMAGES_HURT: FrameSet = &[
    "img/4_enemie_boss_chicken/4_hurt/G21.png",
    "img/4_enemie_boss_chicken/4_hurt/G22.png",
    "img/4_enemie_boss_chicken/4_hurt/G23.png",
];

pub const IMAGES_DEAD: FrameSet = &[
    "img/4_enemie_boss_chicken/5_dead/G24.png",
    "img/4_enemie_boss_chicken/5_dead/G25.png",
    "img/4_enemie_boss_chicken/5_dead/G26.png",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BossState {
    Walking,
    Alert,
    Attack,
    Hurt,
    Dead,
}

impl BossState {
    fn frames(self) -> FrameSet {
        match self {
            BossState::Walking => IMAGES_WALKING,
            BossState::Alert => IMAGES_ALERT,
            BossState::Attack => IMAGES_ATTACK,
            BossState::Hurt => IMAGES_HURT,
            BossState::Dead => IMAGES_DEAD,
        }
    }
}

/// Outcome of a projectile hit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BossHit {
    /// Dead already, or still inside the hit cooldown.
    Ignored,
    Hurt { health: u32 },
    Killed,
}

#[derive(Clone, Debug)]
pub struct Endboss {
    pub id: EntityId,
    pub sprite: Sprite,
    pub health: u32,
    pub is_dead: bool,
    pub dead_at: Option<u64>,
    pub visible: bool,
    last_hit: Option<u64>,
}

impl Endboss {
    pub fn new() -> Self {
        Endboss::at(START_X)
    }

    pub fn at(x: f32) -> Self {
        Endboss {
            id: EntityId::default(),
            sprite: Sprite::new(IMAGES_WALKING[0], x, START_Y, 300.0, 500.0),
            health: MAX_HEALTH,
            is_dead: false,
            dead_at: None,
            visible: false,
            last_hit: None,
        }
    }

    pub fn state(&self, now: u64) -> BossState {
        if self.is_dead {
            BossState::Dead
        } else if self.is_hurt(now) {
            BossState::Hurt
        } else if self.health > 0 && self.health <= 2 {
            BossState::Attack
        } else if self.health > 2 && self.health <= 4 {
            BossState::Alert
        } else {
            BossState::Walking
        }
    }

    pub fn is_hurt(&self, now: u64) -> bool {
        self.last_hit
            .map(|t| now.saturating_sub(t) < HURT_DISPLAY_MS)
            .unwrap_or(false)
    }

    pub fn speed(&self) -> f32 {
        match self.health {
            0..=2 => FRENZY_SPEED,
            3 => ANGRY_SPEED,
            _ => BASE_SPEED,
        }
    }

    /// Percentage for the boss health bar.
    pub fn health_percentage(&self) -> i32 {
        (self.health * 100 / MAX_HEALTH) as i32
    }

    pub fn hit(&mut self, now: u64) -> BossHit {
        if self.is_dead {
            return BossHit::Ignored;
        }
        if let Some(t) = self.last_hit {
            if now.saturating_sub(t) < HIT_COOLDOWN_MS {
                return BossHit::Ignored;
            }
        }
        self.health = self.health.saturating_sub(1);
        self.last_hit = Some(now);
        if self.health == 0 {
            self.die(now);
            BossHit::Killed
        } else {
            BossHit::Hurt { health: self.health }
        }
    }

    /// Returns false if already dead.
    pub fn die(&mut self, now: u64) -> bool {
        if self.is_dead {
            return false;
        }
        self.health = 0;
        self.is_dead = true;
        self.dead_at = Some(now);
        true
    }

    /// Reveal once the character is close. True only on the revealing call.
    pub fn reveal_if_near(&mut self, character_x: f32) -> bool {
        if self.visible || self.sprite.x - character_x >= REVEAL_DISTANCE {
            return false;
        }
        self.visible = true;
        true
    }

    pub fn approach(&mut self, character_x: f32) {
        if self.visible && !self.is_dead && self.sprite.x > character_x + STOP_BUFFER {
            self.sprite.x -= self.speed();
        }
    }

    pub fn animate(&mut self, now: u64) {
        let frames = self.state(now).frames();
        self.sprite.play(frames);
    }
}

impl Default for Endboss {
    fn default() -> Self {
        Endboss::new()
    }
}

impl Hitboxed for Endboss {
    fn bounds(&self) -> Rect {
        self.sprite.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_and_walking() {
        let b = Endboss::new();
        assert!(!b.visible);
        assert_eq!(b.health, 5);
        assert_eq!(b.state(0), BossState::Walking);
        assert_eq!(b.health_percentage(), 100);
    }

    #[test]
    fn reveal_happens_once() {
        let mut b = Endboss::new();
        assert!(!b.reveal_if_near(3450.0));
        assert!(b.reveal_if_near(3451.0));
        assert!(!b.reveal_if_near(3900.0));
        assert!(!b.reveal_if_near(0.0));
        assert!(b.visible);
    }

    #[test]
    fn hits_respect_cooldown() {
        let mut b = Endboss::new();
        assert_eq!(b.hit(1000), BossHit::Hurt { health: 4 });
        assert_eq!(b.hit(1100), BossHit::Ignored);
        assert_eq!(b.hit(2499), BossHit::Ignored);
        assert_eq!(b.hit(2500), BossHit::Hurt { health: 3 });
        assert_eq!(b.health_percentage(), 60);
    }

    #[test]
    fn state_follows_health_with_hurt_override() {
        let mut b = Endboss::new();
        b.hit(0);
        assert_eq!(b.state(100), BossState::Hurt);
        assert_eq!(b.state(500), BossState::Alert);
        b.hit(1500);
        b.hit(3000);
        assert_eq!(b.state(3600), BossState::Attack);
        b.hit(4500);
        b.hit(6000);
        assert_eq!(b.state(6000), BossState::Dead);
        assert_eq!(b.state(9000), BossState::Dead);
    }

    #[test]
    fn fifth_hit_kills() {
        let mut b = Endboss::new();
        for i in 0..4 {
            assert!(matches!(b.hit(i * 1500), BossHit::Hurt { .. }));
        }
        assert_eq!(b.hit(6000), BossHit::Killed);
        assert!(b.is_dead);
        assert_eq!(b.dead_at, Some(6000));
        assert_eq!(b.hit(9000), BossHit::Ignored);
        assert_eq!(b.health_percentage(), 0);
    }

    #[test]
    fn speed_tiers() {
        let mut b = Endboss::new();
        let mut seen = vec![b.speed()];
        for i in 0..3 {
            b.hit(i * 1500);
            seen.push(b.speed());
        }
        assert_eq!(seen, vec![0.5, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn approach_stops_at_buffer_and_needs_reveal() {
        let mut b = Endboss::at(1000.0);
        b.approach(800.0);
        assert_eq!(b.sprite.x, 1000.0);
        b.reveal_if_near(800.0);
        for _ in 0..1000 {
            b.approach(800.0);
        }
        assert!(b.sprite.x <= 900.0 && b.sprite.x > 899.0);
    }
}
