/// Thrown salsa bottle.
///
/// ## Lifecycle
///
///   Flying    rotation frames, drifts sideways, falls under gravity
///   Splashing after `mark_hit`: frozen in place, plays splash frames
///   Done      splash finished; the world removes it
///
/// Bottles have no floor. One that misses everything keeps falling until
/// the world drops it for leaving the playfield.

use super::entity::{EntityId, FrameSet, Sprite};
use super::geometry::{Hitboxed, Rect};
use super::physics::{Body, Ground};

pub const FLIGHT_TICK_MS: u64 = 25;
pub const ANIMATION_TICK_MS: u64 = 100;
/// Horizontal travel per flight tick.
pub const FLIGHT_STEP: f32 = 10.0;
pub const LAUNCH_SPEED_Y: f32 = 20.0;
/// Spawn offset from the thrower's top-left corner.
pub const SPAWN_OFFSET_X: f32 = 50.0;
pub const SPAWN_OFFSET_Y: f32 = 150.0;
/// Below this the bottle is gone for good.
pub const FALL_LIMIT_Y: f32 = 1000.0;

pub const IMAGES_ROTATION: FrameSet = &[
    "img/6_salsa_bottle/bottle_rotation/1_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/2_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/3_bottle_rotation.png",
    "img/6_salsa_bottle/bottle_rotation/4_bottle_rotation.png",
];

pub const IMAGES_SPLASH: FrameSet = &[
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/1_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/2_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/3_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/4_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/5_bottle_splash.png",
    "img/6_salsa_bottle/bottle_rotation/bottle_splash/6_bottle_splash.png",
];

/// Time the splash stays on screen.
pub const SPLASH_DURATION_MS: u64 = IMAGES_SPLASH.len() as u64 * ANIMATION_TICK_MS;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SplashProgress {
    Started,
    Finished,
}

#[derive(Clone, Debug)]
pub struct ThrowableObject {
    pub id: EntityId,
    pub sprite: Sprite,
    pub body: Body,
    /// +1 right, -1 left.
    direction: f32,
    pub hit: bool,
    splash_started_at: Option<u64>,
    pub splash_complete: bool,
}

impl ThrowableObject {
    /// Launch from a thrower whose sprite's top-left is at (`x`, `y`).
    pub fn launch(id: EntityId, x: f32, y: f32, throw_left: bool) -> Self {
        let mut sprite = Sprite::new(IMAGES_ROTATION[0], x + SPAWN_OFFSET_X, y + SPAWN_OFFSET_Y, 50.0, 80.0);
        sprite.mirrored = throw_left;
        let mut body = Body::new(FLIGHT_STEP, Ground::FreeFlight);
        body.speed_y = LAUNCH_SPEED_Y;
        ThrowableObject {
            id,
            sprite,
            body,
            direction: if throw_left { -1.0 } else { 1.0 },
            hit: false,
            splash_started_at: None,
            splash_complete: false,
        }
    }

    pub fn is_flying(&self) -> bool {
        !self.hit
    }

    pub fn fly(&mut self) {
        if self.is_flying() {
            self.sprite.x += self.body.speed * self.direction;
        }
    }

    pub fn apply_gravity(&mut self) {
        if self.is_flying() {
            self.body.apply_gravity(&mut self.sprite.y);
        }
    }

    /// Register a hit. Returns false if it already splashed.
    pub fn mark_hit(&mut self) -> bool {
        !std::mem::replace(&mut self.hit, true)
    }

    pub fn is_out_of_play(&self) -> bool {
        self.is_flying() && self.sprite.y > FALL_LIMIT_Y
    }

    /// One animation tick.
    pub fn animate(&mut self, now: u64) -> Option<SplashProgress> {
        if self.splash_complete {
            return None;
        }
        if !self.hit {
            self.sprite.play(IMAGES_ROTATION);
            return None;
        }

        let mut progress = None;
        let started = match self.splash_started_at {
            Some(t) => t,
            None => {
                self.sprite.reset_frames();
                self.splash_started_at = Some(now);
                progress = Some(SplashProgress::Started);
                now
            }
        };
        self.sprite.play(IMAGES_SPLASH);
        if now.saturating_sub(started) >= SPLASH_DURATION_MS {
            self.splash_complete = true;
            progress = Some(SplashProgress::Finished);
        }
        progress
    }
}

impl Hitboxed for ThrowableObject {
    fn bounds(&self) -> Rect {
        self.sprite.rect()
    }
}
