/// The player character ("Pepe").
///
/// Two fixed-rate loops drive it, both scheduled by the simulation:
///   - movement (~144 Hz): keyboard → walk / jump / throw intent
///   - animation (150 ms): pick one frame set by strict priority
///
/// Animation priority:
///   dead > hurt > airborne > walking > idle (short, then long + sleeping)
///
/// The character never plays sounds itself. Operations that should be
/// heard return a report the simulation turns into events.

use super::entity::{FrameSet, Sprite};
use super::geometry::{Hitboxed, Insets, Rect};
use super::keyboard::Keyboard;
use super::physics::{Body, Ground};

pub const WIDTH: f32 = 125.0;
pub const HEIGHT: f32 = 350.0;
pub const START_X: f32 = 100.0;
/// Resting height of the character's top edge.
pub const GROUND_Y: f32 = 100.0;
pub const WALK_SPEED: f32 = 2.0;

pub const MOVEMENT_TICK_MS: u64 = 7;
pub const ANIMATION_TICK_MS: u64 = 150;

pub const MAX_ENERGY: i32 = 100;
/// Energy lost by `hit()` itself; enemy contact adds its own damage on top.
pub const HIT_DAMAGE: i32 = 5;
pub const HURT_WINDOW_MS: u64 = 1000;
/// Idle time after which the long-idle (sleeping) animation takes over.
pub const LONG_IDLE_MS: u64 = 15_000;

pub const CAMERA_MARGIN: f32 = 100.0;

/// Upward speed after landing on an enemy.
pub const BOUNCE_SPEED: f32 = 20.0;
/// Stomps only register while `speed_y` is below this.
pub const STOMP_MAX_SPEED_Y: f32 = 10.0;
/// Fraction of the enemy's height below its hitbox top that still counts as "on top".
pub const STOMP_TOLERANCE: f32 = 0.3;

pub const IMAGES_WALKING: FrameSet = &[
    "img/2_character_pepe/2_walk/W-21.png",
    "img/2_character_pepe/2_walk/W-22.png",
    "img/2_character_pepe/2_walk/W-23.png",
    "img/2_character_pepe/2_walk/W-24.png",
    "img/2_character_pepe/2_walk/W-25.png",
    "img/2_character_pepe/2_walk/W-26.png",
];

pub const IMAGES_JUMPING: FrameSet = &[
    "img/2_character_pepe/3_jump/J-31.png",
    "img/2_character_pepe/3_jump/J-32.png",
    "img/2_character_pepe/3_jump/J-33.png",
    "img/2_character_pepe/3_jump/J-34.png",
    "img/2_character_pepe/3_jump/J-35.png",
    "img/2_character_pepe/3_jump/J-36.png",
    "img/2_character_pepe/3_jump/J-37.png",
    "img/2_character_pepe/3_jump/J-38.png",
    "img/2_character_pepe/3_jump/J-39.png",
];

pub const IMAGES_DEAD: FrameSet = &[
    "img/2_character_pepe/5_dead/D-51.png",
    "img/2_character_pepe/5_dead/D-52.png",
    "img/2_character_pepe/5_dead/D-53.png",
    "img/2_character_pepe/5_dead/D-54.png",
    "img/2_character_pepe/5_dead/D-55.png",
    "img/2_character_pepe/5_dead/D-56.png",
    "img/2_character_pepe/5_dead/D-57.png",
];

pub const IMAGES_HURT: FrameSet = &[
    "img/2_character_pepe/4_hurt/H-41.png",
    "img/2_character_pepe/4_hurt/H-42.png",
    "img/2_character_pepe/4_hurt/H-43.png",
];

pub const IMAGES_IDLE: FrameSet = &[
    "img/2_character_pepe/1_idle/idle/I-1.png",
    "img/2_character_pepe/1_idle/idle/I-2.png",
    "img/2_character_pepe/1_idle/idle/I-3.png",
    "img/2_character_pepe/1_idle/idle/I-4.png",
    "img/2_character_pepe/1_idle/idle/I-5.png",
    "img/2_character_pepe/1_idle/idle/I-6.png",
    "img/2_character_pepe/1_idle/idle/I-7.png",
    "img/2_character_pepe/1_idle/idle/I-8.png",
    "img/2_character_pepe/1_idle/idle/I-9.png",
    "img/2_character_pepe/1_idle/idle/I-10.png",
];

pub const IMAGES_IDLE_LONG: FrameSet = &[
    "img/2_character_pepe/1_idle/long_idle/I-11.png",
    "img/2_character_pepe/1_idle/long_idle/I-12.png",
    "img/2_character_pepe/1_idle/long_idle/I-13.png",
    "img/2_character_pepe/1_idle/long_idle/I-14.png",
    "img/2_character_pepe/1_idle/long_idle/I-15.png",
    "img/2_character_pepe/1_idle/long_idle/I-16.png",
    "img/2_character_pepe/1_idle/long_idle/I-17.png",
    "img/2_character_pepe/1_idle/long_idle/I-18.png",
    "img/2_character_pepe/1_idle/long_idle/I-19.png",
    "img/2_character_pepe/1_idle/long_idle/I-20.png",
];

/// What a movement tick did, for the caller to react to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: bool,
    pub jumped: bool,
}

/// Change of the looping "sleeping" sound requested by an animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepChange {
    Started,
    Stopped,
}

/// Which frame set the last animation tick chose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Dead,
    Hurt,
    Jumping,
    Walking,
    Idle,
    LongIdle,
    Frozen,
}

#[derive(Clone, Debug)]
pub struct Character {
    pub sprite: Sprite,
    pub body: Body,
    pub energy: i32,
    pub last_hit: Option<u64>,
    pub is_dead: bool,
    pub last_movement: u64,
    pub sleeping: bool,
    pub death_animation_complete: bool,
    /// Throw key held and not hurt; polled by the throw check.
    pub throw_intent: bool,
    /// Latched while airborne so the jump frames restart once per jump.
    in_jump_animation: bool,
}

impl Character {
    pub fn new(now: u64) -> Self {
        Character {
            sprite: Sprite::new(IMAGES_WALKING[0], START_X, GROUND_Y, WIDTH, HEIGHT),
            body: Body::new(WALK_SPEED, Ground::Rest(GROUND_Y)),
            energy: MAX_ENERGY,
            last_hit: None,
            is_dead: false,
            last_movement: now,
            sleeping: false,
            death_animation_complete: false,
            throw_intent: false,
            in_jump_animation: false,
        }
    }

    pub fn is_above_ground(&self) -> bool {
        self.body.is_above_ground(self.sprite.y)
    }

    pub fn is_hurt(&self, now: u64) -> bool {
        self.last_hit
            .map(|t| now.saturating_sub(t) < HURT_WINDOW_MS)
            .unwrap_or(false)
    }

    pub fn apply_gravity(&mut self) -> bool {
        self.body.apply_gravity(&mut self.sprite.y)
    }

    pub fn camera_x(&self) -> f32 {
        -self.sprite.x + CAMERA_MARGIN
    }

    // ── Movement tick ──

    /// Apply one movement tick worth of keyboard input.
    pub fn handle_input(&mut self, kb: &Keyboard, level_end_x: f32, now: u64) -> MoveReport {
        let mut report = MoveReport::default();
        if self.is_dead {
            self.throw_intent = false;
            return report;
        }

        if kb.right && self.sprite.x < level_end_x {
            self.sprite.x = (self.sprite.x + self.body.speed).min(level_end_x);
            self.sprite.mirrored = false;
            report.moved = true;
        }
        if kb.left && self.sprite.x > 0.0 {
            self.sprite.x = (self.sprite.x - self.body.speed).max(0.0);
            self.sprite.mirrored = true;
            report.moved = true;
        }
        if kb.space && !self.is_above_ground() {
            self.body.jump();
            report.jumped = true;
            report.moved = true;
        }

        self.throw_intent = kb.f && !self.is_hurt(now);
        if self.throw_intent {
            report.moved = true;
        }

        if report.moved {
            self.last_movement = now;
        }
        report
    }

    // ── Damage ──

    /// Take a hit worth `damage` energy. Energy never drops below zero;
    /// the hurt window only starts if the character survives.
    pub fn hit(&mut self, damage: i32, now: u64) {
        self.energy = (self.energy - damage).max(0);
        if self.energy > 0 {
            self.last_hit = Some(now);
        }
    }

    /// Enter the dead state. Returns false if already dead.
    pub fn die(&mut self) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.sprite.reset_frames();
        true
    }

    /// Bottom edge of the hitbox.
    pub fn hitbox_bottom(&self) -> f32 {
        self.hitbox().bottom()
    }

    /// Geometric half of the stomp test: airborne, falling (slowly enough),
    /// and the feet inside the top band of `enemy`'s hitbox.
    /// Overlap and enemy liveness are the caller's business.
    pub fn is_stomping<E: Hitboxed + ?Sized>(&self, enemy: &E) -> bool {
        if !self.is_above_ground() || self.body.speed_y >= STOMP_MAX_SPEED_Y {
            return false;
        }
        let enemy_top = enemy.hitbox().y;
        let band = enemy.bounds().height * STOMP_TOLERANCE;
        self.hitbox_bottom() < enemy_top + band
    }

    pub fn bounce(&mut self) {
        self.body.speed_y = BOUNCE_SPEED;
    }

    // ── Animation tick ──

    /// Select and advance the animation. Returns a change of the sleeping
    /// loop when one is needed.
    pub fn animate(&mut self, kb: &Keyboard, now: u64, level_completed: bool) -> (Pose, Option<SleepChange>) {
        if level_completed {
            return (Pose::Frozen, self.wake());
        }

        if self.is_dead {
            let change = self.wake();
            if self.sprite.current_image >= IMAGES_DEAD.len() {
                self.death_animation_complete = true;
                self.sprite.current_image = IMAGES_DEAD.len() - 1;
                self.sprite.show(IMAGES_DEAD[IMAGES_DEAD.len() - 1]);
                return (Pose::Frozen, change);
            }
            self.sprite.play(IMAGES_DEAD);
            return (Pose::Dead, change);
        }

        if self.is_hurt(now) {
            self.sprite.play(IMAGES_HURT);
            self.last_movement = now;
            return (Pose::Hurt, self.wake());
        }

        if self.is_above_ground() {
            if !self.in_jump_animation {
                self.sprite.reset_frames();
                self.in_jump_animation = true;
            }
            self.sprite.play(IMAGES_JUMPING);
            return (Pose::Jumping, self.wake());
        }
        self.in_jump_animation = false;

        if kb.right || kb.left {
            self.sprite.play(IMAGES_WALKING);
            self.last_movement = now;
            return (Pose::Walking, self.wake());
        }

        if now.saturating_sub(self.last_movement) < LONG_IDLE_MS {
            self.sprite.play(IMAGES_IDLE);
            return (Pose::Idle, self.wake());
        }

        let change = if self.sleeping {
            None
        } else {
            self.sleeping = true;
            Some(SleepChange::Started)
        };
        self.sprite.play(IMAGES_IDLE_LONG);
        (Pose::LongIdle, change)
    }

    fn wake(&mut self) -> Option<SleepChange> {
        if self.sleeping {
            self.sleeping = false;
            Some(SleepChange::Stopped)
        } else {
            None
        }
    }
}

impl Hitboxed for Character {
    fn bounds(&self) -> Rect {
        self.sprite.rect()
    }

    fn insets(&self) -> Insets {
        let w = self.sprite.width;
        let h = self.sprite.height;
        Insets::new(w * 0.1, w * 0.1, h * 0.35, h * 0.03)
    }
}
