/// Vertical motion model.
///
/// ## Convention
///
/// Screen coordinates: `y` grows downwards, `speed_y` is positive when
/// moving UP. A gravity tick does `y -= speed_y; speed_y -= acceleration`.
///
/// ## Ground
///
/// Bodies with a resting height snap to it once they come down on it
/// (`y >= rest` with `speed_y <= 0`). Free-flying bodies (projectiles)
/// have no ground at all: they are always "above ground" and keep
/// falling until something else removes them.

/// Gravity tick period (ms).
pub const GRAVITY_TICK_MS: u64 = 40;
/// Upward speed lost per gravity tick.
pub const ACCELERATION: f32 = 2.5;
/// Upward speed given by a jump.
pub const JUMP_SPEED: f32 = 25.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Ground {
    /// Resting height; anything with `y` above (smaller than) it is airborne.
    Rest(f32),
    /// Never grounded.
    FreeFlight,
}

#[derive(Clone, Copy, Debug)]
pub struct Body {
    /// Horizontal speed per movement tick.
    pub speed: f32,
    pub speed_y: f32,
    pub acceleration: f32,
    pub ground: Ground,
}

impl Body {
    pub fn new(speed: f32, ground: Ground) -> Self {
        Body {
            speed,
            speed_y: 0.0,
            acceleration: ACCELERATION,
            ground,
        }
    }

    pub fn is_above_ground(&self, y: f32) -> bool {
        match self.ground {
            Ground::Rest(rest) => y < rest,
            Ground::FreeFlight => true,
        }
    }

    /// One gravity tick. Returns true if the body landed on this tick.
    pub fn apply_gravity(&mut self, y: &mut f32) -> bool {
        if !(self.is_above_ground(*y) || self.speed_y > 0.0) {
            return false;
        }
        *y -= self.speed_y;
        self.speed_y -= self.acceleration;

        if let Ground::Rest(rest) = self.ground {
            if *y >= rest && self.speed_y <= 0.0 {
                *y = rest;
                self.speed_y = 0.0;
                return true;
            }
        }
        false
    }

    pub fn jump(&mut self) {
        self.speed_y = JUMP_SPEED;
    }
}
