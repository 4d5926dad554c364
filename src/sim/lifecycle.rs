/// Pause/resume capability for everything that owns repeating tasks.
///
/// Each entity type reports the timers its *current* state needs; the
/// shared provided methods do the scheduler bookkeeping. A state change
/// that retires a timer (a chicken dying, a bottle splashing) calls
/// `refresh_timers`, so that after any pause/resume cycle the registry
/// holds exactly what it held before.

use crate::domain::character::{self, Character};
use crate::domain::chicken;
use crate::domain::cloud::{self, Cloud};
use crate::domain::endboss;
use crate::domain::enemy::Enemy;
use crate::domain::physics::GRAVITY_TICK_MS;
use crate::domain::throwable::{self, ThrowableObject};

use super::scheduler::{Owner, Scheduler, TaskKind, TimerSpec};

pub trait Pausable {
    fn owner(&self) -> Owner;

    /// Timers this entity needs right now.
    fn timers(&self) -> Vec<TimerSpec>;

    fn pause(&self, scheduler: &mut Scheduler) -> usize {
        scheduler.cancel_owner(self.owner())
    }

    /// Schedule every needed timer that is not already running.
    fn resume(&self, scheduler: &mut Scheduler, now: u64) {
        for spec in self.timers() {
            scheduler.ensure(self.owner(), spec, now);
        }
    }

    /// Drop running timers the current state no longer needs.
    fn refresh_timers(&self, scheduler: &mut Scheduler) -> usize {
        let keep: Vec<TaskKind> = self.timers().iter().map(|t| t.kind).collect();
        scheduler.retain_kinds(self.owner(), &keep)
    }
}

impl Pausable for Character {
    fn owner(&self) -> Owner {
        Owner::Character
    }

    fn timers(&self) -> Vec<TimerSpec> {
        vec![
            TimerSpec::new(TaskKind::Gravity, GRAVITY_TICK_MS),
            TimerSpec::new(TaskKind::Movement, character::MOVEMENT_TICK_MS),
            TimerSpec::new(TaskKind::Animation, character::ANIMATION_TICK_MS),
        ]
    }
}

impl Pausable for Enemy {
    fn owner(&self) -> Owner {
        Owner::Enemy(self.id())
    }

    fn timers(&self) -> Vec<TimerSpec> {
        match self {
            Enemy::Chicken(c) if c.is_dead => Vec::new(),
            Enemy::Chicken(_) => vec![
                TimerSpec::new(TaskKind::Movement, chicken::MOVEMENT_TICK_MS),
                TimerSpec::new(TaskKind::Animation, chicken::ANIMATION_TICK_MS),
            ],
            Enemy::Endboss(_) => vec![
                TimerSpec::new(TaskKind::Animation, endboss::ANIMATION_TICK_MS),
                TimerSpec::new(TaskKind::Movement, endboss::MOVEMENT_TICK_MS),
            ],
        }
    }
}

impl Pausable for Cloud {
    fn owner(&self) -> Owner {
        Owner::Cloud(self.id)
    }

    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::new(TaskKind::Movement, cloud::MOVEMENT_TICK_MS)]
    }
}

impl Pausable for ThrowableObject {
    fn owner(&self) -> Owner {
        Owner::Projectile(self.id)
    }

    fn timers(&self) -> Vec<TimerSpec> {
        let animation = TimerSpec::new(TaskKind::Animation, throwable::ANIMATION_TICK_MS);
        if self.splash_complete {
            Vec::new()
        } else if self.hit {
            vec![animation]
        } else {
            vec![
                TimerSpec::new(TaskKind::Flight, throwable::FLIGHT_TICK_MS),
                TimerSpec::new(TaskKind::Gravity, GRAVITY_TICK_MS),
                animation,
            ]
        }
    }
}
