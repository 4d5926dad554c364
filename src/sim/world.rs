/// Simulation root.
///
/// ## Ownership
///
/// The world owns the character, the level's collections, live thrown
/// bottles, the four HUD bars and the game-wide counters. It does not own
/// time: every tick arrives as a `Fired` occurrence from the scheduler and
/// is routed by owner and kind.
///
/// ## World intervals
///
///   Collisions   200 ms  contact damage, bottle hits, cleanup, boss defeat
///   Throwing      50 ms  spawn bottles on throw intent
///   Collectables  17 ms  coin and bottle pickups
///
/// ## Pause
///
/// Pausing cancels the world intervals and asks every member of every live
/// collection (bottles in flight included) to pause. Resuming schedules
/// each one's current timer set again.

use tracing::{debug, info, warn};

use crate::domain::character::{Character, SleepChange};
use crate::domain::endboss::Endboss;
use crate::domain::enemy::Enemy;
use crate::domain::entity::EntityId;
use crate::domain::keyboard::Keyboard;
use crate::domain::status_bar::{StatusBar, StatusBarKind};
use crate::domain::throwable::{SplashProgress, ThrowableObject};

use super::combat::{self, Contact};
use super::event::GameEvent;
use super::level::Level;
use super::lifecycle::Pausable;
use super::pickup;
use super::scheduler::{Fired, Owner, Scheduler, TaskKind, TimerSpec};

pub const COLLISION_TICK_MS: u64 = 200;
pub const THROW_TICK_MS: u64 = 50;
pub const COLLECTABLES_TICK_MS: u64 = 17;

/// Which end screen the renderer should show.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndScreen {
    Won,
    Lost,
}

pub struct World {
    pub character: Character,
    pub level: Level,
    pub throwables: Vec<ThrowableObject>,

    pub health_bar: StatusBar,
    pub coin_bar: StatusBar,
    pub bottle_bar: StatusBar,
    pub endboss_bar: StatusBar,

    pub collected_coins: u32,
    /// Bottles in the inventory, 0..=5.
    pub collected_bottles: u32,
    pub last_throw_time: Option<u64>,
    pub camera_x: f32,

    pub level_completed: bool,
    pub paused: bool,
    pub win_screen_shown: bool,
    pub game_over_screen_shown: bool,

    next_id: u32,
    pub(crate) events: Vec<GameEvent>,
}

impl World {
    pub fn new(mut level: Level, now: u64) -> Self {
        let mut next_id = 1;
        for enemy in &mut level.enemies {
            enemy.set_id(EntityId(next_id));
            next_id += 1;
        }
        for cloud in &mut level.clouds {
            cloud.id = EntityId(next_id);
            next_id += 1;
        }

        let character = Character::new(now);
        let camera_x = character.camera_x();

        World {
            character,
            level,
            throwables: Vec::new(),
            health_bar: StatusBar::new(StatusBarKind::Health),
            coin_bar: StatusBar::new(StatusBarKind::Coin),
            bottle_bar: StatusBar::new(StatusBarKind::Bottle),
            endboss_bar: StatusBar::new(StatusBarKind::Endboss),
            collected_coins: 0,
            collected_bottles: 0,
            last_throw_time: None,
            camera_x,
            level_completed: false,
            paused: false,
            win_screen_shown: false,
            game_over_screen_shown: false,
            next_id,
            events: Vec::new(),
        }
    }

    /// Schedule the world intervals and every entity's timers.
    pub fn start(&self, scheduler: &mut Scheduler, now: u64) {
        for spec in self.world_timers() {
            scheduler.ensure(Owner::World, spec, now);
        }
        for entity in self.pausables() {
            entity.resume(scheduler, now);
        }
    }

    pub fn pause(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.paused {
            return false;
        }
        let mut cancelled = scheduler.cancel_owner(Owner::World);
        for entity in self.pausables() {
            cancelled += entity.pause(scheduler);
        }
        self.paused = true;
        self.emit(GameEvent::Paused);
        info!(cancelled, "world paused");
        true
    }

    pub fn resume(&mut self, scheduler: &mut Scheduler, now: u64) -> bool {
        if !self.paused {
            return false;
        }
        self.start(scheduler, now);
        self.paused = false;
        self.emit(GameEvent::Resumed);
        info!(tasks = scheduler.active_count(), "world resumed");
        true
    }

    /// Route one timer occurrence to its handler.
    pub fn dispatch(&mut self, fired: Fired, kb: &Keyboard, scheduler: &mut Scheduler) {
        let now = fired.at;
        match (fired.owner, fired.kind) {
            (Owner::World, TaskKind::Collisions) => combat::collision_tick(self, scheduler, now),
            (Owner::World, TaskKind::Throwing) => combat::throw_tick(self, scheduler, now),
            (Owner::World, TaskKind::Collectables) => pickup::collectables_tick(self),
            (Owner::Character, TaskKind::Gravity) => {
                self.character.apply_gravity();
            }
            (Owner::Character, TaskKind::Movement) => self.character_movement(kb, scheduler, now),
            (Owner::Character, TaskKind::Animation) => self.character_animation(kb, now),
            (Owner::Enemy(id), kind) => self.enemy_tick(id, kind, now),
            (Owner::Cloud(id), TaskKind::Movement) => {
                if let Some(cloud) = self.level.clouds.iter_mut().find(|c| c.id == id) {
                    cloud.drift();
                }
            }
            (Owner::Projectile(id), kind) => self.projectile_tick(id, kind, scheduler, now),
            (owner, kind) => warn!(?owner, ?kind, "task without handler"),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn endboss(&self) -> Option<&Endboss> {
        self.level.endboss()
    }

    pub fn end_screen(&self) -> Option<EndScreen> {
        if self.level_completed {
            Some(EndScreen::Won)
        } else if self.character.energy <= 0 && self.character.death_animation_complete {
            Some(EndScreen::Lost)
        } else {
            None
        }
    }

    /// Record that `screen` was drawn. True (and an event) only the first time.
    pub fn mark_end_screen_shown(&mut self, screen: EndScreen) -> bool {
        let (latch, event) = match screen {
            EndScreen::Won => (&mut self.win_screen_shown, GameEvent::WinScreenShown),
            EndScreen::Lost => (&mut self.game_over_screen_shown, GameEvent::GameOverScreenShown),
        };
        if std::mem::replace(latch, true) {
            return false;
        }
        self.emit(event);
        true
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// World intervals the current state needs. Death retires the collision check.
    fn world_timers(&self) -> Vec<TimerSpec> {
        let mut timers = Vec::with_capacity(3);
        if !self.character.is_dead {
            timers.push(TimerSpec::new(TaskKind::Collisions, COLLISION_TICK_MS));
        }
        timers.push(TimerSpec::new(TaskKind::Throwing, THROW_TICK_MS));
        timers.push(TimerSpec::new(TaskKind::Collectables, COLLECTABLES_TICK_MS));
        timers
    }

    fn pausables(&self) -> impl Iterator<Item = &dyn Pausable> + '_ {
        std::iter::once(&self.character as &dyn Pausable)
            .chain(self.level.enemies.iter().map(|e| e as &dyn Pausable))
            .chain(self.level.clouds.iter().map(|c| c as &dyn Pausable))
            .chain(self.throwables.iter().map(|t| t as &dyn Pausable))
    }

    // ── Character ──

    fn character_movement(&mut self, kb: &Keyboard, scheduler: &mut Scheduler, now: u64) {
        let report = self.character.handle_input(kb, self.level.level_end_x, now);
        if report.jumped {
            self.emit(GameEvent::Jumped);
        }

        if !self.character.is_dead {
            let character = &mut self.character;
            for enemy in self.level.enemies.iter_mut() {
                if combat::classify_contact(character, enemy) != Contact::Stomp {
                    continue;
                }
                if enemy.die(now) {
                    debug!(id = ?enemy.id(), "stomped");
                    combat::announce_kill(enemy, &mut self.events, &mut self.endboss_bar);
                    enemy.refresh_timers(scheduler);
                }
                character.bounce();
            }
        }

        self.camera_x = self.character.camera_x();
    }

    fn character_animation(&mut self, kb: &Keyboard, now: u64) {
        let (_, change) = self.character.animate(kb, now, self.level_completed);
        match change {
            Some(SleepChange::Started) => self.emit(GameEvent::SleepStarted),
            Some(SleepChange::Stopped) => self.emit(GameEvent::SleepEnded),
            None => {}
        }
    }

    // ── Enemies & projectiles ──

    fn enemy_tick(&mut self, id: EntityId, kind: TaskKind, now: u64) {
        let character_x = self.character.sprite.x;
        let Some(enemy) = self.level.enemies.iter_mut().find(|e| e.id() == id) else {
            return;
        };
        match (enemy, kind) {
            (Enemy::Chicken(c), TaskKind::Movement) => c.walk(),
            (Enemy::Chicken(c), TaskKind::Animation) => c.animate(),
            (Enemy::Endboss(b), TaskKind::Movement) => {
                if b.reveal_if_near(character_x) {
                    info!(x = b.sprite.x, "endboss revealed");
                    self.events.push(GameEvent::EndbossRevealed);
                }
                b.approach(character_x);
            }
            (Enemy::Endboss(b), TaskKind::Animation) => b.animate(now),
            (_, kind) => warn!(?id, ?kind, "enemy task without handler"),
        }
    }

    fn projectile_tick(&mut self, id: EntityId, kind: TaskKind, scheduler: &mut Scheduler, now: u64) {
        let Some(bottle) = self.throwables.iter_mut().find(|b| b.id == id) else {
            return;
        };
        match kind {
            TaskKind::Flight => bottle.fly(),
            TaskKind::Gravity => bottle.apply_gravity(),
            TaskKind::Animation => {
                if bottle.animate(now) == Some(SplashProgress::Finished) {
                    bottle.refresh_timers(scheduler);
                }
            }
            other => warn!(?id, kind = ?other, "projectile task without handler"),
        }
    }
}
