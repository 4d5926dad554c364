/// One play-through: world, scheduler, sound sink and the virtual clock.
///
/// The host calls `advance(dt)` once per frame. The session moves its
/// clock, hands every due timer occurrence to the world in order, then
/// routes the events the world emitted to the sound sink.
///
/// Drawing is pull-based: the host asks `wants_frame()`, draws, and
/// reports back through `frame_drawn`. Pausing and reaching an end
/// screen clear the request; resuming and restarting raise it again.

use tracing::{debug, info};

use crate::domain::keyboard::Keyboard;

use super::audio::{self, SoundSink};
use super::event::GameEvent;
use super::level::Level;
use super::scheduler::Scheduler;
use super::world::{EndScreen, World};

pub struct GameSession {
    pub keyboard: Keyboard,
    world: World,
    scheduler: Scheduler,
    sound: Box<dyn SoundSink>,
    now: u64,
    frame_requested: bool,
}

impl GameSession {
    pub fn new(level: Level, sound: Box<dyn SoundSink>) -> Self {
        let mut session = GameSession {
            keyboard: Keyboard::default(),
            world: World::new(level, 0),
            scheduler: Scheduler::new(),
            sound,
            now: 0,
            frame_requested: true,
        };
        session.begin();
        session
    }

    fn begin(&mut self) {
        self.world.start(&mut self.scheduler, self.now);
        self.world.emit(GameEvent::SessionStarted);
        self.frame_requested = true;
        info!(
            enemies = self.world.level.enemies.len(),
            tasks = self.scheduler.active_count(),
            "session started"
        );
        self.flush_events();
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn is_paused(&self) -> bool {
        self.world.paused
    }

    // ── Clock ──

    /// Move the clock by `dt_ms` and run everything that fell due.
    pub fn advance(&mut self, dt_ms: u64) {
        let target = self.now + dt_ms;
        while let Some(fired) = self.scheduler.pop_due(target) {
            self.world.dispatch(fired, &self.keyboard, &mut self.scheduler);
        }
        self.now = target;
        self.sound.update(dt_ms);
        self.flush_events();
    }

    fn flush_events(&mut self) {
        for event in self.world.drain_events() {
            debug!(?event, at = self.now, "event");
            audio::route(self.sound.as_mut(), &event);
        }
    }

    // ── Pause ──

    /// Escape handler. Ignored once the level is won or the character is dead.
    pub fn toggle_pause(&mut self) -> bool {
        if self.world.level_completed || self.world.character.is_dead {
            return false;
        }
        if self.world.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn pause(&mut self) -> bool {
        if !self.world.pause(&mut self.scheduler) {
            return false;
        }
        self.keyboard.release_all();
        self.frame_requested = false;
        self.flush_events();
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.world.resume(&mut self.scheduler, self.now) {
            return false;
        }
        self.frame_requested = true;
        self.flush_events();
        true
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.sound.toggle_mute()
    }

    // ── Frames ──

    pub fn wants_frame(&self) -> bool {
        self.frame_requested
    }

    /// Report a drawn frame and the end screen it showed, if any.
    pub fn frame_drawn(&mut self, end_screen: Option<EndScreen>) {
        if let Some(screen) = end_screen {
            self.world.mark_end_screen_shown(screen);
            self.frame_requested = false;
            self.flush_events();
        } else if self.world.paused {
            self.frame_requested = false;
        }
    }

    // ── Lifecycle ──

    /// Hard stop, then a fresh world on `level`.
    pub fn restart(&mut self, level: Level) {
        let stopped = self.scheduler.stop_all();
        info!(stopped, "restarting");
        self.keyboard.release_all();
        self.world = World::new(level, self.now);
        self.begin();
    }

    /// Cancel every timer and silence the sink. Used on quit.
    pub fn stop(&mut self) {
        self.scheduler.stop_all();
        self.sound.game_over();
    }
}
