//! Test doubles shared by the simulation and renderer tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::geometry::Rect;
use crate::ui::renderer::Surface;

use super::audio::{SoundCue, SoundSink};
use super::level::Level;

/// One call made on a `RecordingSink`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Play(SoundCue),
    EndScreen(SoundCue),
    Loop(SoundCue),
    StopLoop(SoundCue),
    FadeIn(SoundCue, u64),
    FadeOut(SoundCue, u64),
    PauseAll,
    ResumeAll,
    StopMusic,
    GameOver,
    NewGame,
}

/// Sound sink that logs every call. The log handle stays with the test
/// after the sink is boxed into a session.
pub struct RecordingSink {
    log: Rc<RefCell<Vec<SinkCall>>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<SinkCall>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (RecordingSink { log: Rc::clone(&log) }, log)
    }

    fn push(&self, call: SinkCall) {
        self.log.borrow_mut().push(call);
    }
}

impl SoundSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        self.push(SinkCall::Play(cue));
    }
    fn play_end_screen(&mut self, cue: SoundCue) {
        self.push(SinkCall::EndScreen(cue));
    }
    fn play_looping(&mut self, cue: SoundCue) {
        self.push(SinkCall::Loop(cue));
    }
    fn stop_looping(&mut self, cue: SoundCue) {
        self.push(SinkCall::StopLoop(cue));
    }
    fn crossfade_from_background(&mut self, cue: SoundCue, duration_ms: u64) {
        self.push(SinkCall::FadeIn(cue, duration_ms));
    }
    fn crossfade_to_background(&mut self, cue: SoundCue, duration_ms: u64) {
        self.push(SinkCall::FadeOut(cue, duration_ms));
    }
    fn pause_all(&mut self) {
        self.push(SinkCall::PauseAll);
    }
    fn resume_all(&mut self) {
        self.push(SinkCall::ResumeAll);
    }
    fn stop_background_music(&mut self) {
        self.push(SinkCall::StopMusic);
    }
    fn game_over(&mut self) {
        self.push(SinkCall::GameOver);
    }
    fn new_game(&mut self) {
        self.push(SinkCall::NewGame);
    }
}

/// One call made on a `RecordingSurface`.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Translate(f32),
    Image { img: &'static str, rect: Rect, mirrored: bool },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Image keys in draw order.
    pub fn images(&self) -> Vec<&'static str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { img, .. } => Some(*img),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }
    fn translate(&mut self, dx: f32) {
        self.calls.push(DrawCall::Translate(dx));
    }
    fn draw_image(&mut self, img: &'static str, rect: Rect, mirrored: bool) {
        self.calls.push(DrawCall::Image { img, rect, mirrored });
    }
}

/// Backgrounds only: no enemies, clouds or pickups.
pub fn bare_level() -> Level {
    Level::bare()
}
