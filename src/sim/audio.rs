/// Sound sink contract.
///
/// The simulation only emits `GameEvent`s; `route` turns each one into
/// calls on a `SoundSink`. Sinks are fire-and-forget: they never report
/// failure back, and volume/mute/pause gating is entirely their concern.

use super::event::GameEvent;

/// Named sound cues.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SoundCue {
    Background,
    Jump,
    Hurt,
    Dead,
    Sleeping,
    Coin,
    BottleThrow,
    BottleCollect,
    BottleSplash,
    ChickenDead,
    EndbossAlert,
    EndbossHurt,
    EndbossDead,
    Pause,
    Unpause,
    YouWin,
    YouLose,
}

impl SoundCue {
    pub const ALL: [SoundCue; 17] = [
        SoundCue::Background,
        SoundCue::Jump,
        SoundCue::Hurt,
        SoundCue::Dead,
        SoundCue::Sleeping,
        SoundCue::Coin,
        SoundCue::BottleThrow,
        SoundCue::BottleCollect,
        SoundCue::BottleSplash,
        SoundCue::ChickenDead,
        SoundCue::EndbossAlert,
        SoundCue::EndbossHurt,
        SoundCue::EndbossDead,
        SoundCue::Pause,
        SoundCue::Unpause,
        SoundCue::YouWin,
        SoundCue::YouLose,
    ];

    /// Tracks that count as music: paused with the game, stopped by
    /// `stop_background_music`.
    pub fn is_music(self) -> bool {
        matches!(
            self,
            SoundCue::Background
                | SoundCue::Sleeping
                | SoundCue::EndbossAlert
                | SoundCue::YouWin
                | SoundCue::YouLose
        )
    }

    /// Cues that still play while the game is paused or over.
    pub fn ignores_pause(self) -> bool {
        matches!(self, SoundCue::Pause | SoundCue::Unpause)
    }
}

/// Crossfade durations used by the boss fight.
pub const BOSS_ALERT_FADE_MS: u64 = 2000;
pub const BOSS_DEFEAT_FADE_MS: u64 = 1500;

pub trait SoundSink {
    /// One-shot effect; suppressed while paused or game-over.
    fn play(&mut self, cue: SoundCue);
    /// End-screen cue; plays even after game-over.
    fn play_end_screen(&mut self, cue: SoundCue);
    fn play_looping(&mut self, cue: SoundCue);
    fn stop_looping(&mut self, cue: SoundCue);
    /// Fade the background track out while `cue` fades in.
    fn crossfade_from_background(&mut self, cue: SoundCue, duration_ms: u64);
    /// Fade `cue` out while the background track fades back in.
    fn crossfade_to_background(&mut self, cue: SoundCue, duration_ms: u64);
    fn pause_all(&mut self);
    fn resume_all(&mut self);
    fn stop_background_music(&mut self);
    /// Stop everything and suppress further effects.
    fn game_over(&mut self);
    /// Clear the game-over/paused state and start the background loop.
    fn new_game(&mut self);
    /// Advance fades by `dt_ms`.
    fn update(&mut self, _dt_ms: u64) {}
    /// Flip mute. Returns the new state.
    fn toggle_mute(&mut self) -> bool {
        false
    }
}

/// Sink that drops everything (no audio device, or audio disabled).
#[derive(Debug, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _cue: SoundCue) {}
    fn play_end_screen(&mut self, _cue: SoundCue) {}
    fn play_looping(&mut self, _cue: SoundCue) {}
    fn stop_looping(&mut self, _cue: SoundCue) {}
    fn crossfade_from_background(&mut self, _cue: SoundCue, _duration_ms: u64) {}
    fn crossfade_to_background(&mut self, _cue: SoundCue, _duration_ms: u64) {}
    fn pause_all(&mut self) {}
    fn resume_all(&mut self) {}
    fn stop_background_music(&mut self) {}
    fn game_over(&mut self) {}
    fn new_game(&mut self) {}
}

/// Map one simulation event onto sink calls.
pub fn route(sink: &mut dyn SoundSink, event: &GameEvent) {
    match event {
        GameEvent::SessionStarted => sink.new_game(),
        GameEvent::Jumped => sink.play(SoundCue::Jump),
        GameEvent::CharacterHurt { .. } => sink.play(SoundCue::Hurt),
        GameEvent::CharacterDied => {
            sink.game_over();
            sink.play_end_screen(SoundCue::Dead);
        }
        GameEvent::SleepStarted => sink.play_looping(SoundCue::Sleeping),
        GameEvent::SleepEnded => sink.stop_looping(SoundCue::Sleeping),
        GameEvent::CoinCollected { .. } => sink.play(SoundCue::Coin),
        GameEvent::BottleCollected { .. } => sink.play(SoundCue::BottleCollect),
        GameEvent::BottleThrown { .. } => sink.play(SoundCue::BottleThrow),
        GameEvent::BottleSplashed => sink.play(SoundCue::BottleSplash),
        GameEvent::ChickenKilled => sink.play(SoundCue::ChickenDead),
        GameEvent::EndbossRevealed => {
            sink.crossfade_from_background(SoundCue::EndbossAlert, BOSS_ALERT_FADE_MS);
        }
        GameEvent::EndbossHurt { .. } => sink.play(SoundCue::EndbossHurt),
        GameEvent::EndbossKilled => {
            sink.crossfade_to_background(SoundCue::EndbossAlert, BOSS_DEFEAT_FADE_MS);
            sink.play(SoundCue::EndbossDead);
        }
        GameEvent::LevelCompleted => {
            sink.stop_background_music();
            sink.game_over();
        }
        GameEvent::Paused => {
            sink.play(SoundCue::Pause);
            sink.pause_all();
        }
        GameEvent::Resumed => {
            sink.resume_all();
            sink.play(SoundCue::Unpause);
        }
        GameEvent::WinScreenShown => sink.play_end_screen(SoundCue::YouWin),
        GameEvent::GameOverScreenShown => {
            sink.stop_background_music();
            sink.play_end_screen(SoundCue::YouLose);
        }
    }
}
