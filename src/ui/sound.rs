/// Sound engine: procedural retro cues via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time.
/// Effects keep their sink until they finish, so a pause freezes them
/// along with the music (the pause/unpause cues excepted). Music tracks
/// (background, sleeping, boss alert, end screens) keep their sink so
/// they can also be faded and stopped.
///
/// Gating lives in `SoundState`, which has no device and is what the
/// tests exercise:
///   - effects are dropped while paused or after game over
///     (the pause/unpause cues excepted)
///   - end-screen cues always play
///   - mute silences everything without touching the state
///
/// Compile without the "sound" feature to get a stub engine that keeps
/// the state but never opens a device.

use crate::config::AudioConfig;
use crate::sim::audio::SoundCue;

/// Steps per crossfade.
pub const FADE_STEPS: u32 = 50;

/// One running crossfade: `fading_out` goes 1→0 while `fading_in` goes 0→1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossfade {
    pub fading_out: SoundCue,
    pub fading_in: SoundCue,
    duration_ms: u64,
    elapsed_ms: u64,
}

impl Crossfade {
    pub fn new(fading_out: SoundCue, fading_in: SoundCue, duration_ms: u64) -> Self {
        Crossfade { fading_out, fading_in, duration_ms: duration_ms.max(1), elapsed_ms: 0 }
    }

    /// Progress quantized to whole steps, 0.0 ..= 1.0.
    pub fn progress(&self) -> f32 {
        let step_ms = (self.duration_ms / FADE_STEPS as u64).max(1);
        let steps = (self.elapsed_ms / step_ms).min(FADE_STEPS as u64);
        steps as f32 / FADE_STEPS as f32
    }

    pub fn advance(&mut self, dt_ms: u64) {
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Device-independent engine state.
#[derive(Debug)]
pub struct SoundState {
    pub volume: f32,
    pub muted: bool,
    pub paused: bool,
    pub game_over: bool,
    pub fade: Option<Crossfade>,
}

impl SoundState {
    pub fn new(cfg: &AudioConfig) -> Self {
        SoundState {
            volume: cfg.volume,
            muted: cfg.muted,
            paused: false,
            game_over: false,
            fade: None,
        }
    }

    pub fn allows_effect(&self, cue: SoundCue) -> bool {
        cue.ignores_pause() || !(self.paused || self.game_over)
    }

    /// Music may start only in live play.
    pub fn allows_music(&self) -> bool {
        !(self.paused || self.game_over)
    }

    /// Output gain for a track, fade included.
    pub fn gain(&self, cue: SoundCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let fade = match self.fade {
            Some(f) if f.fading_in == cue => f.progress(),
            Some(f) if f.fading_out == cue => 1.0 - f.progress(),
            _ => 1.0,
        };
        self.volume * fade
    }

    pub fn reset(&mut self) {
        self.paused = false;
        self.game_over = false;
        self.fade = None;
    }
}

/// Whether a sound already playing is held while the game is paused.
/// The pause/unpause cues play through their own transition.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
pub fn freezes_on_pause(cue: SoundCue) -> bool {
    !cue.ignores_pause()
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::debug;

    use super::{freezes_on_pause, Crossfade, SoundState};
    use crate::config::AudioConfig;
    use crate::error::GameError;
    use crate::sim::audio::{SoundCue, SoundSink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: HashMap<SoundCue, Arc<Vec<u8>>>,
        /// Music tracks currently owning a sink.
        tracks: HashMap<SoundCue, Sink>,
        /// One-shots still playing.
        effects: Vec<(SoundCue, Sink)>,
        pub state: SoundState,
    }

    impl SoundEngine {
        pub fn new(cfg: &AudioConfig) -> Result<Self, GameError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;

            // ── Generate all sound buffers ──
            let buffers = SoundCue::ALL
                .iter()
                .map(|&cue| (cue, Arc::new(make_wav(&generate(cue)))))
                .collect();

            Ok(SoundEngine {
                _stream: stream,
                handle,
                buffers,
                tracks: HashMap::new(),
                effects: Vec::new(),
                state: SoundState::new(cfg),
            })
        }

        fn sink_for(&self, cue: SoundCue, looping: bool) -> Option<Sink> {
            let buf = self.buffers.get(&cue)?;
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    debug!(?cue, error = %e, "no sink");
                    return None;
                }
            };
            let src = match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(s) => s,
                Err(e) => {
                    debug!(?cue, error = %e, "cue failed to decode");
                    return None;
                }
            };
            if looping {
                sink.append(src.repeat_infinite());
            } else {
                sink.append(src);
            }
            sink.set_volume(self.state.gain(cue));
            Some(sink)
        }

        fn fire(&mut self, cue: SoundCue) {
            self.effects.retain(|(_, sink)| !sink.empty());
            if let Some(sink) = self.sink_for(cue, false) {
                self.effects.push((cue, sink));
            }
        }

        fn stop_effects(&mut self) {
            for (_, sink) in self.effects.drain(..) {
                sink.stop();
            }
        }

        fn start_track(&mut self, cue: SoundCue, looping: bool) {
            if self.tracks.contains_key(&cue) {
                return;
            }
            if let Some(sink) = self.sink_for(cue, looping) {
                self.tracks.insert(cue, sink);
            }
        }

        fn stop_track(&mut self, cue: SoundCue) {
            if let Some(sink) = self.tracks.remove(&cue) {
                sink.stop();
            }
        }

        fn apply_gains(&self) {
            let effects = self.effects.iter().map(|(cue, sink)| (cue, sink));
            for (cue, sink) in self.tracks.iter().chain(effects) {
                sink.set_volume(self.state.gain(*cue));
            }
        }
    }

    impl SoundSink for SoundEngine {
        fn play(&mut self, cue: SoundCue) {
            if self.state.allows_effect(cue) {
                self.fire(cue);
            } else {
                debug!(?cue, "cue suppressed");
            }
        }

        fn play_end_screen(&mut self, cue: SoundCue) {
            if cue.is_music() {
                self.start_track(cue, false);
            } else {
                self.fire(cue);
            }
        }

        fn play_looping(&mut self, cue: SoundCue) {
            if self.state.allows_music() {
                self.start_track(cue, true);
            }
        }

        fn stop_looping(&mut self, cue: SoundCue) {
            self.stop_track(cue);
        }

        fn crossfade_from_background(&mut self, cue: SoundCue, duration_ms: u64) {
            if !self.state.allows_music() {
                return;
            }
            self.state.fade = Some(Crossfade::new(SoundCue::Background, cue, duration_ms));
            self.start_track(cue, true);
            self.apply_gains();
        }

        fn crossfade_to_background(&mut self, cue: SoundCue, duration_ms: u64) {
            if !self.tracks.contains_key(&cue) {
                return;
            }
            self.state.fade = Some(Crossfade::new(cue, SoundCue::Background, duration_ms));
            self.start_track(SoundCue::Background, true);
            self.apply_gains();
        }

        fn pause_all(&mut self) {
            self.state.paused = true;
            for sink in self.tracks.values() {
                sink.pause();
            }
            for (cue, sink) in &self.effects {
                if freezes_on_pause(*cue) {
                    sink.pause();
                }
            }
        }

        fn resume_all(&mut self) {
            self.state.paused = false;
            for sink in self.tracks.values() {
                sink.play();
            }
            for (_, sink) in &self.effects {
                sink.play();
            }
        }

        fn stop_background_music(&mut self) {
            let music: Vec<SoundCue> = self.tracks.keys().copied().filter(|c| c.is_music()).collect();
            for cue in music {
                self.stop_track(cue);
            }
            self.state.fade = None;
        }

        fn game_over(&mut self) {
            for (_, sink) in self.tracks.drain() {
                sink.stop();
            }
            self.stop_effects();
            self.state.fade = None;
            self.state.game_over = true;
        }

        fn new_game(&mut self) {
            for (_, sink) in self.tracks.drain() {
                sink.stop();
            }
            self.stop_effects();
            self.state.reset();
            self.start_track(SoundCue::Background, true);
        }

        fn update(&mut self, dt_ms: u64) {
            let Some(mut fade) = self.state.fade else { return };
            if self.state.paused {
                return;
            }
            fade.advance(dt_ms);
            self.state.fade = Some(fade);
            self.apply_gains();
            if fade.is_done() {
                self.stop_track(fade.fading_out);
                self.state.fade = None;
                self.apply_gains();
            }
        }

        fn toggle_mute(&mut self) -> bool {
            self.state.muted = !self.state.muted;
            self.apply_gains();
            self.state.muted
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    const TAU: f32 = std::f32::consts::TAU;

    fn generate(cue: SoundCue) -> Vec<f32> {
        match cue {
            SoundCue::Background => gen_background(),
            SoundCue::Jump => gen_sweep(300.0, 700.0, 0.14, 0.25),
            SoundCue::Hurt => gen_sweep(420.0, 160.0, 0.18, 0.3),
            SoundCue::Dead => gen_notes(&[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.3)], 0.3),
            SoundCue::Sleeping => gen_snore(),
            SoundCue::Coin => gen_notes(&[(1047.0, 0.045), (1319.0, 0.045), (1568.0, 0.06)], 0.25),
            SoundCue::BottleThrow => gen_noise(0.18, 0.2, 99),
            SoundCue::BottleCollect => gen_notes(&[(660.0, 0.05), (880.0, 0.07)], 0.25),
            SoundCue::BottleSplash => gen_noise(0.25, 0.35, 12345),
            SoundCue::ChickenDead => gen_sweep(1200.0, 500.0, 0.12, 0.25),
            SoundCue::EndbossAlert => gen_alert(),
            SoundCue::EndbossHurt => gen_sweep(500.0, 180.0, 0.25, 0.35),
            SoundCue::EndbossDead => gen_sweep(400.0, 60.0, 0.8, 0.35),
            SoundCue::Pause => gen_notes(&[(880.0, 0.06), (660.0, 0.08)], 0.2),
            SoundCue::Unpause => gen_notes(&[(660.0, 0.06), (880.0, 0.08)], 0.2),
            SoundCue::YouWin => gen_notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.4)], 0.3),
            SoundCue::YouLose => gen_notes(&[(392.0, 0.2), (349.0, 0.2), (311.0, 0.2), (262.0, 0.6)], 0.3),
        }
    }

    /// Sine + 3rd harmonic at `freq`, linear fade out.
    fn tone(freq: f32, duration: f32, volume: f32) -> impl Iterator<Item = f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n).map(move |i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
            wave * env * volume
        })
    }

    fn gen_notes(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
        notes.iter().flat_map(|&(f, d)| tone(f, d, volume)).collect()
    }

    /// Pitch glide from `f0` to `f1`.
    fn gen_sweep(f0: f32, f1: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                phase += freq / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - t).powf(0.6) * volume
            })
            .collect()
    }

    /// LCG noise burst.
    fn gen_noise(duration: f32, volume: f32, seed: u32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng = seed;
        (0..n)
            .map(|i| {
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                noise * (1.0 - i as f32 / n as f32).powf(0.8) * volume
            })
            .collect()
    }

    fn gen_background() -> Vec<f32> {
        const MELODY: [f32; 8] = [392.0, 440.0, 494.0, 523.0, 494.0, 440.0, 392.0, 330.0];
        MELODY.iter().flat_map(|&f| tone(f, 0.25, 0.12)).collect()
    }

    fn gen_alert() -> Vec<f32> {
        const RIFF: [f32; 4] = [220.0, 233.0, 220.0, 208.0];
        RIFF.iter().flat_map(|&f| tone(f, 0.18, 0.2)).collect()
    }

    /// Slow low wobble, 1.5 s.
    fn gen_snore() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 1.5) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let swell = (t * TAU / 1.5).sin().abs();
                (t * 90.0 * TAU).sin() * swell * 0.15
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn every_cue_has_samples_in_range() {
            for cue in SoundCue::ALL {
                let samples = generate(cue);
                assert!(!samples.is_empty(), "{cue:?}");
                assert!(samples.iter().all(|s| s.abs() <= 1.0), "{cue:?}");
            }
        }

        #[test]
        fn wav_header_matches_payload() {
            let wav = make_wav(&[0.0; 100]);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + 200);
            assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 200);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: the stub keeps state but never opens a device
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine {
    pub state: SoundState,
}

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(cfg: &AudioConfig) -> Result<Self, crate::error::GameError> {
        Ok(SoundEngine { state: SoundState::new(cfg) })
    }
}

#[cfg(not(feature = "sound"))]
impl crate::sim::audio::SoundSink for SoundEngine {
    fn play(&mut self, _cue: SoundCue) {}
    fn play_end_screen(&mut self, _cue: SoundCue) {}
    fn play_looping(&mut self, _cue: SoundCue) {}
    fn stop_looping(&mut self, _cue: SoundCue) {}
    fn crossfade_from_background(&mut self, _cue: SoundCue, _duration_ms: u64) {}
    fn crossfade_to_background(&mut self, _cue: SoundCue, _duration_ms: u64) {}
    fn pause_all(&mut self) {
        self.state.paused = true;
    }
    fn resume_all(&mut self) {
        self.state.paused = false;
    }
    fn stop_background_music(&mut self) {}
    fn game_over(&mut self) {
        self.state.game_over = true;
    }
    fn new_game(&mut self) {
        self.state.reset();
    }
    fn toggle_mute(&mut self) -> bool {
        self.state.muted = !self.state.muted;
        self.state.muted
    }
}
