/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or the
/// shared data directories. Falls back to defaults if the file is missing
/// or incomplete. A file that fails to parse is recorded in `load_errors`
/// so the caller can log it once logging is up.
///
/// Gameplay tuning is not configurable; those values live as constants
/// next to the entities they govern.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::GameError;

const APP_DIR: &str = "pollo-loco";

// ── Public Config Struct ──

#[derive(Debug, Default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub gamepad: GamepadConfig,
    pub general: GeneralConfig,
    pub load_errors: Vec<GameError>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Host loop sleep between frames.
    pub frame_sleep_ms: u64,
    /// Longest stretch of game time one host frame may simulate.
    pub max_frame_step_ms: u64,
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    /// 0.0 ..= 1.0
    pub volume: f32,
    pub muted: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub throw: Vec<String>,
    pub pause: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub log_file: PathBuf,
    pub log_level: String,
    /// Fixed level seed; random when absent.
    pub seed: Option<u64>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
    #[serde(default = "default_max_frame_step")]
    max_frame_step_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default)]
    muted: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_throw")]
    throw: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_frame_sleep() -> u64 { 5 }
fn default_max_frame_step() -> u64 { 250 }
fn default_volume() -> f32 { 0.6 }

fn default_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_throw() -> Vec<String> { vec!["X".into(), "Y".into(), "R1".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_file() -> String { "pollo-loco.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_sleep_ms: default_frame_sleep(),
            max_frame_step_ms: default_max_frame_step(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { volume: default_volume(), muted: false }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            throw: default_throw(),
            pause: default_pause(),
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
            log_level: default_log_level(),
            seed: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TomlTiming::default().into()
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        TomlAudio::default().into()
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        TomlGamepad::default().into()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        TomlGeneral::default().into()
    }
}

// ── Schema → Config ──

impl From<TomlTiming> for TimingConfig {
    fn from(t: TomlTiming) -> Self {
        TimingConfig {
            frame_sleep_ms: t.frame_sleep_ms,
            max_frame_step_ms: t.max_frame_step_ms.max(1),
        }
    }
}

impl From<TomlAudio> for AudioConfig {
    fn from(a: TomlAudio) -> Self {
        AudioConfig { volume: a.volume.clamp(0.0, 1.0), muted: a.muted }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(g: TomlGamepad) -> Self {
        GamepadConfig {
            jump: g.jump,
            throw: g.throw,
            pause: g.pause,
            restart: g.restart,
            quit: g.quit,
        }
    }
}

impl From<TomlGeneral> for GeneralConfig {
    fn from(g: TomlGeneral) -> Self {
        GeneralConfig {
            log_file: PathBuf::from(g.log_file),
            log_level: g.log_level,
            seed: g.seed,
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            timing: t.timing.into(),
            audio: t.audio.into(),
            gamepad: t.gamepad.into(),
            general: t.general.into(),
            load_errors: Vec::new(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, `~/.local/share/pollo-loco`,
    /// `/usr/share/pollo-loco`. The first file found wins.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            let result = std::fs::read_to_string(&path)
                .map_err(|e| GameError::Config(format!("could not read {}: {e}", path.display())))
                .and_then(|text| GameConfig::parse(&text));
            return match result {
                Ok(cfg) => cfg,
                Err(e) => GameConfig { load_errors: vec![e], ..GameConfig::default() },
            };
        }
        GameConfig::default()
    }

    pub fn parse(text: &str) -> Result<Self, GameError> {
        toml::from_str::<TomlConfig>(text)
            .map(GameConfig::from)
            .map_err(|e| GameError::Config(format!("config.toml parse error: {e}")))
    }
}

/// Candidate directories to search: exe dir + CWD + data dirs (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![];
    let mut push = |dir: PathBuf| {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    };

    if let Ok(exe) = std::env::current_exe() {
        // follow symlinks so an installed link still finds the real binary's dir
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        push(cwd);
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share").join(APP_DIR);
        if xdg.is_dir() {
            push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share").join(APP_DIR);
    if sys.is_dir() {
        push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.timing.frame_sleep_ms, 5);
        assert_eq!(cfg.timing.max_frame_step_ms, 250);
        assert_eq!(cfg.audio.volume, 0.6);
        assert!(!cfg.audio.muted);
        assert_eq!(cfg.gamepad.pause, vec!["Start".to_string()]);
        assert_eq!(cfg.general.log_file, PathBuf::from("pollo-loco.log"));
        assert_eq!(cfg.general.seed, None);
    }

    #[test]
    fn sections_override_only_what_they_name() {
        let cfg = GameConfig::parse(
            r#"
            [audio]
            muted = true
            volume = 3.0

            [general]
            seed = 42

            [gamepad]
            jump = ["X"]
            "#,
        )
        .unwrap();
        assert!(cfg.audio.muted);
        assert_eq!(cfg.audio.volume, 1.0);
        assert_eq!(cfg.general.seed, Some(42));
        assert_eq!(cfg.general.log_level, "info");
        assert_eq!(cfg.gamepad.jump, vec!["X".to_string()]);
        assert_eq!(cfg.gamepad.throw.len(), 3);
    }

    #[test]
    fn broken_toml_is_a_config_error() {
        let err = GameConfig::parse("[timing\nframe_sleep_ms = ").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }
}
