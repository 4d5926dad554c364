/// Entry point and host loop.
///
/// The host owns everything outside the simulation: terminal, keyboard,
/// gamepad, audio device and the wall clock. Each frame it feeds the
/// held keys to the session, advances the virtual clock by the real
/// time that passed, and draws when the session asks for a frame.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use error::GameError;
use sim::audio::{NullSink, SoundSink};
use sim::level::Level;
use sim::session::GameSession;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::WorldRenderer;
use ui::sound::SoundEngine;
use ui::terminal::TerminalSurface;

const PAUSE_BANNER: &str = "PAUSED  [Esc] resume  [q] quit";

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    for e in &config.load_errors {
        warn!(error = %e, "config.toml ignored, using defaults");
    }

    let mut surface = TerminalSurface::new();
    if let Err(e) = surface.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut surface, &config);

    if let Err(e) = surface.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Pollo Loco!");
}

/// Log to a file; stdout belongs to the game screen.
fn init_logging(config: &GameConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    match File::create(&config.general.log_file) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => eprintln!("Logging disabled ({}): {e}", config.general.log_file.display()),
    }
}

fn open_sound(config: &GameConfig) -> Box<dyn SoundSink> {
    match SoundEngine::new(&config.audio) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            warn!(error = %e, "audio disabled");
            Box::new(NullSink)
        }
    }
}

fn game_loop(surface: &mut TerminalSurface, config: &GameConfig) -> Result<(), GameError> {
    let seed = config.general.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(seed, "level seed");

    let mut input = InputState::new();
    input.honor_release = surface.enable_key_releases();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let renderer = WorldRenderer::new();
    let mut session = GameSession::new(Level::level_one(&mut rng), open_sound(config));

    let max_step = config.timing.max_frame_step_ms;
    let frame_sleep = Duration::from_millis(config.timing.frame_sleep_ms);
    let mut last_frame = Instant::now();

    loop {
        input.drain_events();
        gp.update();

        let mut meta = input.meta();
        gp.merge_meta(&mut meta);

        if meta.quit {
            break;
        }

        if !session.is_paused() {
            let mut kb = input.keyboard();
            gp.merge_into(&mut kb);
            session.keyboard = kb;
        }

        let on_end_screen = {
            let world = session.world();
            world.win_screen_shown || world.game_over_screen_shown
        };
        if meta.restart && on_end_screen {
            session.restart(Level::level_one(&mut rng));
        } else if meta.pause && session.toggle_pause() && session.is_paused() {
            surface.banner(PAUSE_BANNER);
            surface.present()?;
        }

        if meta.mute {
            let muted = session.toggle_mute();
            info!(muted, "mute toggled");
        }

        let elapsed = last_frame.elapsed().as_millis() as u64;
        last_frame = Instant::now();
        session.advance(elapsed.min(max_step));

        if session.wants_frame() {
            let now = session.now();
            let end_screen = renderer.draw(session.world(), surface, now);
            surface.present()?;
            session.frame_drawn(end_screen);
        }

        std::thread::sleep(frame_sleep);
    }

    session.stop();
    Ok(())
}
