/// Keyboard input tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Level-triggered game keys (walk, jump, throw) fed into `Keyboard`
///   - Edge-triggered meta keys (pause, restart, quit, mute)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::keyboard::Keyboard;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const RIGHT_KEYS: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d')];
const LEFT_KEYS: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a')];
const JUMP_KEYS: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char(' ')];
const DOWN_KEYS: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s')];
const THROW_KEYS: &[KeyCode] = &[KeyCode::Char('f')];

/// One-shot commands outside the game keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetaKeys {
    pub pause: bool,
    pub restart: bool,
    pub quit: bool,
    pub mute: bool,
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain. Used for the meta keys.
    fresh_presses: Vec<KeyCode>,

    ctrl_c: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before advancing the session.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    fn handle(&mut self, key: KeyEvent, at: Instant) {
        let code = normalize(key.code);
        if key.modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.ctrl_c = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&code);
            }
            KeyEventKind::Release => {
                // not trusted without enhancement; the timeout releases it
            }
            _ => {
                let was_held = self.is_held_at(code, at);
                self.last_active.insert(code, at);
                if !was_held {
                    self.fresh_presses.push(code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Snapshot of the game keys.
    pub fn keyboard(&self) -> Keyboard {
        self.keyboard_at(Instant::now())
    }

    fn keyboard_at(&self, now: Instant) -> Keyboard {
        let held = |codes: &[KeyCode]| codes.iter().any(|c| self.is_held_at(*c, now));
        Keyboard {
            right: held(RIGHT_KEYS),
            left: held(LEFT_KEYS),
            space: held(JUMP_KEYS),
            down: held(DOWN_KEYS),
            f: held(THROW_KEYS),
        }
    }

    /// Meta keys pressed during the last drain.
    pub fn meta(&self) -> MetaKeys {
        let pressed = |code: KeyCode| self.fresh_presses.contains(&code);
        MetaKeys {
            pause: pressed(KeyCode::Esc),
            restart: pressed(KeyCode::Char('r')),
            quit: self.ctrl_c || pressed(KeyCode::Char('q')),
            mute: pressed(KeyCode::Char('m')),
        }
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

/// Letters are matched case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn game_keys_map_onto_the_keyboard() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.handle(press(KeyCode::Char('D')), t);
        input.handle(press(KeyCode::Char(' ')), t);
        input.handle(press(KeyCode::Char('f')), t);
        let kb = input.keyboard_at(t);
        assert!(kb.right && kb.space && kb.f);
        assert!(!kb.left && !kb.down);
    }

    #[test]
    fn keys_expire_without_release_events() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.handle(press(KeyCode::Left), t);
        input.handle(release(KeyCode::Left), t);
        assert!(input.keyboard_at(t + Duration::from_millis(100)).left);
        assert!(!input.keyboard_at(t + HOLD_TIMEOUT).left);
    }

    #[test]
    fn honored_release_drops_the_key_at_once() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t = Instant::now();
        input.handle(press(KeyCode::Right), t);
        input.handle(release(KeyCode::Right), t);
        assert!(!input.keyboard_at(t).right);
    }

    #[test]
    fn meta_keys_are_edge_triggered() {
        let mut input = InputState::new();
        let t = Instant::now();
        input.handle(press(KeyCode::Esc), t);
        assert!(input.meta().pause);

        input.fresh_presses.clear();
        input.handle(press(KeyCode::Esc), t + Duration::from_millis(30));
        assert!(!input.meta().pause);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut input = InputState::new();
        input.handle(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(input.meta().quit);
        assert!(!input.keyboard().f);
    }
}
