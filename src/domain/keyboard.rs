/// Keyboard-state contract between input sources and the simulation.
///
/// Input handlers (terminal keys, gamepad) write; the character and the
/// throw check read. Every field is level-triggered: true while held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub right: bool,
    pub left: bool,
    /// Jump.
    pub space: bool,
    pub down: bool,
    /// Throw.
    pub f: bool,
}

impl Keyboard {
    pub fn release_all(&mut self) {
        *self = Keyboard::default();
    }
}
