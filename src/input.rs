// Input module - Keyboard joysticks and console switches
//
// The 7800 has two joystick ports (four directions, two buttons each) and a
// console panel with momentary Reset/Select/Pause buttons plus two latched
// difficulty switches. This module maps the host keyboard onto both.

pub mod config;
pub mod console;
pub mod keyboard;

pub use config::{ConsoleKeyConfig, InputConfig, JoystickKeyConfig};
pub use console::{ConsoleKey, ConsoleKeys, ConsoleSwitchState};
pub use keyboard::{InputMapper, JoystickButton, JoystickMapping, KeyBindings, Player};

/// Snapshot of one joystick as the runtime samples it
///
/// Directions already have the opposing-key tie-break applied, so at most one
/// of `left`/`right` and one of `up`/`down` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoystickState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub button1: bool,
    pub button2: bool,
}

impl JoystickState {
    /// Create a joystick state with everything released
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is pressed
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
