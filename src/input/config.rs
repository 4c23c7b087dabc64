// Input configuration module
//
// Key bindings are stored as winit `KeyCode` names (e.g. "ArrowLeft", "F5")
// so the configuration file stays readable and editable by hand.

use super::console::ConsoleKeys;
use super::keyboard::KeyBindings;
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

/// Serializable joystick key mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickKeyConfig {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub button1: String,
    pub button2: String,
}

impl JoystickKeyConfig {
    /// Default mapping for Player 1
    pub fn player1_default() -> Self {
        Self::from_bindings(&KeyBindings::player1_default())
    }

    /// Default mapping for Player 2
    pub fn player2_default() -> Self {
        Self::from_bindings(&KeyBindings::player2_default())
    }

    /// Convert to runtime bindings
    ///
    /// # Returns
    /// Result containing KeyBindings or error message naming the bad key
    pub fn to_bindings(&self) -> Result<KeyBindings, String> {
        Ok(KeyBindings {
            left: string_to_keycode(&self.left)?,
            right: string_to_keycode(&self.right)?,
            up: string_to_keycode(&self.up)?,
            down: string_to_keycode(&self.down)?,
            button1: string_to_keycode(&self.button1)?,
            button2: string_to_keycode(&self.button2)?,
        })
    }

    /// Create from runtime bindings
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        Self {
            left: keycode_to_string(bindings.left),
            right: keycode_to_string(bindings.right),
            up: keycode_to_string(bindings.up),
            down: keycode_to_string(bindings.down),
            button1: keycode_to_string(bindings.button1),
            button2: keycode_to_string(bindings.button2),
        }
    }
}

/// Serializable console panel key mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleKeyConfig {
    pub reset: String,
    pub select: String,
    pub pause: String,
    pub left_difficulty: String,
    pub right_difficulty: String,
    pub ignore: String,
    pub full_screen: Vec<String>,
}

impl ConsoleKeyConfig {
    /// Convert to runtime console bindings
    pub fn to_console_keys(&self) -> Result<ConsoleKeys, String> {
        let full_screen = self
            .full_screen
            .iter()
            .map(|s| string_to_keycode(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConsoleKeys {
            reset: string_to_keycode(&self.reset)?,
            select: string_to_keycode(&self.select)?,
            pause: string_to_keycode(&self.pause)?,
            left_difficulty: string_to_keycode(&self.left_difficulty)?,
            right_difficulty: string_to_keycode(&self.right_difficulty)?,
            ignore: string_to_keycode(&self.ignore)?,
            full_screen,
        })
    }

    /// Create from runtime console bindings
    pub fn from_console_keys(keys: &ConsoleKeys) -> Self {
        Self {
            reset: keycode_to_string(keys.reset),
            select: keycode_to_string(keys.select),
            pause: keycode_to_string(keys.pause),
            left_difficulty: keycode_to_string(keys.left_difficulty),
            right_difficulty: keycode_to_string(keys.right_difficulty),
            ignore: keycode_to_string(keys.ignore),
            full_screen: keys.full_screen.iter().map(|&k| keycode_to_string(k)).collect(),
        }
    }
}

impl Default for ConsoleKeyConfig {
    fn default() -> Self {
        Self::from_console_keys(&ConsoleKeys::default_bindings())
    }
}

/// Complete input configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Keyboard mapping for Player 1
    pub player1: JoystickKeyConfig,
    /// Keyboard mapping for Player 2
    pub player2: JoystickKeyConfig,
    /// Console panel keys
    pub console: ConsoleKeyConfig,
}

impl InputConfig {
    /// Create a new input configuration with default mappings
    pub fn new() -> Self {
        Self {
            player1: JoystickKeyConfig::player1_default(),
            player2: JoystickKeyConfig::player2_default(),
            console: ConsoleKeyConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert KeyCode to string representation
pub fn keycode_to_string(key: KeyCode) -> String {
    format!("{:?}", key)
}

/// Convert string to KeyCode
///
/// Covers letters, digits, arrows, function keys and the common modifiers.
pub fn string_to_keycode(s: &str) -> Result<KeyCode, String> {
    match s {
        "KeyA" => Ok(KeyCode::KeyA),
        "KeyB" => Ok(KeyCode::KeyB),
        "KeyC" => Ok(KeyCode::KeyC),
        "KeyD" => Ok(KeyCode::KeyD),
        "KeyE" => Ok(KeyCode::KeyE),
        "KeyF" => Ok(KeyCode::KeyF),
        "KeyG" => Ok(KeyCode::KeyG),
        "KeyH" => Ok(KeyCode::KeyH),
        "KeyI" => Ok(KeyCode::KeyI),
        "KeyJ" => Ok(KeyCode::KeyJ),
        "KeyK" => Ok(KeyCode::KeyK),
        "KeyL" => Ok(KeyCode::KeyL),
        "KeyM" => Ok(KeyCode::KeyM),
        "KeyN" => Ok(KeyCode::KeyN),
        "KeyO" => Ok(KeyCode::KeyO),
        "KeyP" => Ok(KeyCode::KeyP),
        "KeyQ" => Ok(KeyCode::KeyQ),
        "KeyR" => Ok(KeyCode::KeyR),
        "KeyS" => Ok(KeyCode::KeyS),
        "KeyT" => Ok(KeyCode::KeyT),
        "KeyU" => Ok(KeyCode::KeyU),
        "KeyV" => Ok(KeyCode::KeyV),
        "KeyW" => Ok(KeyCode::KeyW),
        "KeyX" => Ok(KeyCode::KeyX),
        "KeyY" => Ok(KeyCode::KeyY),
        "KeyZ" => Ok(KeyCode::KeyZ),
        "Digit0" => Ok(KeyCode::Digit0),
        "Digit1" => Ok(KeyCode::Digit1),
        "Digit2" => Ok(KeyCode::Digit2),
        "Digit3" => Ok(KeyCode::Digit3),
        "Digit4" => Ok(KeyCode::Digit4),
        "Digit5" => Ok(KeyCode::Digit5),
        "Digit6" => Ok(KeyCode::Digit6),
        "Digit7" => Ok(KeyCode::Digit7),
        "Digit8" => Ok(KeyCode::Digit8),
        "Digit9" => Ok(KeyCode::Digit9),
        "ArrowUp" => Ok(KeyCode::ArrowUp),
        "ArrowDown" => Ok(KeyCode::ArrowDown),
        "ArrowLeft" => Ok(KeyCode::ArrowLeft),
        "ArrowRight" => Ok(KeyCode::ArrowRight),
        "F1" => Ok(KeyCode::F1),
        "F2" => Ok(KeyCode::F2),
        "F3" => Ok(KeyCode::F3),
        "F4" => Ok(KeyCode::F4),
        "F5" => Ok(KeyCode::F5),
        "F6" => Ok(KeyCode::F6),
        "F7" => Ok(KeyCode::F7),
        "F8" => Ok(KeyCode::F8),
        "F9" => Ok(KeyCode::F9),
        "F10" => Ok(KeyCode::F10),
        "F11" => Ok(KeyCode::F11),
        "F12" => Ok(KeyCode::F12),
        "Enter" => Ok(KeyCode::Enter),
        "Space" => Ok(KeyCode::Space),
        "Tab" => Ok(KeyCode::Tab),
        "Escape" => Ok(KeyCode::Escape),
        "Backspace" => Ok(KeyCode::Backspace),
        "ShiftLeft" => Ok(KeyCode::ShiftLeft),
        "ShiftRight" => Ok(KeyCode::ShiftRight),
        "ControlLeft" => Ok(KeyCode::ControlLeft),
        "ControlRight" => Ok(KeyCode::ControlRight),
        "AltLeft" => Ok(KeyCode::AltLeft),
        "AltRight" => Ok(KeyCode::AltRight),
        _ => Err(format!("Unknown key code: {}", s)),
    }
}
