// Console panel keys and switch state
//
// Reset, Select and Pause are momentary: they follow the physical key.
// The two difficulty switches are latched: each key release flips them.

use winit::keyboard::KeyCode;

/// Console-level key actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleKey {
    /// Momentary Reset button
    Reset,
    /// Momentary Select button
    Select,
    /// Momentary Pause button
    Pause,
    /// Toggles the left difficulty switch on release
    LeftDifficulty,
    /// Toggles the right difficulty switch on release
    RightDifficulty,
    /// Swallowed without effect (keeps the host from acting on it)
    Ignore,
    /// Requests full screen display on press
    FullScreen,
}

/// Key bindings for the console panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleKeys {
    pub reset: KeyCode,
    pub select: KeyCode,
    pub pause: KeyCode,
    pub left_difficulty: KeyCode,
    pub right_difficulty: KeyCode,
    pub ignore: KeyCode,
    pub full_screen: Vec<KeyCode>,
}

impl ConsoleKeys {
    /// Default console bindings
    ///
    /// # Default Mappings
    /// - F2: Reset
    /// - F3: Select
    /// - F4: Pause
    /// - F5: Left difficulty
    /// - F6: Right difficulty
    /// - F1: Ignored
    /// - F9, F11: Full screen
    pub fn default_bindings() -> Self {
        Self {
            reset: KeyCode::F2,
            select: KeyCode::F3,
            pause: KeyCode::F4,
            left_difficulty: KeyCode::F5,
            right_difficulty: KeyCode::F6,
            ignore: KeyCode::F1,
            full_screen: vec![KeyCode::F9, KeyCode::F11],
        }
    }

    /// Get the console action bound to a key, if any
    pub fn action(&self, key: KeyCode) -> Option<ConsoleKey> {
        if key == self.reset {
            Some(ConsoleKey::Reset)
        } else if key == self.select {
            Some(ConsoleKey::Select)
        } else if key == self.pause {
            Some(ConsoleKey::Pause)
        } else if key == self.left_difficulty {
            Some(ConsoleKey::LeftDifficulty)
        } else if key == self.right_difficulty {
            Some(ConsoleKey::RightDifficulty)
        } else if key == self.ignore {
            Some(ConsoleKey::Ignore)
        } else if self.full_screen.contains(&key) {
            Some(ConsoleKey::FullScreen)
        } else {
            None
        }
    }
}

impl Default for ConsoleKeys {
    fn default() -> Self {
        Self::default_bindings()
    }
}

/// Current position of every console control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSwitchState {
    pub reset_held: bool,
    pub select_held: bool,
    pub pause_held: bool,
    pub left_diff_set: bool,
    pub right_diff_set: bool,
}
