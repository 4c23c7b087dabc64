// Keyboard input mapping module
//
// This module maps host keyboard events onto the two 7800 joysticks and the
// console panel. Each joystick resolves opposing directions by favouring the
// most recently pressed key, so sliding from left to right without releasing
// left still turns the player around.

use super::console::{ConsoleKey, ConsoleKeys, ConsoleSwitchState};
use super::JoystickState;
use crate::cartridge::CartridgeMetadata;
use crate::events::{Event, EventBus};
use crate::logger::Logger;
use std::rc::Rc;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Represents which player's joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// Player 1 (left port)
    One,
    /// Player 2 (right port)
    Two,
}

/// Joystick inputs a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickButton {
    Left,
    Right,
    Up,
    Down,
    Button1,
    Button2,
}

/// Key bindings for a single joystick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub button1: KeyCode,
    pub button2: KeyCode,
}

impl KeyBindings {
    /// Create default bindings for Player 1
    ///
    /// # Default Mappings
    /// - Arrow keys: directions
    /// - Z: Button 1
    /// - X: Button 2
    pub fn player1_default() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            button1: KeyCode::KeyZ,
            button2: KeyCode::KeyX,
        }
    }

    /// Create default bindings for Player 2
    ///
    /// # Default Mappings
    /// - J/L/I/K: left/right/up/down
    /// - N: Button 1
    /// - M: Button 2
    pub fn player2_default() -> Self {
        Self {
            left: KeyCode::KeyJ,
            right: KeyCode::KeyL,
            up: KeyCode::KeyI,
            down: KeyCode::KeyK,
            button1: KeyCode::KeyN,
            button2: KeyCode::KeyM,
        }
    }

    /// Get the joystick input bound to a key
    ///
    /// Directions are checked left, up, right, down, then the buttons; the
    /// first match wins when a key is bound twice.
    pub fn get_button(&self, key: KeyCode) -> Option<JoystickButton> {
        if key == self.left {
            Some(JoystickButton::Left)
        } else if key == self.up {
            Some(JoystickButton::Up)
        } else if key == self.right {
            Some(JoystickButton::Right)
        } else if key == self.down {
            Some(JoystickButton::Down)
        } else if key == self.button1 {
            Some(JoystickButton::Button1)
        } else if key == self.button2 {
            Some(JoystickButton::Button2)
        } else {
            None
        }
    }
}

/// One joystick driven from the keyboard
///
/// Tracks which bound keys are physically held and, per axis, which of the
/// two opposing keys went down most recently.
#[derive(Debug, Clone)]
pub struct JoystickMapping {
    bindings: KeyBindings,

    left_held: bool,
    right_held: bool,
    up_held: bool,
    down_held: bool,
    button1_held: bool,
    button2_held: bool,

    /// Left was pressed after right
    left_last: bool,
    /// Up was pressed after down
    up_last: bool,
}

impl JoystickMapping {
    /// Create a joystick with nothing held
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            left_held: false,
            right_held: false,
            up_held: false,
            down_held: false,
            button1_held: false,
            button2_held: false,
            left_last: false,
            up_last: false,
        }
    }

    /// Current key bindings
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Replace the key bindings
    ///
    /// Held state is keyed by input, not by key, so it carries over.
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Rebind a single input
    pub fn bind(&mut self, button: JoystickButton, key: KeyCode) {
        match button {
            JoystickButton::Left => self.bindings.left = key,
            JoystickButton::Right => self.bindings.right = key,
            JoystickButton::Up => self.bindings.up = key,
            JoystickButton::Down => self.bindings.down = key,
            JoystickButton::Button1 => self.bindings.button1 = key,
            JoystickButton::Button2 => self.bindings.button2 = key,
        }
    }

    /// Apply a key transition
    ///
    /// # Returns
    /// true if the key is bound to this joystick
    pub fn handle_key(&mut self, key: KeyCode, down: bool) -> bool {
        let Some(button) = self.bindings.get_button(key) else {
            return false;
        };

        match button {
            JoystickButton::Left => {
                self.left_held = down;
                if down {
                    self.left_last = true;
                }
            }
            JoystickButton::Up => {
                self.up_held = down;
                if down {
                    self.up_last = true;
                }
            }
            JoystickButton::Right => {
                self.right_held = down;
                if down {
                    self.left_last = false;
                }
            }
            JoystickButton::Down => {
                self.down_held = down;
                if down {
                    self.up_last = false;
                }
            }
            JoystickButton::Button1 => self.button1_held = down,
            JoystickButton::Button2 => self.button2_held = down,
        }

        true
    }

    pub fn is_left(&self) -> bool {
        self.left_held && !(self.right_held && !self.left_last)
    }

    pub fn is_right(&self) -> bool {
        self.right_held && !(self.left_held && self.left_last)
    }

    pub fn is_up(&self) -> bool {
        self.up_held && !(self.down_held && !self.up_last)
    }

    pub fn is_down(&self) -> bool {
        self.down_held && !(self.up_held && self.up_last)
    }

    pub fn is_button1(&self) -> bool {
        self.button1_held
    }

    pub fn is_button2(&self) -> bool {
        self.button2_held
    }

    /// Resolved joystick state
    pub fn state(&self) -> JoystickState {
        JoystickState {
            left: self.is_left(),
            right: self.is_right(),
            up: self.is_up(),
            down: self.is_down(),
            button1: self.is_button1(),
            button2: self.is_button2(),
        }
    }

    /// Forget which opposing key was pressed last
    ///
    /// Held keys stay held.
    pub fn reset(&mut self) {
        self.left_last = false;
        self.up_last = false;
    }
}

/// Keyboard input handler for both joysticks and the console panel
///
/// Difficulty switch changes and full screen requests are published on the
/// event bus while the mapper is mutably borrowed, so listeners for those
/// events must not reach back into the mapper synchronously.
pub struct InputMapper {
    player1: JoystickMapping,
    player2: JoystickMapping,
    console_keys: ConsoleKeys,
    switches: ConsoleSwitchState,

    /// Difficulty defaults captured from the last loaded cartridge
    cartridge_left_switch: bool,
    cartridge_right_switch: bool,

    cartridge: Rc<dyn CartridgeMetadata>,
    bus: Rc<EventBus>,
    logger: Rc<Logger>,
}

impl InputMapper {
    /// Create a mapper with the default bindings
    pub fn new(
        cartridge: Rc<dyn CartridgeMetadata>,
        bus: Rc<EventBus>,
        logger: Rc<Logger>,
    ) -> Self {
        Self::with_bindings(
            KeyBindings::player1_default(),
            KeyBindings::player2_default(),
            ConsoleKeys::default_bindings(),
            cartridge,
            bus,
            logger,
        )
    }

    /// Create a mapper with custom bindings
    pub fn with_bindings(
        player1: KeyBindings,
        player2: KeyBindings,
        console_keys: ConsoleKeys,
        cartridge: Rc<dyn CartridgeMetadata>,
        bus: Rc<EventBus>,
        logger: Rc<Logger>,
    ) -> Self {
        Self {
            player1: JoystickMapping::new(player1),
            player2: JoystickMapping::new(player2),
            console_keys,
            switches: ConsoleSwitchState::default(),
            cartridge_left_switch: true,
            cartridge_right_switch: false,
            cartridge,
            bus,
            logger,
        }
    }

    /// Handle a winit keyboard event
    ///
    /// # Returns
    /// true if the key was consumed and the host should not act on it
    pub fn handle_key_event(&mut self, physical_key: PhysicalKey, state: ElementState) -> bool {
        match physical_key {
            PhysicalKey::Code(key) => self.handle_key(key, state.is_pressed()),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    /// Handle a key transition
    ///
    /// Player 1 gets the first chance at the key, then player 2, then the
    /// console panel.
    ///
    /// # Returns
    /// true if the key was consumed and the host should not act on it
    pub fn handle_key(&mut self, key: KeyCode, down: bool) -> bool {
        let handled = self.player1.handle_key(key, down) || self.player2.handle_key(key, down);
        if handled {
            self.logger
                .trace(format!("joystick key {:?} {}", key, if down { "down" } else { "up" }));
            return true;
        }

        let Some(action) = self.console_keys.action(key) else {
            return false;
        };

        match action {
            ConsoleKey::Reset => self.switches.reset_held = down,
            ConsoleKey::Select => self.switches.select_held = down,
            ConsoleKey::Pause => self.switches.pause_held = down,
            ConsoleKey::LeftDifficulty => {
                if !down {
                    self.set_left_diff_set(!self.switches.left_diff_set);
                }
            }
            ConsoleKey::RightDifficulty => {
                if !down {
                    self.set_right_diff_set(!self.switches.right_diff_set);
                }
            }
            ConsoleKey::Ignore => {}
            ConsoleKey::FullScreen => {
                if down {
                    self.bus.post(Event::FullScreen);
                }
            }
        }

        true
    }

    /// Joystick for a player
    pub fn mapping(&self, player: Player) -> &JoystickMapping {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    /// Mutable joystick for a player (rebinding)
    pub fn mapping_mut(&mut self, player: Player) -> &mut JoystickMapping {
        match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        }
    }

    /// Resolved state of a player's joystick
    pub fn joystick_state(&self, player: Player) -> JoystickState {
        self.mapping(player).state()
    }

    /// Console panel bindings
    pub fn console_keys(&self) -> &ConsoleKeys {
        &self.console_keys
    }

    /// Replace the console panel bindings
    pub fn set_console_keys(&mut self, console_keys: ConsoleKeys) {
        self.console_keys = console_keys;
    }

    /// Snapshot of every console control
    pub fn console_state(&self) -> ConsoleSwitchState {
        self.switches
    }

    pub fn is_reset(&self) -> bool {
        self.switches.reset_held
    }

    pub fn is_select(&self) -> bool {
        self.switches.select_held
    }

    pub fn is_pause(&self) -> bool {
        self.switches.pause_held
    }

    pub fn is_left_diff_set(&self) -> bool {
        self.switches.left_diff_set
    }

    pub fn is_right_diff_set(&self) -> bool {
        self.switches.right_diff_set
    }

    /// Set the left difficulty switch and broadcast the new position
    pub fn set_left_diff_set(&mut self, value: bool) {
        self.switches.left_diff_set = value;
        self.logger
            .debug(format!("Left difficulty switch: {}", switch_label(value)));
        self.bus.post(Event::LeftDiffChanged(value));
    }

    /// Set the right difficulty switch and broadcast the new position
    pub fn set_right_diff_set(&mut self, value: bool) {
        self.switches.right_diff_set = value;
        self.logger
            .debug(format!("Right difficulty switch: {}", switch_label(value)));
        self.bus.post(Event::RightDiffChanged(value));
    }

    /// Capture the new cartridge's difficulty defaults and reset
    pub fn on_cartridge_loaded(&mut self) {
        self.cartridge_left_switch = self.cartridge.left_switch();
        self.cartridge_right_switch = self.cartridge.right_switch();
        self.reset();
    }

    /// Reset for a new game
    ///
    /// Clears the tie-break state of both joysticks and puts the difficulty
    /// switches back to the cartridge defaults. Keys held through the reset
    /// stay held.
    pub fn reset(&mut self) {
        self.player1.reset();
        self.player2.reset();

        self.set_left_diff_set(self.cartridge_left_switch);
        self.set_right_diff_set(self.cartridge_right_switch);
    }
}

fn switch_label(value: bool) -> &'static str {
    if value {
        "set"
    } else {
        "clear"
    }
}
