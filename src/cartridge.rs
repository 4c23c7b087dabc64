// Cartridge metadata access
//
// The emulator runtime owns the loaded cartridge. The frontend only needs the
// default positions of the two difficulty switches the cartridge declares.

use std::cell::Cell;

/// Read-only view of the loaded cartridge's declared defaults
pub trait CartridgeMetadata {
    /// Default position of the left difficulty switch (true = set)
    fn left_switch(&self) -> bool;

    /// Default position of the right difficulty switch (true = set)
    fn right_switch(&self) -> bool;
}

/// Difficulty switch defaults held by value
///
/// Used before a cartridge is loaded and by hosts that parse the cartridge
/// header themselves. Interior mutability lets the host update the defaults
/// through a shared handle when it swaps cartridges.
#[derive(Debug)]
pub struct CartridgeSwitches {
    left: Cell<bool>,
    right: Cell<bool>,
}

impl CartridgeSwitches {
    /// Create switch defaults
    pub fn new(left: bool, right: bool) -> Self {
        Self {
            left: Cell::new(left),
            right: Cell::new(right),
        }
    }

    /// Replace both defaults
    pub fn set(&self, left: bool, right: bool) {
        self.left.set(left);
        self.right.set(right);
    }
}

impl Default for CartridgeSwitches {
    /// Left set, right clear: the console defaults used when a cartridge
    /// declares nothing
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl CartridgeMetadata for CartridgeSwitches {
    fn left_switch(&self) -> bool {
        self.left.get()
    }

    fn right_switch(&self) -> bool {
        self.right.get()
    }
}
