// Runtime-facing high score hooks
//
// The emulator runtime talks to the high score cartridge through one of two
// callbacks: the real score store when storage works, or a null callback
// that disables the cartridge.

/// Hooks the runtime calls while a high score cartridge is attached
pub trait HighScoreCallback {
    /// Program image of the high score cartridge
    ///
    /// `None` tells the runtime not to attach the cartridge.
    fn rom(&self) -> Option<&[u8]>;

    /// The running program wrote a byte at a CPU address
    fn write(&mut self, address: u16, value: u8);

    /// Initial SRAM contents for a cartridge that is starting
    ///
    /// `None` when the contents could not be loaded.
    fn load_sram(&mut self) -> Option<Vec<u8>>;
}

/// Callback used when high scores cannot be persisted
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHighScoreCallback;

impl HighScoreCallback for NullHighScoreCallback {
    fn rom(&self) -> Option<&[u8]> {
        None
    }

    fn write(&mut self, _address: u16, _value: u8) {}

    fn load_sram(&mut self) -> Option<Vec<u8>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_callback() {
        let mut callback = NullHighScoreCallback;
        assert!(callback.rom().is_none());
        callback.write(0x1200, 0x42);
        assert!(callback.load_sram().is_none());
    }
}
