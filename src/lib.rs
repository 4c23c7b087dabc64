// Atari 7800 frontend library
// Keyboard joysticks, console switches and high score cartridge persistence

// Public modules
pub mod cartridge;
pub mod config;
pub mod events;
pub mod highscore;
pub mod input;
pub mod logger;
pub mod session;

// Re-export main types for convenience
pub use cartridge::{CartridgeMetadata, CartridgeSwitches};
pub use config::{ConfigError, FrontendConfig, HighScoreConfig};
pub use events::{Event, EventBus};
pub use highscore::{
    Clock, FileStore, HighScoreCallback, HighScoreError, KeyValueStore, ManualClock, MemoryStore,
    NullHighScoreCallback, ScoreStore, StorageError, SystemClock,
};
pub use input::{InputMapper, JoystickMapping, JoystickState, Player};
pub use logger::{LogLevel, Logger};
pub use session::Session;
