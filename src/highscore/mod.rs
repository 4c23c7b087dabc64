// High score module - Persistent SRAM for the high score cartridge
//
// The high score cartridge keeps its score tables in 2 KiB of SRAM. Games
// poke it a byte at a time, often dozens of times in a burst while a table
// is re-sorted, so writes are coalesced: the first changed score byte arms a
// 2 second timer and everything written before it expires goes out in one
// save.

mod callback;
pub mod sram;
mod storage;
mod timer;

pub use callback::{HighScoreCallback, NullHighScoreCallback};
pub use sram::{Sram, SramError, SRAM_OFFSET, SRAM_SCORE_OFFSET, SRAM_SIZE};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use timer::{Clock, FlushTimer, ManualClock, SystemClock};

use crate::events::{Event, EventBus};
use crate::logger::Logger;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Delay between the first unsaved score write and the save
pub const WRITE_DELAY: Duration = Duration::from_millis(2000);

/// Storage key the SRAM image is kept under
pub const STORAGE_KEY: &str = "highScoreSRAM";

/// Errors loading or saving the SRAM image
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sram(#[from] SramError),
}

/// Tunables for a score store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreStoreSettings {
    /// Storage key for the SRAM image
    pub storage_key: String,
    /// Debounce delay
    pub write_delay: Duration,
}

impl Default for ScoreStoreSettings {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            write_delay: WRITE_DELAY,
        }
    }
}

/// High score SRAM with debounced persistence
pub struct ScoreStore<S: KeyValueStore> {
    sram: Sram,

    /// Changed score bytes since the last save
    pending: u32,

    timer: FlushTimer,
    settings: ScoreStoreSettings,

    storage: S,
    rom: Vec<u8>,

    clock: Rc<dyn Clock>,
    bus: Rc<EventBus>,
    logger: Rc<Logger>,

    /// Log every score-region write
    debug: bool,
}

impl<S: KeyValueStore> ScoreStore<S> {
    /// Create a score store holding the default score table
    ///
    /// # Arguments
    /// * `storage` - Where the SRAM image is persisted
    /// * `rom` - Program image of the high score cartridge
    pub fn new(
        storage: S,
        rom: Vec<u8>,
        clock: Rc<dyn Clock>,
        bus: Rc<EventBus>,
        logger: Rc<Logger>,
    ) -> Self {
        Self::with_settings(storage, rom, ScoreStoreSettings::default(), clock, bus, logger)
    }

    /// Create a score store with custom settings
    pub fn with_settings(
        storage: S,
        rom: Vec<u8>,
        settings: ScoreStoreSettings,
        clock: Rc<dyn Clock>,
        bus: Rc<EventBus>,
        logger: Rc<Logger>,
    ) -> Self {
        Self {
            sram: sram::default_sram(),
            pending: 0,
            timer: FlushTimer::new(),
            settings,
            storage,
            rom,
            clock,
            bus,
            logger,
            debug: false,
        }
    }

    /// Start-up: reset to the default table and report the ROM
    pub fn init(&mut self, debug: bool) {
        self.debug = debug;
        sram::generate_default(&mut self.sram);

        if self.rom.is_empty() {
            self.logger
                .warning("No high score ROM configured; high scores are disabled");
        } else {
            self.logger.info(format!(
                "High score ROM: {} bytes, md5 {}",
                self.rom.len(),
                self.rom_digest().unwrap_or_default()
            ));
        }
    }

    /// Record a byte written by the running program
    ///
    /// Addresses outside the SRAM window are ignored. Only a changed byte at
    /// or above the score tables counts towards the next save.
    pub fn notify_write(&mut self, address: u16, value: u8) {
        let Some(index) = address
            .checked_sub(SRAM_OFFSET)
            .map(usize::from)
            .filter(|&index| index < SRAM_SIZE)
        else {
            return;
        };

        let changed = self.sram[index] != value;
        if changed {
            self.sram[index] = value;
        }

        let score_write = address >= SRAM_SCORE_OFFSET;
        if changed && score_write {
            self.pending += 1;
            self.timer.arm(self.clock.now(), self.settings.write_delay);
        }

        if self.debug && score_write {
            if changed {
                self.logger.debug(format!(
                    "HSC pending write: 0x{:x} = 0x{:x}, {}",
                    address, value, self.pending
                ));
            } else {
                self.logger.debug(format!(
                    "HSC pending write ignored (no change): 0x{:x} = 0x{:x}, {}",
                    address, value, self.pending
                ));
            }
        }
    }

    /// Save if the debounce timer has expired
    ///
    /// # Returns
    /// true if the timer fired
    pub fn poll(&mut self) -> bool {
        if !self.timer.is_due(self.clock.now()) {
            return false;
        }
        self.flush();
        true
    }

    /// Save now if anything changed since the last save
    ///
    /// Cancels any pending timer first. Save failures are reported on the
    /// bus and not retried; the next changed write starts a new cycle.
    ///
    /// # Returns
    /// true if a save was attempted
    pub fn flush(&mut self) -> bool {
        self.timer.cancel();

        if self.pending == 0 {
            self.logger.info("HSC scores have not changed, ignoring.");
            return false;
        }

        self.pending = 0;
        self.logger.info("HSC scores have changed, saving.");

        if let Err(e) = self.save() {
            let message = format!("Unable to save high scores: {}", e);
            self.logger.error(message.clone());
            self.bus.post(Event::ShowError(message));
        }
        true
    }

    fn save(&mut self) -> Result<(), HighScoreError> {
        self.logger.info("Writing high score SRAM to storage.");
        let encoded = sram::encode(&self.sram);
        self.storage
            .write_value(&self.settings.storage_key, &encoded)?;
        Ok(())
    }

    /// Load persisted SRAM for a starting cartridge
    ///
    /// `callback` receives the SRAM image (restored, or the default table
    /// when nothing was saved), or `None` if storage could not be read.
    pub fn load_for_cartridge<F>(&mut self, callback: F)
    where
        F: FnOnce(Option<&[u8]>),
    {
        match self.load() {
            Ok(()) => callback(Some(&self.sram[..])),
            Err(e) => {
                let message = format!("Unable to load high scores: {}", e);
                self.logger.error(message.clone());
                self.bus.post(Event::ShowError(message));
                callback(None);
            }
        }
    }

    fn load(&mut self) -> Result<(), HighScoreError> {
        self.logger.info("Reading high score SRAM from storage.");

        match self.storage.read_value(&self.settings.storage_key)? {
            Some(encoded) if !encoded.is_empty() => {
                sram::decode_into(&encoded, &mut self.sram)?;
                self.logger.info("Found high score SRAM in storage.");
            }
            _ => self
                .logger
                .info("Not able to find high score SRAM in storage."),
        }
        Ok(())
    }

    /// Cartridge swap: save outstanding writes
    ///
    /// # Returns
    /// Whether storage is usable, i.e. whether the runtime should get this
    /// store or the null callback
    pub fn on_cartridge_loaded(&mut self) -> bool {
        self.flush();
        self.storage.is_available()
    }

    /// MD5 of the high score ROM as lowercase hex, if one is loaded
    pub fn rom_digest(&self) -> Option<String> {
        if self.rom.is_empty() {
            return None;
        }
        Some(format!("{:x}", md5::compute(&self.rom)))
    }

    /// Current SRAM contents
    pub fn sram(&self) -> &Sram {
        &self.sram
    }

    /// Encoded SRAM contents, as they would be saved
    pub fn dump_base64(&self) -> String {
        sram::encode(&self.sram)
    }

    /// Log the encoded SRAM contents
    pub fn log_dump(&self) {
        self.logger
            .info(format!("High score SRAM: {}", self.dump_base64()));
    }

    /// Changed score bytes waiting to be saved
    pub fn pending_writes(&self) -> u32 {
        self.pending
    }

    /// The debounce timer
    pub fn timer(&self) -> &FlushTimer {
        &self.timer
    }

    pub fn settings(&self) -> &ScoreStoreSettings {
        &self.settings
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable storage backend
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

impl<S: KeyValueStore> HighScoreCallback for ScoreStore<S> {
    fn rom(&self) -> Option<&[u8]> {
        if self.rom.is_empty() {
            None
        } else {
            Some(&self.rom)
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        self.notify_write(address, value);
    }

    fn load_sram(&mut self) -> Option<Vec<u8>> {
        let mut loaded = None;
        self.load_for_cartridge(|sram| loaded = sram.map(<[u8]>::to_vec));
        loaded
    }
}
