// Session - Frontend coordinator
//
// Owns the event bus, the keyboard mapper and the score store for one
// emulator session, and wires them to the lifecycle events. The runtime asks
// the session for the active high score callback and feeds it keyboard
// events and frame ticks.

use crate::cartridge::CartridgeMetadata;
use crate::config::{ConfigError, FrontendConfig};
use crate::events::{self, Event, EventBus};
use crate::highscore::{
    Clock, FileStore, HighScoreCallback, KeyValueStore, NullHighScoreCallback, ScoreStore,
    SystemClock,
};
use crate::input::{ConsoleSwitchState, InputMapper, JoystickState, Player};
use crate::logger::{LogLevel, Logger};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Key that dumps the SRAM image to the log in debug mode
const DUMP_KEY: KeyCode = KeyCode::F8;

/// One emulator session's frontend state
///
/// Notifications the mapper and score store post while the session has them
/// borrowed are delivered after the borrow ends, so listeners registered on
/// [`Session::bus`] may query [`Session::input`] and [`Session::scores`].
pub struct Session<S: KeyValueStore + 'static> {
    config: FrontendConfig,
    bus: Rc<EventBus>,
    logger: Rc<Logger>,
    input: Rc<RefCell<InputMapper>>,
    scores: Rc<RefCell<ScoreStore<S>>>,
    null_callback: Rc<RefCell<NullHighScoreCallback>>,
    /// Set on cartridge load: storage usable, hand the runtime the real store
    storage_enabled: Rc<Cell<bool>>,
}

impl Session<FileStore> {
    /// Build a session from configuration with file-backed storage
    ///
    /// Reads the high score ROM named in the configuration and opens the
    /// log file, if one is set.
    pub fn from_config(
        config: FrontendConfig,
        cartridge: Rc<dyn CartridgeMetadata>,
    ) -> Result<Self, ConfigError> {
        let logger = Rc::new(Logger::new());
        logger.set_log_level(config.log_level());
        if let Some(path) = &config.log_file {
            logger.open_log_file(path)?;
        }

        let rom = config.high_score.load_rom()?;
        let storage = FileStore::new(&config.high_score.storage_path);

        Self::new(config, storage, rom, cartridge, Rc::new(SystemClock), logger)
    }
}

impl<S: KeyValueStore + 'static> Session<S> {
    /// Create a session and subscribe its components to the lifecycle events
    pub fn new(
        config: FrontendConfig,
        storage: S,
        rom: Vec<u8>,
        cartridge: Rc<dyn CartridgeMetadata>,
        clock: Rc<dyn Clock>,
        logger: Rc<Logger>,
    ) -> Result<Self, ConfigError> {
        let bus = Rc::new(EventBus::new());

        let player1 = config
            .input
            .player1
            .to_bindings()
            .map_err(ConfigError::Binding)?;
        let player2 = config
            .input
            .player2
            .to_bindings()
            .map_err(ConfigError::Binding)?;
        let console_keys = config
            .input
            .console
            .to_console_keys()
            .map_err(ConfigError::Binding)?;

        let input = Rc::new(RefCell::new(InputMapper::with_bindings(
            player1,
            player2,
            console_keys,
            cartridge,
            Rc::clone(&bus),
            Rc::clone(&logger),
        )));

        let scores = Rc::new(RefCell::new(ScoreStore::with_settings(
            storage,
            rom,
            config.high_score.settings(),
            clock,
            Rc::clone(&bus),
            Rc::clone(&logger),
        )));

        let session = Session {
            config,
            bus,
            logger,
            input,
            scores,
            null_callback: Rc::new(RefCell::new(NullHighScoreCallback)),
            storage_enabled: Rc::new(Cell::new(false)),
        };
        session.subscribe();

        Ok(session)
    }

    fn subscribe(&self) {
        let logger = Rc::clone(&self.logger);
        self.bus.add_listener(events::INIT, move |event| {
            if let Event::Init { debug: true } = event {
                logger.set_log_level(LogLevel::Debug);
            }
            logger.info("Keyboard input ready");
        });

        let scores = Rc::clone(&self.scores);
        self.bus.add_listener(events::INIT, move |event| {
            if let Event::Init { debug } = event {
                scores.borrow_mut().init(*debug);
            }
        });

        let scores = Rc::clone(&self.scores);
        self.bus.add_listener(events::POST_INIT, move |_| {
            let scores = scores.borrow();
            if scores.is_debug() {
                scores.log_dump();
            }
        });

        let input = Rc::clone(&self.input);
        self.bus.add_listener(events::CARTRIDGE_LOADED, move |_| {
            input.borrow_mut().on_cartridge_loaded();
        });

        let scores = Rc::clone(&self.scores);
        let storage_enabled = Rc::clone(&self.storage_enabled);
        let logger = Rc::clone(&self.logger);
        self.bus.add_listener(events::CARTRIDGE_LOADED, move |_| {
            let enabled = scores.borrow_mut().on_cartridge_loaded();
            storage_enabled.set(enabled);
            if !enabled {
                logger.warning("Storage unavailable; high scores will not be saved");
            }
        });
    }

    /// Run start-up: "init" then "postInit"
    pub fn init(&self) {
        self.bus.fire(&Event::Init {
            debug: self.config.debug,
        });
        self.bus.fire(&Event::PostInit);
    }

    /// The runtime loaded a cartridge
    pub fn cartridge_loaded(&self) {
        let _hold = self.bus.hold();
        self.bus.fire(&Event::CartridgeLoaded);
    }

    /// The runtime reset the console
    pub fn reset(&self) {
        let _hold = self.bus.hold();
        self.input.borrow_mut().reset();
    }

    /// Handle a key transition
    ///
    /// # Returns
    /// true if the key was consumed and the host should not act on it
    pub fn handle_key(&self, key: KeyCode, down: bool) -> bool {
        if down && key == DUMP_KEY && self.config.debug {
            self.scores.borrow().log_dump();
        }
        let _hold = self.bus.hold();
        let consumed = self.input.borrow_mut().handle_key(key, down);
        consumed
    }

    /// Handle a winit keyboard event
    pub fn handle_key_event(&self, physical_key: PhysicalKey, state: ElementState) -> bool {
        match physical_key {
            PhysicalKey::Code(key) => self.handle_key(key, state.is_pressed()),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    /// Per-frame tick: run the debounced save when it is due
    pub fn poll(&self) -> bool {
        let _hold = self.bus.hold();
        let fired = self.scores.borrow_mut().poll();
        fired
    }

    /// Save outstanding high score writes now (exit, cartridge eject)
    pub fn flush(&self) -> bool {
        let _hold = self.bus.hold();
        let saved = self.scores.borrow_mut().flush();
        saved
    }

    /// Callback the runtime should use for the high score cartridge
    ///
    /// The real store when storage was usable at the last cartridge load,
    /// otherwise the null callback.
    pub fn high_score_callback(&self) -> Rc<RefCell<dyn HighScoreCallback>> {
        if self.storage_enabled.get() {
            return self.scores.clone();
        }
        self.null_callback.clone()
    }

    /// Resolved joystick state for a player
    pub fn joystick_state(&self, player: Player) -> JoystickState {
        self.input.borrow().joystick_state(player)
    }

    /// Console switch positions
    pub fn console_state(&self) -> ConsoleSwitchState {
        self.input.borrow().console_state()
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn logger(&self) -> &Rc<Logger> {
        &self.logger
    }

    pub fn input(&self) -> &Rc<RefCell<InputMapper>> {
        &self.input
    }

    pub fn scores(&self) -> &Rc<RefCell<ScoreStore<S>>> {
        &self.scores
    }
}
