// Event bus - named publish/subscribe between frontend components
//
// Components never call each other directly. They subscribe to lifecycle
// events ("init", "postInit", "onCartridgeLoaded") and publish change
// notifications for anything else that wants to observe them (on-screen
// switch indicators, error dialogs, the video layer).

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Lifecycle: the frontend is starting up
pub const INIT: &str = "init";
/// Lifecycle: every "init" listener has run
pub const POST_INIT: &str = "postInit";
/// A cartridge has been loaded into the runtime
pub const CARTRIDGE_LOADED: &str = "onCartridgeLoaded";
/// Left difficulty switch changed
pub const LEFT_DIFF_CHANGED: &str = "onLeftDiffChanged";
/// Right difficulty switch changed
pub const RIGHT_DIFF_CHANGED: &str = "onRightDiffChanged";
/// A recoverable error should be shown to the user
pub const SHOW_ERROR: &str = "showError";
/// The user asked for full screen display
pub const FULL_SCREEN: &str = "fullScreen";

/// Event payloads carried on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Frontend start-up
    Init {
        /// Enables verbose diagnostics in the listeners
        debug: bool,
    },
    /// Start-up finished
    PostInit,
    /// A cartridge has been loaded
    CartridgeLoaded,
    /// New left difficulty switch position
    LeftDiffChanged(bool),
    /// New right difficulty switch position
    RightDiffChanged(bool),
    /// Human-readable error message
    ShowError(String),
    /// Full screen request
    FullScreen,
}

impl Event {
    /// Name the event is published under
    pub fn name(&self) -> &'static str {
        match self {
            Event::Init { .. } => INIT,
            Event::PostInit => POST_INIT,
            Event::CartridgeLoaded => CARTRIDGE_LOADED,
            Event::LeftDiffChanged(_) => LEFT_DIFF_CHANGED,
            Event::RightDiffChanged(_) => RIGHT_DIFF_CHANGED,
            Event::ShowError(_) => SHOW_ERROR,
            Event::FullScreen => FULL_SCREEN,
        }
    }
}

/// Subscriber callback
///
/// Listeners hold their own state behind interior mutability so that a
/// listener may publish further events while it is being dispatched.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Registry of named subscriptions
///
/// Delivery is ordered by registration within a single event name. No
/// ordering is defined across different names.
///
/// Components publish their notifications with [`EventBus::post`]. While the
/// bus is held (see [`EventBus::hold`]) posted events are queued and
/// delivered in order when the last hold is released, so an owner can keep a
/// component borrowed while it runs and let listeners query it afterwards.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<&'static str, Vec<Listener>>>,
    holds: Cell<usize>,
    queued: RefCell<VecDeque<Event>>,
}

/// Guard returned by [`EventBus::hold`]; releases the hold on drop
#[must_use = "posted events are delivered when the hold is dropped"]
pub struct EventHold<'a> {
    bus: &'a EventBus,
}

impl Drop for EventHold<'_> {
    fn drop(&mut self) {
        self.bus.release();
    }
}

impl EventBus {
    /// Create an empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event name
    pub fn add_listener<F>(&self, name: &'static str, listener: F)
    where
        F: Fn(&Event) + 'static,
    {
        self.listeners
            .borrow_mut()
            .entry(name)
            .or_default()
            .push(Rc::new(listener));
    }

    /// Deliver an event to every listener registered under its name
    ///
    /// The listener list is snapshotted before delivery, so listeners added
    /// during dispatch only see later events.
    pub fn fire(&self, event: &Event) {
        let targets: Vec<Listener> = self
            .listeners
            .borrow()
            .get(event.name())
            .cloned()
            .unwrap_or_default();

        for listener in targets {
            listener(event);
        }
    }

    /// Publish a notification
    ///
    /// Delivered immediately unless the bus is held, in which case it waits
    /// for the last hold to be released.
    pub fn post(&self, event: Event) {
        if self.holds.get() > 0 {
            self.queued.borrow_mut().push_back(event);
        } else {
            self.fire(&event);
        }
    }

    /// Defer posted events until the returned guard is dropped
    pub fn hold(&self) -> EventHold<'_> {
        self.holds.set(self.holds.get() + 1);
        EventHold { bus: self }
    }

    /// Whether posted events are currently being queued
    pub fn is_held(&self) -> bool {
        self.holds.get() > 0
    }

    fn release(&self) {
        let holds = self.holds.get().saturating_sub(1);
        self.holds.set(holds);
        if holds > 0 {
            return;
        }

        loop {
            let next = self.queued.borrow_mut().pop_front();
            match next {
                Some(event) => self.fire(&event),
                None => break,
            }
        }
    }

    /// Number of listeners registered for a name
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().get(name).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut names: Vec<_> = listeners.keys().collect();
        names.sort();
        f.debug_struct("EventBus")
            .field("names", &names)
            .field("holds", &self.holds.get())
            .field("queued", &self.queued.borrow().len())
            .finish()
    }
}
