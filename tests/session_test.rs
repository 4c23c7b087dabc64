// End-to-end tests for a frontend session
// These drive a session the way the emulator runtime does: lifecycle events,
// keyboard input, high score writes and frame ticks.

use a7800_frontend::events::{LEFT_DIFF_CHANGED, RIGHT_DIFF_CHANGED, SHOW_ERROR};
use a7800_frontend::highscore::{sram, SRAM_SIZE, STORAGE_KEY};
use a7800_frontend::*;
use std::cell::RefCell;
use std::rc::Rc;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

struct Harness {
    session: Session<MemoryStore>,
    clock: Rc<ManualClock>,
    cartridge: Rc<CartridgeSwitches>,
    events: Rc<RefCell<Vec<Event>>>,
}

fn harness(storage: MemoryStore) -> Harness {
    let clock = Rc::new(ManualClock::new());
    let cartridge = Rc::new(CartridgeSwitches::default());

    let clock_dyn: Rc<dyn Clock> = clock.clone();
    let cartridge_dyn: Rc<dyn CartridgeMetadata> = cartridge.clone();
    let session = Session::new(
        FrontendConfig::default(),
        storage,
        vec![0xA9, 0x00, 0x60],
        cartridge_dyn,
        clock_dyn,
        Rc::new(Logger::silent()),
    )
    .expect("default config is valid");

    let events = Rc::new(RefCell::new(Vec::new()));
    for name in [LEFT_DIFF_CHANGED, RIGHT_DIFF_CHANGED, SHOW_ERROR] {
        let events = Rc::clone(&events);
        session
            .bus()
            .add_listener(name, move |event| events.borrow_mut().push(event.clone()));
    }

    session.init();
    Harness {
        session,
        clock,
        cartridge,
        events,
    }
}

fn press(session: &Session<MemoryStore>, key: KeyCode) -> bool {
    session.handle_key_event(PhysicalKey::Code(key), ElementState::Pressed)
}

fn release(session: &Session<MemoryStore>, key: KeyCode) -> bool {
    session.handle_key_event(PhysicalKey::Code(key), ElementState::Released)
}

#[test]
fn test_cartridge_load_applies_switch_defaults() {
    let h = harness(MemoryStore::new());
    h.cartridge.set(false, true);

    h.session.cartridge_loaded();

    let console = h.session.console_state();
    assert!(!console.left_diff_set);
    assert!(console.right_diff_set);
    assert_eq!(
        *h.events.borrow(),
        vec![Event::LeftDiffChanged(false), Event::RightDiffChanged(true)]
    );
}

#[test]
fn test_difficulty_toggle_event_and_query() {
    let h = harness(MemoryStore::new());

    assert!(press(&h.session, KeyCode::F6));
    assert!(h.events.borrow().is_empty());
    assert!(release(&h.session, KeyCode::F6));

    assert_eq!(*h.events.borrow(), vec![Event::RightDiffChanged(true)]);
    assert!(h.session.console_state().right_diff_set);
}

#[test]
fn test_tie_break_through_session() {
    let h = harness(MemoryStore::new());

    press(&h.session, KeyCode::ArrowLeft);
    press(&h.session, KeyCode::ArrowRight);
    let state = h.session.joystick_state(Player::One);
    assert!(state.right);
    assert!(!state.left);

    release(&h.session, KeyCode::ArrowRight);
    assert!(h.session.joystick_state(Player::One).left);
}

#[test]
fn test_reset_keeps_held_keys() {
    let h = harness(MemoryStore::new());
    press(&h.session, KeyCode::KeyI);
    press(&h.session, KeyCode::KeyN);

    h.session.reset();

    let state = h.session.joystick_state(Player::Two);
    assert!(state.up);
    assert!(state.button1);
}

#[test]
fn test_unmapped_keys_pass_through() {
    let h = harness(MemoryStore::new());
    assert!(!press(&h.session, KeyCode::KeyQ));
    assert!(!release(&h.session, KeyCode::Tab));
    assert!(press(&h.session, KeyCode::F1));
}

#[test]
fn test_high_score_write_cycle() {
    let h = harness(MemoryStore::new());
    h.session.cartridge_loaded();

    let callback = h.session.high_score_callback();
    let loaded = callback.borrow_mut().load_sram().expect("storage readable");
    assert_eq!(loaded, sram::default_sram().to_vec());

    // Burst of score writes
    for (i, value) in [0x10u8, 0x20, 0x30, 0x40].iter().enumerate() {
        callback.borrow_mut().write(0x1400 + i as u16, *value);
        h.clock.advance_ms(100);
    }
    // Out of range write is ignored
    callback.borrow_mut().write(0x2000, 0xFF);

    h.clock.advance_ms(1599);
    assert!(!h.session.poll());
    assert_eq!(h.session.scores().borrow().storage().write_count(), 0);

    h.clock.advance_ms(1);
    assert!(h.session.poll());

    let scores = h.session.scores().borrow();
    assert_eq!(scores.storage().write_count(), 1);
    let saved = scores.storage().get(STORAGE_KEY).expect("saved");
    let mut restored = [0u8; SRAM_SIZE];
    sram::decode_into(saved, &mut restored).unwrap();
    assert_eq!(&restored[0x400..0x404], &[0x10, 0x20, 0x30, 0x40]);
}

#[test]
fn test_cartridge_swap_flushes_pending_writes() {
    let h = harness(MemoryStore::new());
    h.session.cartridge_loaded();

    h.session.high_score_callback().borrow_mut().write(0x1300, 0x77);
    h.clock.advance_ms(500);
    h.session.cartridge_loaded();

    assert_eq!(h.session.scores().borrow().storage().write_count(), 1);
    assert!(!h.session.scores().borrow().timer().is_armed());

    h.clock.advance_ms(5000);
    assert!(!h.session.poll());
    assert_eq!(h.session.scores().borrow().storage().write_count(), 1);
}

#[test]
fn test_saved_scores_survive_new_session() {
    let first = harness(MemoryStore::new());
    first.session.cartridge_loaded();
    first
        .session
        .high_score_callback()
        .borrow_mut()
        .write(0x1500, 0x99);
    first.session.flush();

    let storage = first.session.scores().borrow().storage().clone();
    let second = harness(storage);
    second.session.cartridge_loaded();

    let loaded = second
        .session
        .high_score_callback()
        .borrow_mut()
        .load_sram()
        .unwrap();
    assert_eq!(loaded[0x500], 0x99);
}

#[test]
fn test_load_failure_reports_error() {
    let mut storage = MemoryStore::new();
    storage.set_fail_reads(true);
    let h = harness(storage);
    h.session.cartridge_loaded();

    let loaded = h.session.high_score_callback().borrow_mut().load_sram();
    assert!(loaded.is_none());

    let errors: Vec<_> = h
        .events
        .borrow()
        .iter()
        .filter(|event| matches!(event, Event::ShowError(_)))
        .cloned()
        .collect();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_unavailable_storage_disables_high_scores() {
    let h = harness(MemoryStore::unavailable());
    h.session.cartridge_loaded();

    let callback = h.session.high_score_callback();
    assert!(callback.borrow().rom().is_none());
    callback.borrow_mut().write(0x1400, 1);
    assert_eq!(h.session.scores().borrow().pending_writes(), 0);
}
