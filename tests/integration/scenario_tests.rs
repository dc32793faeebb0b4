//! End-to-end button scenarios through the full dispatcher.
//!
//! Default cadences: main 20 ms, scan 50 ms, debounce 50 ms.  With
//! `start(0)` and 1 ms polling the scan lands on 60, 120, 180, ... ms.

use crate::mock_hw::{make_dispatcher, run};

use songbird::config::SystemConfig;
use songbird::drivers::button::{Button, EdgeState};
use songbird::fsm::StateId;

#[test]
fn held_button_yields_one_press_at_first_stable_scan() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().buttons.press(Button::Up);
    d.start(0).unwrap();

    let mut transitions_at = Vec::new();
    let mut prev = d.state();
    for t in 1..=500 {
        if t == 200 {
            d.ports_mut().buttons.release(Button::Up);
        }
        d.poll(t);
        if d.state() != prev {
            transitions_at.push((t, d.state()));
            prev = d.state();
        }
    }

    // Raw change seen at 60, stable for 50 ms by the 120 scan.
    assert_eq!(transitions_at, vec![(120, StateId::Active)]);
    assert_eq!(d.ports().audio.mute_calls, vec![true, false]);
    assert_eq!(d.debouncer().channel(Button::Up).edge(), EdgeState::Idle);
}

#[test]
fn release_pulse_then_idle() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().buttons.press(Button::Up);
    d.start(0).unwrap();
    run(&mut d, 1, 199);
    d.ports_mut().buttons.release(Button::Up);

    // Release seen at 240, committed at 300, Idle again at 360.
    run(&mut d, 200, 299);
    assert_eq!(d.debouncer().channel(Button::Up).edge(), EdgeState::Pressed);
    run(&mut d, 300, 300);
    assert!(d.debouncer().was_released(Button::Up));
    run(&mut d, 301, 360);
    assert_eq!(d.debouncer().channel(Button::Up).edge(), EdgeState::Idle);
    assert!(!d.debouncer().was_released(Button::Up));
}

#[test]
fn full_mode_cycle_issues_four_entry_commands() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();

    let presses = [
        (1_000, Button::Up),
        (2_000, Button::Down),
        (3_000, Button::Down),
        (4_000, Button::Up),
    ];
    let mut visited = vec![d.state()];
    let mut t = 1;
    for (at, button) in presses {
        run(&mut d, t, at - 1);
        d.ports_mut().buttons.press(button);
        run(&mut d, at, at + 199);
        d.ports_mut().buttons.release(button);
        t = at + 200;
        visited.push(d.state());
    }
    run(&mut d, t, 5_000);

    assert_eq!(
        visited,
        vec![
            StateId::Standby,
            StateId::Active,
            StateId::Muted,
            StateId::Active,
            StateId::Standby
        ]
    );
    // Boot mute, then exactly the four entry commands.
    assert_eq!(d.ports().audio.mute_calls, vec![true, false, true, false, true]);
}

#[test]
fn bounce_restarts_the_window() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();

    // Contact chatter across three scans: 60 on, 120 off, 180 on.
    run(&mut d, 1, 59);
    d.ports_mut().buttons.press(Button::Up);
    run(&mut d, 60, 119);
    d.ports_mut().buttons.release(Button::Up);
    run(&mut d, 120, 179);
    d.ports_mut().buttons.press(Button::Up);
    run(&mut d, 180, 239);
    assert_eq!(d.state(), StateId::Standby, "never stable for 50 ms yet");

    // Stable since 180: committed at 240.
    run(&mut d, 240, 240);
    assert_eq!(d.state(), StateId::Active);
}

#[test]
fn reserved_buttons_do_nothing() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    d.ports_mut().buttons.press(Button::Left);
    d.ports_mut().buttons.press(Button::Right);
    run(&mut d, 1, 1_000);
    assert_eq!(d.state(), StateId::Standby);
    assert_eq!(d.ports().audio.mute_calls, vec![true]);
    assert!(d.debouncer().channel(Button::Left).is_pressed());
}

#[test]
fn simultaneous_presses_handled_in_scan_order() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    // Up then Down in the same scan: Standby → Active → Muted.
    d.ports_mut().buttons.press(Button::Up);
    d.ports_mut().buttons.press(Button::Down);
    run(&mut d, 1, 200);
    assert_eq!(d.state(), StateId::Muted);
    assert_eq!(d.previous_state(), StateId::Active);
    assert_eq!(d.ports().audio.mute_calls, vec![true, false, true]);
}
