//! Dispatcher orchestration: call ordering, readiness handling, init
//! failure latching and cadence edge cases.

use crate::mock_hw::{DisplayCall, ManualClock, make_dispatcher, run};

use songbird::config::SystemConfig;
use songbird::control::brightness::Indicator;
use songbird::drivers::button::Button;
use songbird::error::{Error, InitError, Subsystem};
use songbird::fsm::StateId;

/// Every task on the main cadence, no debounce delay.
fn lockstep_config() -> SystemConfig {
    SystemConfig {
        main_tick_ms: 20,
        button_scan_ms: 20,
        led_update_ms: 20,
        display_update_ms: 20,
        diagnostics_interval_ms: 20,
        debounce_ms: 0,
        ..SystemConfig::default()
    }
}

// ── Ordering ──────────────────────────────────────────────────

#[test]
fn one_cycle_runs_jobs_in_order() {
    let (mut d, trace) = make_dispatcher(lockstep_config());
    d.ports_mut().buttons.press(Button::Up);
    d.start(0).unwrap();
    assert_eq!(*trace.borrow(), ["mute:true", "message"]);
    trace.borrow_mut().clear();

    assert!(d.poll(20));
    // The mute from the edge lands before levels, LEDs and display.
    assert_eq!(
        *trace.borrow(),
        ["scan", "mute:false", "level", "led", "render", "diag"]
    );
    assert_eq!(d.state(), StateId::Active);
}

#[test]
fn sub_tasks_wait_for_main_dispatch() {
    let config = SystemConfig {
        main_tick_ms: 30,
        button_scan_ms: 10,
        ..SystemConfig::default()
    };
    let (mut d, _) = make_dispatcher(config);
    d.start(0).unwrap();
    run(&mut d, 1, 300);
    // Scan is due every 10 ms but only considered every 30 ms.
    assert_eq!(d.ports().buttons.scans, 10);
    assert_eq!(d.cycles(), 10);
}

#[test]
fn poll_is_noop_between_main_ticks() {
    let (mut d, trace) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    trace.borrow_mut().clear();
    for t in 1..20 {
        assert!(!d.poll(t));
    }
    assert!(trace.borrow().is_empty());
    assert!(d.poll(20));
}

// ── Display and diagnostics ───────────────────────────────────

#[test]
fn disconnected_shows_connect_prompt() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().audio.connected = false;
    d.start(0).unwrap();
    run(&mut d, 1, 100);
    assert_eq!(d.ports().display.last_message(), Some("Connect USB Audio"));
    assert_eq!(d.ports().display.renders(), 0);

    d.ports_mut().audio.connected = true;
    run(&mut d, 101, 200);
    assert_eq!(d.ports().display.renders(), 1);
}

#[test]
fn startup_shows_standby_status() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    assert_eq!(d.ports().display.last_message(), Some("Press UP to start"));
}

#[test]
fn diagnostics_report_on_interval() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    run(&mut d, 1, 9_999);
    assert!(d.ports().diagnostics.reports.is_empty());
    run(&mut d, 10_000, 10_000);

    let reports = &d.ports().diagnostics.reports;
    assert_eq!(reports.len(), 1);
    let line = &reports[0];
    assert!(line.starts_with("DIAG | up=10.0s cycles=500 |"), "{line}");
    assert!(line.contains("state=Standby usb=yes 48k"), "{line}");
    assert!(line.contains("not_ready=0b0000"), "{line}");
}

// ── Readiness ─────────────────────────────────────────────────

#[test]
fn audio_not_ready_skips_level_update_then_recovers() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().audio.ready = false;
    d.start(0).unwrap();

    run(&mut d, 1, 300);
    assert_eq!(d.ports().audio.level_passes, 0);
    assert_eq!(d.health().not_ready_mask(), Subsystem::Audio.mask());
    assert_eq!(d.health().skipped_updates(), 3);
    assert!(!d.is_error_mode());

    d.ports_mut().audio.ready = true;
    run(&mut d, 301, 400);
    assert_eq!(d.ports().audio.level_passes, 1);
    assert_eq!(d.health().not_ready_mask(), 0);
    assert_eq!(d.health().sticky_mask(), Subsystem::Audio.mask());
}

#[test]
fn display_not_ready_skips_render() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().display.ready = false;
    d.start(0).unwrap();
    run(&mut d, 1, 500);
    assert_eq!(d.ports().display.renders(), 0);
    assert!(!d.health().is_ready(Subsystem::Display));
    // Levels keep flowing.
    assert_eq!(d.ports().audio.level_passes, 5);
}

#[test]
fn indicators_not_ready_skips_led_writes() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().indicators.ready = false;
    d.start(0).unwrap();
    run(&mut d, 1, 500);
    assert!(d.ports().indicators.writes.is_empty());
    assert!(!d.health().is_ready(Subsystem::Indicators));
}

#[test]
fn led_write_failure_recovers_next_update() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.start(0).unwrap();
    run(&mut d, 1, 2_000);
    let before = d.ports().indicators.writes.len();

    // Both writes of the 2100 ms update are rejected.
    d.ports_mut().indicators.fail_writes = 2;
    run(&mut d, 2_001, 2_100);
    assert_eq!(d.ports().indicators.writes.len(), before);
    assert_eq!(d.health().not_ready_mask(), Subsystem::Indicators.mask());

    run(&mut d, 2_101, 2_200);
    assert_eq!(d.ports().indicators.writes.len(), before + 2);
    assert_eq!(d.health().not_ready_mask(), 0);
    assert_eq!(d.health().sticky_mask(), Subsystem::Indicators.mask());
    assert!(!d.is_error_mode());
}

#[test]
fn unreadable_button_defers_commit() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().buttons.press(Button::Up);
    d.start(0).unwrap();
    // The 60 ms scan sees the press; the debounce window runs to 110 ms.
    run(&mut d, 1, 60);

    // Scans at 120 and 180 cannot read the pin, so nothing commits.
    d.ports_mut().buttons.unreadable[Button::Up as usize] = true;
    run(&mut d, 61, 200);
    assert_eq!(d.state(), StateId::Standby);
    assert_eq!(d.health().not_ready_mask(), Subsystem::Buttons.mask());

    d.ports_mut().buttons.unreadable[Button::Up as usize] = false;
    run(&mut d, 201, 240);
    assert_eq!(d.state(), StateId::Active);
    assert_eq!(d.health().not_ready_mask(), 0);
}

#[test]
fn unreadable_button_flags_buttons() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().buttons.unreadable[Button::Down as usize] = true;
    d.start(0).unwrap();
    run(&mut d, 1, 100);
    assert_eq!(d.health().not_ready_mask(), Subsystem::Buttons.mask());
    assert_eq!(d.state(), StateId::Standby);
}

// ── Init failure ──────────────────────────────────────────────

#[test]
fn init_failure_latches_error_mode() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    let failure = InitError::new(Subsystem::Audio, "codec timeout");
    d.ports_mut().audio.init_result = Err(failure);

    assert_eq!(d.start(0), Err(Error::Init(failure)));
    assert!(d.is_error_mode());
    assert_eq!(d.ports().audio.mute_calls, vec![true]);
    assert_eq!(d.ports().indicators.last(Indicator::Led1), Some(255));
    assert_eq!(d.ports().indicators.last(Indicator::Led2), Some(0));

    // Presses are ignored for good.
    d.ports_mut().buttons.press(Button::Up);
    run(&mut d, 1, 400);
    assert_eq!(d.ports().indicators.last(Indicator::Led1), Some(255));
    run(&mut d, 401, 500);
    assert_eq!(d.ports().indicators.last(Indicator::Led1), Some(0));
    assert_eq!(d.ports().indicators.last(Indicator::Led2), Some(255));

    run(&mut d, 501, 10_000);
    assert_eq!(d.state(), StateId::Standby);
    assert_eq!(d.ports().buttons.scans, 0);
    assert_eq!(d.ports().audio.level_passes, 0);
    assert_eq!(d.ports().audio.mute_calls, vec![true]);
    assert!(d.ports().diagnostics.reports.is_empty());

    // Announced at start, 5 s and 10 s.
    assert_eq!(d.ports().display.errors(), 3);
    assert!(d.ports().display.calls.iter().any(|c| matches!(
        c,
        DisplayCall::Error(text) if text == "INIT FAIL: audio"
    )));
}

#[test]
fn first_init_failure_wins() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    let display_err = InitError::new(Subsystem::Display, "no ack");
    let audio_err = InitError::new(Subsystem::Audio, "no codec");
    d.ports_mut().display.init_result = Err(display_err);
    d.ports_mut().audio.init_result = Err(audio_err);

    // Audio initialises before the display.
    assert_eq!(d.start(0), Err(Error::Init(audio_err)));
    assert_eq!(d.health().init_failure(), Some(audio_err));
}

// ── Brightness ────────────────────────────────────────────────

#[test]
fn muted_mode_darkens_output_indicator() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().audio.set_all_levels(0.5);
    d.ports_mut().buttons.press(Button::Up);
    d.start(0).unwrap();
    run(&mut d, 1, 199);
    d.ports_mut().buttons.release(Button::Up);
    run(&mut d, 200, 4_000);
    assert_eq!(d.state(), StateId::Active);
    assert!(d.ports().indicators.last(Indicator::Led1).unwrap_or(0) > 100);
    assert!(d.ports().indicators.last(Indicator::Led2).unwrap_or(0) > 100);

    d.ports_mut().buttons.press(Button::Down);
    run(&mut d, 4_001, 4_199);
    d.ports_mut().buttons.release(Button::Down);
    run(&mut d, 4_200, 9_000);
    assert_eq!(d.state(), StateId::Muted);
    assert!(d.ports().indicators.last(Indicator::Led1).unwrap_or(0) > 100);
    assert_eq!(d.ports().indicators.last(Indicator::Led2), Some(0));
}

#[test]
fn standby_keeps_indicators_dark() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    d.ports_mut().audio.set_all_levels(0.9);
    d.start(0).unwrap();
    run(&mut d, 1, 2_000);
    assert_eq!(d.ports().indicators.last(Indicator::Led1), Some(0));
    assert_eq!(d.ports().indicators.last(Indicator::Led2), Some(0));
    assert_eq!(d.duty(Indicator::Led1), 0);
}

// ── Time ──────────────────────────────────────────────────────

#[test]
fn cadence_survives_clock_wrap() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    let start = u32::MAX - 30;
    d.start(start).unwrap();
    let fired = (1..=100u32)
        .filter(|&dt| d.poll(start.wrapping_add(dt)))
        .count();
    assert_eq!(fired, 5);
}

#[test]
fn poll_clock_reads_the_clock() {
    let (mut d, _) = make_dispatcher(SystemConfig::default());
    let clock = ManualClock::at(1_000);
    d.start(1_000).unwrap();
    clock.advance(19);
    assert!(!d.poll_clock(&clock));
    clock.advance(1);
    assert!(d.poll_clock(&clock));
    assert_eq!(d.cycles(), 1);
}
