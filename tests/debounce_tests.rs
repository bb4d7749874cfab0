//! Integration tests for Debouncer

mod common;
use common::*;

use button_toggle::{
    Debouncer, DigitalInput, LineIndex, RELEASE_POLL_MS, SETTLE_MS, TickCounter, TickTimebase,
    Timebase,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn no_press_returns_immediately() {
    let clock = SimClock::new();
    let buttons = core::array::from_fn(|_| ScriptedButton::idle(&clock));
    let mut debouncer = Debouncer::<_, _, 4>::new(buttons, SimTimebase::new(&clock));

    assert_eq!(debouncer.read_button(), None);
    assert_eq!(clock.now(), 0);
    assert_eq!(debouncer.timebase().sleep_count(), 0);
}

#[test]
fn every_button_is_read_once_when_idle() {
    let clock = SimClock::new();
    let buttons: [ScriptedButton; 4] = core::array::from_fn(|_| ScriptedButton::idle(&clock));
    let mut debouncer = Debouncer::new(buttons, SimTimebase::new(&clock));

    debouncer.read_button();

    let (buttons, _) = debouncer.release();
    assert!(buttons.iter().all(|button| button.reads() == 1));
}

#[test]
fn glitch_shorter_than_settle_is_rejected() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [ScriptedButton::pressed_between(&clock, 0, 15)],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), None);
    assert_eq!(clock.now(), SETTLE_MS);
    assert_eq!(debouncer.timebase().sleeps(), &[SETTLE_MS]);
}

#[test]
fn rejected_candidate_is_not_retried_on_other_lines() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [
            ScriptedButton::pressed_between(&clock, 0, 5),
            ScriptedButton::pressed_between(&clock, 0, 100),
        ],
        SimTimebase::new(&clock),
    );

    // Button 1 is held the whole time but only button 0 was the candidate
    assert_eq!(debouncer.read_button(), None);
    assert_eq!(clock.now(), SETTLE_MS);

    // The next call starts fresh and finds button 1
    assert_eq!(debouncer.read_button(), Some(LineIndex(1)));
    assert_eq!(clock.now(), 100);
}

#[test]
fn press_reported_after_release() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [ScriptedButton::pressed_between(&clock, 0, 25)],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
    assert_eq!(clock.now(), SETTLE_MS + RELEASE_POLL_MS);
    assert_eq!(debouncer.timebase().sleeps(), &[SETTLE_MS, RELEASE_POLL_MS]);
}

#[test]
fn elapsed_time_grows_with_release_polls() {
    for polls in 1..=6u32 {
        let clock = SimClock::new();
        let release_at = SETTLE_MS + polls * RELEASE_POLL_MS - 5;
        let mut debouncer = Debouncer::new(
            [ScriptedButton::pressed_between(&clock, 0, release_at)],
            SimTimebase::new(&clock),
        );

        assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
        assert_eq!(clock.now(), SETTLE_MS + polls * RELEASE_POLL_MS);
        assert_eq!(debouncer.timebase().sleep_count(), 1 + polls as usize);
    }
}

#[test]
fn release_exactly_at_settle_check_is_noise() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [ScriptedButton::pressed_between(&clock, 0, SETTLE_MS)],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), None);
}

#[test]
fn long_hold_blocks_until_release() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [ScriptedButton::pressed_between(&clock, 0, 5_000)],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
    assert_eq!(clock.now(), 5_000);

    let timebase = debouncer.timebase();
    assert_eq!(timebase.sleeps()[0], SETTLE_MS);
    assert!(timebase.sleeps()[1..].iter().all(|&ms| ms == RELEASE_POLL_MS));
}

#[test]
fn hold_reports_once() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [ScriptedButton::pressed_between(&clock, 0, 200)],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
    assert_eq!(debouncer.read_button(), None);
    assert_eq!(debouncer.read_button(), None);
}

#[test]
fn lowest_index_wins_simultaneous_press() {
    let clock = SimClock::new();
    let mut debouncer = Debouncer::new(
        [
            ScriptedButton::idle(&clock),
            ScriptedButton::pressed_between(&clock, 0, 40),
            ScriptedButton::pressed_between(&clock, 0, 80),
            ScriptedButton::pressed_between(&clock, 0, 40),
        ],
        SimTimebase::new(&clock),
    );

    assert_eq!(debouncer.read_button(), Some(LineIndex(1)));
    assert_eq!(clock.now(), 40);

    // Button 2 is still held, so it becomes the next candidate
    assert_eq!(debouncer.read_button(), Some(LineIndex(2)));
    assert_eq!(clock.now(), 80);
}

#[test]
fn repeated_presses_each_reported() {
    let clock = SimClock::new();
    let button = ScriptedButton::pressed_between(&clock, 0, 25).and_pressed_between(40, 65);
    let mut debouncer = Debouncer::new([button], SimTimebase::new(&clock));

    assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
    assert_eq!(clock.now(), 30);

    assert_eq!(debouncer.read_button(), None);
    clock.advance(10);

    assert_eq!(debouncer.read_button(), Some(LineIndex(0)));
    assert_eq!(clock.now(), 70);
}

// Active-low line released once the tick counter's uptime passes a deadline
struct UptimeButton<'t> {
    ticks: &'t TickCounter,
    release_at: u32,
}

impl DigitalInput for UptimeButton<'_> {
    fn is_high(&mut self) -> bool {
        self.ticks.uptime_ms() >= self.release_at
    }
}

// Lets the ticker run only while the debouncer sleeps, so reads never race it
struct GatedTimebase<'t> {
    inner: TickTimebase<'t>,
    sleeping: &'t AtomicBool,
}

impl Timebase for GatedTimebase<'_> {
    fn sleep_ms(&mut self, duration_ms: u32) {
        self.sleeping.store(true, Ordering::Release);
        self.inner.sleep_ms(duration_ms);
        self.sleeping.store(false, Ordering::Release);
    }
}

#[test]
fn debounces_against_tick_interrupt_timebase() {
    let ticks = TickCounter::new();
    let sleeping = AtomicBool::new(false);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                if sleeping.load(Ordering::Acquire) {
                    ticks.tick();
                }
                thread::yield_now();
            }
        });

        let button = UptimeButton {
            ticks: &ticks,
            release_at: 45,
        };
        let timebase = GatedTimebase {
            inner: TickTimebase::new(&ticks),
            sleeping: &sleeping,
        };
        let mut debouncer = Debouncer::new([button], timebase);

        let pressed = debouncer.read_button();
        let finished_at = ticks.uptime_ms();
        done.store(true, Ordering::Release);

        assert_eq!(pressed, Some(LineIndex(0)));
        assert!(finished_at >= 45);
    });
}
