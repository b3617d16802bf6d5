//! Per-countdown tick scheduling.
//!
//! Each countdown gets its own [`Scheduler::start`] call and, on success,
//! its own [`CountdownHandle`] owning a dedicated timer thread and stop
//! channel. Nothing is shared between countdowns except the wall clock, so
//! any number of them can run side by side with no coordination.
//!
//! Ticks poll the wall clock and recompute the display from scratch via
//! [`display_state`]; they are not deadline-aligned, and once the target
//! passes every further tick reproduces the same terminal state until the
//! handle is stopped or dropped.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::display::{display_state, DisplayState};
use crate::parser::parse_event_date;

/// Default tick period: one second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Starts countdowns from raw date text.
#[derive(Debug, Clone)]
pub struct Scheduler {
    period: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            period: TICK_PERIOD,
        }
    }

    /// Use a non-default tick period. The display still shows whole
    /// seconds; a shorter period only changes how often it is recomputed.
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    /// Start a countdown from raw date text.
    ///
    /// If the text parses, `on_tick` is invoked once synchronously on the
    /// calling thread, then repeatedly from a dedicated thread at the
    /// scheduler's period, until the returned handle is stopped or dropped.
    ///
    /// If the text does not parse, `on_invalid` is invoked exactly once
    /// with the fixed diagnostic message, `on_tick` is never invoked, and
    /// no thread is spawned (`None` is returned).
    pub fn start<T, I>(&self, raw_text: &str, mut on_tick: T, on_invalid: I) -> Option<CountdownHandle>
    where
        T: FnMut(&DisplayState) + Send + 'static,
        I: FnOnce(&str),
    {
        let now = Local::now().naive_local();
        let target = match parse_event_date(raw_text, now) {
            Ok(target) => target,
            Err(_) => {
                on_invalid(crate::display::INVALID_DATE_MESSAGE);
                return None;
            }
        };

        let raw_text = raw_text.to_string();
        on_tick(&display_state(now, target, &raw_text));

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let period = self.period;

        let thread = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    let now = Local::now().naive_local();
                    on_tick(&display_state(now, target, &raw_text));
                }
                // The handle dropped its sender: stop ticking.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Some(CountdownHandle {
            target,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

/// A running countdown. Stopping (or dropping) the handle tears down its
/// timer thread; there is no other lifecycle.
#[derive(Debug)]
pub struct CountdownHandle {
    target: NaiveDateTime,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    /// The resolved target instant this countdown counts down to.
    pub fn target(&self) -> NaiveDateTime {
        self.target
    }

    /// Stop ticking and wait for the timer thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the worker out of its timed wait, so
        // the join returns without waiting out the period.
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::INVALID_DATE_MESSAGE;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_invalid_text_calls_on_invalid_once_and_never_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let invalids = Arc::new(AtomicUsize::new(0));
        let message = Arc::new(Mutex::new(String::new()));

        let tick_count = Arc::clone(&ticks);
        let invalid_count = Arc::clone(&invalids);
        let captured = Arc::clone(&message);

        let handle = Scheduler::new().start(
            "banana 5",
            move |_state| {
                tick_count.fetch_add(1, Ordering::SeqCst);
            },
            move |msg| {
                invalid_count.fetch_add(1, Ordering::SeqCst);
                *captured.lock().unwrap() = msg.to_string();
            },
        );

        assert!(handle.is_none());
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert_eq!(invalids.load(Ordering::SeqCst), 1);
        assert_eq!(*message.lock().unwrap(), INVALID_DATE_MESSAGE);
    }

    #[test]
    fn test_valid_text_ticks_immediately_and_synchronously() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None::<DisplayState>));

        let tick_count = Arc::clone(&ticks);
        let last_state = Arc::clone(&last);

        // A long period so only the immediate tick can have fired by the
        // time we assert.
        let handle = Scheduler::with_period(Duration::from_secs(3600))
            .start(
                "December 25",
                move |state| {
                    tick_count.fetch_add(1, Ordering::SeqCst);
                    *last_state.lock().unwrap() = Some(state.clone());
                },
                |_msg| panic!("on_invalid must not be called for valid text"),
            )
            .expect("valid text starts a countdown");

        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        let state = last.lock().unwrap().clone().expect("first tick recorded");
        assert!(!state.expired);
        assert_eq!(state.label, "Counting down to December 25");

        handle.stop();
    }

    #[test]
    fn test_stop_joins_and_halts_ticking() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&ticks);

        let handle = Scheduler::with_period(Duration::from_millis(5))
            .start(
                "December 25",
                move |_state| {
                    tick_count.fetch_add(1, Ordering::SeqCst);
                },
                |_msg| {},
            )
            .expect("valid text starts a countdown");

        // Let a few periodic ticks happen, then stop.
        std::thread::sleep(Duration::from_millis(50));
        handle.stop();

        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop >= 1);
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_stop_wakes_a_waiting_worker_immediately() {
        // The worker is parked in an hour-long wait; stop must not sit out
        // the remainder of the period before joining.
        let handle = Scheduler::with_period(Duration::from_secs(3600))
            .start("December 25", |_state| {}, |_msg| {})
            .expect("valid text starts a countdown");

        let started = std::time::Instant::now();
        handle.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_independent_countdowns_do_not_interfere() {
        let scheduler = Scheduler::with_period(Duration::from_secs(3600));
        let a = scheduler
            .start("December 25", |_s| {}, |_m| {})
            .expect("valid");
        let b = scheduler
            .start("January 1 2099", |_s| {}, |_m| {})
            .expect("valid");

        assert_ne!(a.target(), b.target());
        a.stop();
        b.stop();
    }

    #[test]
    fn test_target_resolves_strictly_future_without_year() {
        let handle = Scheduler::with_period(Duration::from_secs(3600))
            .start("March 2", |_s| {}, |_m| {})
            .expect("valid");
        assert!(handle.target() > Local::now().naive_local());
        handle.stop();
    }
}
