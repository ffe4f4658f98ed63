use std::cell::Cell;
use std::rc::Rc;

use super::*;

#[test]
fn clamp_delay_bounds_negative_and_huge_values() {
    assert_eq!(clamp_delay(-5), 0);
    assert_eq!(clamp_delay(0), 0);
    assert_eq!(clamp_delay(3_600_000), 3_600_000);
    assert_eq!(clamp_delay(i64::MAX), 2_147_483_647);
}

#[test]
fn system_clock_is_after_2020() {
    assert!(SystemClock.now_ms() > 1_577_836_800_000);
}

#[test]
fn timeout_scheduler_never_fires_outside_browser() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let task = TimeoutScheduler.schedule(0, Box::new(move || flag.set(true)));
    task.cancel();
    assert!(!fired.get());
}

#[test]
fn scheduled_task_runs_cancel_hook_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let task = ScheduledTask::new(move || counter.set(counter.get() + 1));
    task.cancel();
    assert_eq!(calls.get(), 1);

    let counter = calls.clone();
    drop(ScheduledTask::new(move || counter.set(counter.get() + 1)));
    assert_eq!(calls.get(), 2);
}

// =============================================================
// ManualTimers
// =============================================================

#[test]
fn manual_timers_fire_only_when_due() {
    let timers = ManualTimers::starting_at(1_000);
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let _task = timers.schedule(50, Box::new(move || flag.set(true)));

    timers.advance(49);
    assert!(!fired.get());
    assert_eq!(timers.now_ms(), 1_049);

    timers.advance(1);
    assert!(fired.get());
    assert_eq!(timers.pending(), 0);
}

#[test]
fn manual_timers_dropped_task_never_fires() {
    let timers = ManualTimers::starting_at(0);
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let task = timers.schedule(10, Box::new(move || flag.set(true)));
    drop(task);

    timers.advance(100);
    assert!(!fired.get());
    assert_eq!(timers.pending(), 0);
}

#[test]
fn manual_timers_clock_reads_deadline_inside_task() {
    let timers = ManualTimers::starting_at(0);
    let seen = Rc::new(Cell::new(-1));
    let seen_in = seen.clone();
    let clock = timers.clone();
    let _task = timers.schedule(30, Box::new(move || seen_in.set(clock.now_ms())));

    timers.advance(100);
    assert_eq!(seen.get(), 30);
    assert_eq!(timers.now_ms(), 100);
}

#[test]
fn manual_timers_clamp_long_delays_like_browser() {
    let timers = ManualTimers::starting_at(0);
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let _task = timers.schedule(i64::MAX, Box::new(move || flag.set(true)));

    timers.advance(MAX_TIMEOUT_MS - 1);
    assert!(!fired.get());
    timers.advance(1);
    assert!(fired.get());
}
