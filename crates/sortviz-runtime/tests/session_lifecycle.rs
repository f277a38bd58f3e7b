//! Session lifecycle on real threads and real (short) waits.
//!
//! These tests use [`ThreadPacer`], so the driver actually blocks on the
//! gate. Drivers loop on cheap primitives until cancelled; each test bounds
//! its waiting with generous timeouts.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use sortviz_runtime::{
    Engine, FnDriver, RunOutcome, RunPhase, Session, SessionConfig, SessionError, StepResult,
    ThreadPacer,
};
use web_time::{Duration, Instant};

fn session() -> Session {
    Session::new(SessionConfig {
        size: 8,
        seed: Some(5),
        speed: 1.0,
        ..SessionConfig::default()
    })
    .unwrap()
    .with_pacer(ThreadPacer)
}

/// Highlights pairs forever, counting steps.
fn endless(steps: Arc<AtomicUsize>) -> impl sortviz_runtime::Driver + 'static {
    FnDriver::new("endless", move |engine: &Engine| -> StepResult<()> {
        loop {
            engine.highlight(&[0, 1])?;
            steps.fetch_add(1, Ordering::SeqCst);
        }
    })
}

fn wait_until(mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn pause_then_cancel_terminates_in_idle() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    s.start(endless(Arc::clone(&steps))).unwrap();
    wait_until(|| steps.load(Ordering::SeqCst) > 0);

    assert!(s.pause());
    assert_eq!(s.phase(), RunPhase::Paused);

    let outcome = s.cancel();
    assert_eq!(outcome, Some(RunOutcome::Cancelled));
    assert_eq!(s.phase(), RunPhase::Idle);
    assert!(!s.has_worker());
}

#[test]
fn paused_run_makes_no_progress() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    s.start(endless(Arc::clone(&steps))).unwrap();
    wait_until(|| steps.load(Ordering::SeqCst) > 0);

    s.pause();
    // Let any step that was already in flight finish.
    thread::sleep(Duration::from_millis(400));
    let frozen = steps.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(400));
    assert_eq!(steps.load(Ordering::SeqCst), frozen);

    s.resume();
    wait_until(|| steps.load(Ordering::SeqCst) > frozen);
    assert_eq!(s.cancel(), Some(RunOutcome::Cancelled));
}

#[test]
fn cancel_interrupts_a_long_wait() {
    let mut s = session();
    s.set_speed(0.01);
    let slow = FnDriver::new("slow", |engine: &Engine| engine.sleep(60_000));
    s.start(slow).unwrap();
    thread::sleep(Duration::from_millis(20));

    let started = Instant::now();
    assert_eq!(s.cancel(), Some(RunOutcome::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn second_start_is_busy() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    s.start(endless(Arc::clone(&steps))).unwrap();
    let again = s.start(endless(steps));
    assert!(matches!(again, Err(SessionError::Busy)));
    s.cancel();
}

#[test]
fn toggle_walks_the_phases() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    assert_eq!(s.toggle(endless(Arc::clone(&steps))).unwrap(), RunPhase::Running);
    assert_eq!(s.toggle(endless(Arc::clone(&steps))).unwrap(), RunPhase::Paused);
    assert_eq!(s.toggle(endless(Arc::clone(&steps))).unwrap(), RunPhase::Running);
    assert_eq!(s.cancel(), Some(RunOutcome::Cancelled));
    assert_eq!(s.phase(), RunPhase::Idle);
}

#[test]
fn reset_cancels_and_regenerates() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    s.start(endless(Arc::clone(&steps))).unwrap();
    wait_until(|| steps.load(Ordering::SeqCst) > 0);

    s.reset();
    assert_eq!(s.phase(), RunPhase::Idle);
    assert!(!s.has_worker());
    let snapshot = s.snapshot();
    assert_eq!(snapshot.values.len(), 8);
    assert!(snapshot.states.iter().all(|st| !st.comparing));
}

#[test]
fn resize_during_run_keeps_comparisons() {
    let mut s = session();
    let steps = Arc::new(AtomicUsize::new(0));
    s.start(endless(Arc::clone(&steps))).unwrap();
    wait_until(|| steps.load(Ordering::SeqCst) > 0);

    s.pause();
    thread::sleep(Duration::from_millis(400));
    let before = s.snapshot();
    s.resize(sortviz_core::Viewport::new(300.0, 3000.0));
    let after = s.snapshot();
    assert_eq!(before.states, after.states);
    assert_ne!(before.layout, after.layout);
    s.cancel();
}

#[test]
fn session_drop_cancels_the_worker() {
    let steps = Arc::new(AtomicUsize::new(0));
    {
        let mut s = session();
        s.start(endless(Arc::clone(&steps))).unwrap();
        wait_until(|| steps.load(Ordering::SeqCst) > 0);
    }
    let after_drop = steps.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(400));
    assert_eq!(steps.load(Ordering::SeqCst), after_drop);
}
