//! Timing Discipline Tests
//!
//! Drives sessions and the state machine with injected time deltas and
//! checks the guarantees the visualizer relies on.
//!
//! # Test Coverage
//!
//! 1. **Scenarios**: box and wim walked tick by tick
//! 2. **Drift**: thousands of small ticks land exactly where one big one would
//! 3. **Pause**: any pause contributes zero session time
//! 4. **Zero-duration phases**: always crossed, always reported
//! 5. **Completion**: reached exactly at the target, never skipped
//! 6. **Restart / AdjustCycles**: reset and no-op guarantees

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use breathe_engine::catalog::{self, PhaseLabel};
use breathe_engine::session::{Advance, BoundaryCrossing, Session};
use breathe_engine::{CycleLimits, InputEvent, RunState, SessionMachine};

fn running(id: &str, cycles: u32) -> SessionMachine {
    let mut machine = SessionMachine::new(CycleLimits::default(), false);
    machine.start_immediately(catalog::lookup(id).unwrap(), Some(cycles), Instant::now());
    machine
}

fn position(machine: &SessionMachine) -> (usize, Duration, u32) {
    let s = machine.session().unwrap();
    (s.phase_index(), s.elapsed_in_phase(), s.completed_cycles())
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_box_scenario_four_ticks() {
    let mut machine = running("box", 1);
    let mut crossings = Vec::new();
    let dt = Duration::from_secs(4);

    machine.advance(dt, &mut crossings);
    assert_eq!(machine.session().unwrap().phase().label, PhaseLabel::HoldFull);
    assert_eq!(position(&machine), (1, Duration::ZERO, 0));

    machine.advance(dt, &mut crossings);
    assert_eq!(machine.session().unwrap().phase().label, PhaseLabel::Exhale);
    assert_eq!(position(&machine), (2, Duration::ZERO, 0));

    machine.advance(dt, &mut crossings);
    assert_eq!(machine.session().unwrap().phase().label, PhaseLabel::HoldEmpty);
    assert_eq!(position(&machine), (3, Duration::ZERO, 0));
    assert_eq!(machine.state(), RunState::Running);

    assert_eq!(machine.advance(dt, &mut crossings), Advance::Completed);
    assert_eq!(machine.state(), RunState::Completed);
    assert_eq!(machine.session().unwrap().completed_cycles(), 1);
    assert_eq!(crossings.len(), 4);
}

#[test]
fn test_wim_single_tick_crosses_two_boundaries() {
    let mut machine = running("wim", 30);
    let mut crossings = Vec::new();

    machine.advance(Duration::from_secs(2), &mut crossings);

    assert_eq!(
        crossings.iter().map(|c| (c.from, c.to)).collect::<Vec<_>>(),
        vec![
            (PhaseLabel::Inhale, PhaseLabel::HoldFull),
            (PhaseLabel::HoldFull, PhaseLabel::Exhale),
        ]
    );
    assert_eq!(machine.session().unwrap().phase().label, PhaseLabel::Exhale);
    assert_eq!(position(&machine), (2, Duration::ZERO, 0));
}

// ============================================================================
// Determinism and Drift
// ============================================================================

#[test]
fn test_thousand_ticks_no_drift() {
    let mut session = Session::new(catalog::lookup("box").unwrap(), 99, Instant::now());
    let mut crossings = Vec::new();

    for _ in 0..1000 {
        session.advance(Duration::from_millis(16), &mut crossings);
    }

    // 16000ms on a 16s cycle is exactly one cycle
    assert_eq!(session.active_time(), Duration::from_millis(16_000));
    assert_eq!(session.completed_cycles(), 1);
    assert_eq!(session.phase_index(), 0);
    assert_eq!(session.elapsed_in_phase(), Duration::ZERO);
    assert_eq!(crossings.len(), 4);
}

#[test]
fn test_tick_sizes_do_not_change_outcome() {
    let pattern = catalog::lookup("478").unwrap();
    let mut coarse = Session::new(pattern, 50, Instant::now());
    let mut fine = Session::new(pattern, 50, Instant::now());
    let mut coarse_crossings = Vec::new();
    let mut fine_crossings = Vec::new();

    for _ in 0..100 {
        coarse.advance(Duration::from_millis(370), &mut coarse_crossings);
    }
    for _ in 0..3700 {
        fine.advance(Duration::from_millis(10), &mut fine_crossings);
    }

    assert_eq!(coarse.phase_index(), fine.phase_index());
    assert_eq!(coarse.elapsed_in_phase(), fine.elapsed_in_phase());
    assert_eq!(coarse.completed_cycles(), fine.completed_cycles());
    assert_eq!(coarse_crossings, fine_crossings);
}

#[test]
fn test_replay_is_deterministic() {
    let deltas: Vec<Duration> = (0..500u64).map(|i| Duration::from_millis(5 + (i * 7) % 40)).collect();
    let run = || {
        let mut session = Session::new(catalog::lookup("sigh").unwrap(), 10, Instant::now());
        let mut crossings = Vec::new();
        for dt in &deltas {
            session.advance(*dt, &mut crossings);
        }
        (session.phase_index(), session.elapsed_in_phase(), crossings)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_cycle_durations_are_exact() {
    for technique in catalog::all() {
        let mut session = Session::new(technique, 2, Instant::now());
        let mut crossings = Vec::new();
        let outcome = session.advance(technique.cycle_duration(), &mut crossings);
        assert_eq!(outcome, Advance::Continuing, "{}", technique.id);
        assert_eq!(session.completed_cycles(), 1, "{}", technique.id);
        assert_eq!(session.elapsed_in_phase(), Duration::ZERO, "{}", technique.id);
        assert_eq!(crossings.len(), technique.phases.len(), "{}", technique.id);
    }
}

// ============================================================================
// Pause Equivalence
// ============================================================================

#[test]
fn test_pause_contributes_no_time() {
    let dt1 = Duration::from_millis(2_730);
    let dt2 = Duration::from_millis(3_400);

    let mut paused = running("box", 3);
    let mut crossings = Vec::new();
    paused.advance(dt1, &mut crossings);
    paused.apply(InputEvent::Pause, Instant::now());
    for _ in 0..10_000 {
        paused.advance(Duration::from_millis(50), &mut crossings);
    }
    paused.apply(InputEvent::Resume, Instant::now());
    paused.advance(dt2, &mut crossings);

    let mut straight = running("box", 3);
    let mut straight_crossings = Vec::new();
    straight.advance(dt1, &mut straight_crossings);
    straight.advance(dt2, &mut straight_crossings);

    assert_eq!(position(&paused), position(&straight));
    assert_eq!(crossings, straight_crossings);
    assert_eq!(
        paused.session().unwrap().active_time(),
        straight.session().unwrap().active_time()
    );
}

// ============================================================================
// Zero-Duration Phases
// ============================================================================

#[test]
fn test_zero_phases_always_reported() {
    let mut session = Session::new(catalog::lookup("resonance").unwrap(), 5, Instant::now());
    let mut crossings = Vec::new();

    // Land exactly on the end of the exhale: exhale->hold and hold->inhale in one tick
    session.advance(Duration::from_secs(10), &mut crossings);

    let labels: Vec<(PhaseLabel, PhaseLabel)> = crossings.iter().map(|c| (c.from, c.to)).collect();
    assert_eq!(
        labels,
        vec![
            (PhaseLabel::Inhale, PhaseLabel::HoldFull),
            (PhaseLabel::HoldFull, PhaseLabel::Exhale),
            (PhaseLabel::Exhale, PhaseLabel::HoldEmpty),
            (PhaseLabel::HoldEmpty, PhaseLabel::Inhale),
        ]
    );
    assert!(crossings[3].cycle_completed);
    assert_eq!(session.completed_cycles(), 1);
}

#[test]
fn test_zero_phase_never_holds_elapsed_time() {
    let mut session = Session::new(catalog::lookup("wim").unwrap(), 30, Instant::now());
    let mut crossings = Vec::new();
    for _ in 0..2000 {
        session.advance(Duration::from_millis(7), &mut crossings);
        assert!(!session.phase().is_instant(), "parked on a zero-duration phase");
    }
}

#[test]
fn test_zero_phase_final_cycle_completes() {
    let mut machine = running("wim", 2);
    let mut crossings = Vec::new();
    machine.advance(Duration::from_secs(8), &mut crossings);
    assert_eq!(machine.state(), RunState::Completed);
    assert_eq!(crossings.len(), 8);
    assert!(crossings.last().is_some_and(|c| c.session_completed));
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_completion_exact_with_clamped_ticks() {
    let mut machine = running("coherent", 3);
    let mut crossings: Vec<BoundaryCrossing> = Vec::new();
    let mut ticks = 0;

    while machine.state() == RunState::Running {
        machine.advance(Duration::from_millis(50), &mut crossings);
        ticks += 1;
        let s = machine.session().unwrap();
        assert!(s.completed_cycles() <= 3);
        if s.completed_cycles() < 3 {
            assert_eq!(machine.state(), RunState::Running);
        }
    }

    // 3 cycles of 12s in 50ms steps
    assert_eq!(ticks, 720);
    assert_eq!(machine.state(), RunState::Completed);
    assert_eq!(machine.session().unwrap().completed_cycles(), 3);
    assert_eq!(crossings.iter().filter(|c| c.session_completed).count(), 1);
}

#[test]
fn test_completion_not_before_target() {
    let mut machine = running("box", 2);
    let mut crossings = Vec::new();
    machine.advance(Duration::from_millis(31_999), &mut crossings);
    assert_eq!(machine.state(), RunState::Running);
    machine.advance(Duration::from_millis(1), &mut crossings);
    assert_eq!(machine.state(), RunState::Completed);
    assert_eq!(machine.session().unwrap().elapsed_in_phase(), Duration::ZERO);
}

// ============================================================================
// Restart and AdjustCycles
// ============================================================================

#[test]
fn test_restart_from_every_session_state() {
    for pause in [false, true] {
        let mut machine = running("recovery", 4);
        let mut crossings = Vec::new();
        machine.advance(Duration::from_millis(23_456), &mut crossings);
        if pause {
            machine.apply(InputEvent::Pause, Instant::now());
        }
        machine.apply(InputEvent::Restart, Instant::now());
        assert_eq!(machine.state(), RunState::Running);
        assert_eq!(position(&machine), (0, Duration::ZERO, 0));
    }

    let mut machine = running("energize", 1);
    let mut crossings = Vec::new();
    machine.advance(Duration::from_secs(5), &mut crossings);
    assert_eq!(machine.state(), RunState::Completed);
    machine.apply(InputEvent::Restart, Instant::now());
    assert_eq!(machine.state(), RunState::Running);
    assert_eq!(position(&machine), (0, Duration::ZERO, 0));
}

#[test]
fn test_adjust_cycles_only_in_menu() {
    let mut machine = SessionMachine::new(CycleLimits::default(), false);
    let before = machine.cycles_target();
    machine.apply(InputEvent::AdjustCycles(2), Instant::now());
    assert_eq!(machine.cycles_target(), before + 2);

    machine.apply(InputEvent::Select, Instant::now());
    for state_event in [None, Some(InputEvent::Pause)] {
        if let Some(event) = state_event {
            machine.apply(event, Instant::now());
        }
        machine.apply(InputEvent::AdjustCycles(5), Instant::now());
        assert_eq!(machine.cycles_target(), before + 2);
        assert_eq!(machine.session().unwrap().target_cycles(), before + 2);
    }

    machine.apply(InputEvent::ToggleGuide, Instant::now());
    machine.apply(InputEvent::Back, Instant::now());
    machine.apply(InputEvent::ToggleGuide, Instant::now());
    assert_eq!(machine.state(), RunState::Guide);
    machine.apply(InputEvent::AdjustCycles(5), Instant::now());
    assert_eq!(machine.cycles_target(), before + 2);
}
