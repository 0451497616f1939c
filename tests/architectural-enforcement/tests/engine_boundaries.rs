//! Integration Test: Engine Boundaries
//!
//! The engine is the headless core. It must not know about terminals or audio
//! devices, must measure time with a monotonic clock, and must not panic on
//! bad input in production paths.

use architectural_enforcement::{assert_none, find_in_production};

const FRONT_END_CRATES: &[&str] = &["ratatui", "crossterm", "rodio"];

#[test]
fn test_engine_has_no_front_end_imports() {
    let violations = find_in_production("engine/src", |_, code| {
        FRONT_END_CRATES
            .iter()
            .any(|krate| code.contains(&format!("{krate}::")))
    });
    assert_none("front-end import in engine", &violations);
}

#[test]
fn test_engine_uses_monotonic_time() {
    let violations = find_in_production("engine/src", |_, code| {
        code.contains("SystemTime") || code.contains("chrono::")
    });
    assert_none("wall-clock time in engine", &violations);
}

#[test]
fn test_engine_does_not_print() {
    let violations = find_in_production("engine/src", |_, code| {
        code.contains("println!") || code.contains("eprintln!")
    });
    assert_none("direct printing in engine", &violations);
}

#[test]
fn test_no_unwrap_in_production_code() {
    for dir in ["engine/src", "tui/src"] {
        let violations = find_in_production(dir, |_, code| {
            code.contains(".unwrap()") || code.contains(".expect(")
        });
        assert_none("unwrap/expect", &violations);
    }
}
