//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code never blocks a thread with a sleep. The only
//! async sleep allowed is the frame pacing in the engine's scheduler loop;
//! everything else waits on channels or events.

use architectural_enforcement::{assert_none, find_in_production};

fn is_sleep(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

#[test]
fn test_no_thread_sleep_anywhere() {
    for dir in ["engine/src", "tui/src"] {
        let violations =
            find_in_production(dir, |_, code| code.contains("thread::sleep") || code.contains("sleep_ms"));
        assert_none("blocking sleep", &violations);
    }
}

#[test]
fn test_async_sleep_only_for_frame_pacing() {
    let violations = find_in_production("engine/src", |path, code| {
        is_sleep(code) && !(path.ends_with("scheduler.rs") && code.contains("frame_budget"))
    });
    assert_none("sleep outside frame pacing", &violations);

    let violations = find_in_production("tui/src", |_, code| is_sleep(code));
    assert_none("sleep in the terminal front end", &violations);
}
