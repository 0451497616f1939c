//! Architectural Enforcement Integration Tests
//!
//! Source-level checks on the workspace crates:
//! - No blocking sleeps, and async sleeps only for frame pacing
//! - The engine stays headless (no terminal or audio crates)
//! - Engine time comes from a monotonic clock, never wall time
//! - No panicking unwraps in production code
//!
//! Helpers here walk the production part of each source file, which is
//! everything above its `#[cfg(test)]` module.

use std::fs;
use std::path::{Path, PathBuf};

/// One offending source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root, two levels above this crate
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Production lines of a file as `(line number, code without comments)`
///
/// Stops at the first `#[cfg(test)]`.
pub fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            (idx + 1, code.to_string())
        })
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Production lines under `dir` for which `matches` holds
pub fn find_in_production<F>(dir: &str, matches: F) -> Vec<Violation>
where
    F: Fn(&Path, &str) -> bool,
{
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        for (line, code) in production_lines(&path) {
            if matches(&path, &code) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Panic with a readable report if there are violations
pub fn assert_none(what: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} {what} violation(s).", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_members() {
        let root = workspace_root();
        assert!(root.join("engine").join("Cargo.toml").exists());
        assert!(root.join("tui").join("Cargo.toml").exists());
    }

    #[test]
    fn test_production_lines_stop_at_tests() {
        let files = rust_files("engine/src");
        let session = files
            .iter()
            .find(|p| p.ends_with("session.rs"))
            .expect("session.rs");
        let lines = production_lines(session);
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|(_, code)| !code.contains("#[test]")));
    }
}
