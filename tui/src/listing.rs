//! `breathe list` output

use std::fmt::Write;

use breathe_engine::TechniquePattern;

/// Plain text table, one technique per line plus its tagline
#[must_use]
pub fn table(techniques: &[TechniquePattern]) -> String {
    let mut out = String::new();
    for technique in techniques {
        let aliases = if technique.aliases.is_empty() {
            String::new()
        } else {
            format!(" (also: {})", technique.aliases.join(", "))
        };
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<8} {}{aliases}",
            technique.id, technique.name, technique.pattern, technique.tagline
        );
    }
    out
}

/// The catalog as pretty-printed JSON
pub fn json(techniques: &[TechniquePattern]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(techniques)
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathe_engine::catalog;

    #[test]
    fn test_table_has_every_id() {
        let text = table(catalog::all());
        assert_eq!(text.lines().count(), catalog::all().len());
        assert!(text.contains("wim-hof"));
        for id in ["operative", "sere", "military-sleep", "power"] {
            assert!(text.lines().any(|line| line.starts_with(id)), "{id} not listed");
        }
        for technique in catalog::all() {
            assert!(text.contains(technique.id));
        }
    }

    #[test]
    fn test_json_structure() {
        let value: serde_json::Value = serde_json::from_str(&json(catalog::all()).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), catalog::all().len());

        let box_entry = &entries[0];
        assert_eq!(box_entry["id"], "box");
        assert_eq!(box_entry["phases"][0]["label"], "inhale");
        assert_eq!(box_entry["phases"][0]["duration_secs"], 4.0);
        assert_eq!(box_entry["category"], "focus");
    }
}
