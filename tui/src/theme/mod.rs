//! Theme and Colors
//!
//! Calm, low-contrast palette. Each phase gets its own hue so the label,
//! circle and particles all shift together at a boundary.

use breathe_engine::catalog::{Category, PhaseLabel};
use ratatui::style::Color;

// ============================================================================
// Phase Palette
// ============================================================================

/// Inhale - cool sky blue
pub const PHASE_INHALE: Color = Color::Rgb(110, 190, 255);

/// Hold after inhale - soft lavender
pub const PHASE_HOLD_FULL: Color = Color::Rgb(190, 160, 255);

/// Exhale - sea green
pub const PHASE_EXHALE: Color = Color::Rgb(110, 220, 170);

/// Hold after exhale - muted slate
pub const PHASE_HOLD_EMPTY: Color = Color::Rgb(140, 150, 180);

// ============================================================================
// UI Colors
// ============================================================================

/// Titles and highlighted menu entries
pub const ACCENT: Color = Color::Rgb(255, 200, 120);

/// Body text
pub const TEXT: Color = Color::Rgb(220, 220, 230);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 110);

/// Panel borders
pub const BORDER: Color = Color::Rgb(70, 80, 100);

/// Error and warning text
pub const ERROR_RED: Color = Color::Rgb(255, 110, 110);

/// Completed session
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Completion burst colors, cycled by particle index
pub const CELEBRATION: [Color; 5] = [SUCCESS_GREEN, ACCENT, PHASE_INHALE, PHASE_HOLD_FULL, PHASE_EXHALE];

/// Color for a phase label
#[must_use]
pub fn phase_color(label: PhaseLabel) -> Color {
    match label {
        PhaseLabel::Inhale => PHASE_INHALE,
        PhaseLabel::HoldFull => PHASE_HOLD_FULL,
        PhaseLabel::Exhale => PHASE_EXHALE,
        PhaseLabel::HoldEmpty => PHASE_HOLD_EMPTY,
    }
}

/// Color for a menu category heading
#[must_use]
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Focus => Color::Rgb(255, 200, 120),
        Category::Calm => PHASE_EXHALE,
        Category::Sleep => PHASE_HOLD_FULL,
        Category::Energy => Color::Rgb(255, 150, 120),
        Category::Recovery => PHASE_INHALE,
    }
}

/// Blend `color` towards the background by `opacity` (0 = invisible)
#[must_use]
pub fn fade(color: Color, opacity: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (f64::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_colors_distinct() {
        let colors = [
            phase_color(PhaseLabel::Inhale),
            phase_color(PhaseLabel::HoldFull),
            phase_color(PhaseLabel::Exhale),
            phase_color(PhaseLabel::HoldEmpty),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(fade(Color::Rgb(200, 100, 50), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(fade(Color::Magenta, 0.3), Color::Magenta);
    }
}
