//! Technique menu and guide pages

use breathe_engine::catalog::{self, Difficulty, TechniquePattern};
use breathe_engine::RenderFrame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::{clock_text, hints};
use crate::theme;

pub(super) fn draw_menu(f: &mut Frame, area: Rect, frame: &RenderFrame) {
    let [title, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "breathe",
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        title,
    );

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

    let items: Vec<ListItem> = catalog::all()
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<20}", t.name), Style::default().fg(theme::TEXT)),
                Span::styled(t.pattern, Style::default().fg(theme::category_color(t.category))),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel(" Techniques "))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(Some(frame.highlighted));
    f.render_stateful_widget(list, list_area, &mut state);

    draw_details(f, detail_area, frame.technique, frame.cycles_target);

    f.render_widget(
        Paragraph::new(hints(&[
            ("↑↓", "choose"),
            ("←→", "cycles"),
            ("Enter", "start"),
            ("g", "guide"),
            ("?", "help"),
            ("q", "quit"),
        ])),
        footer,
    );
}

fn draw_details(f: &mut Frame, area: Rect, technique: &TechniquePattern, cycles: u32) {
    let width = area.width.saturating_sub(4).max(10) as usize;
    let total = technique.cycle_duration() * cycles;

    let mut lines = vec![
        Line::from(Span::styled(
            technique.name,
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(technique.tagline, Style::default().fg(theme::DIM_GRAY))),
        Line::default(),
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(theme::DIM_GRAY)),
            Span::styled(
                format!("{cycles} cycles"),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(theme::DIM_GRAY)),
            Span::styled(
                format!("   about {}", clock_text(total)),
                Style::default().fg(theme::DIM_GRAY),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled(
            technique.category.display(),
            Style::default().fg(theme::category_color(technique.category)),
        )),
        Line::from(Span::styled(
            difficulty_text(technique.difficulty),
            Style::default().fg(theme::DIM_GRAY),
        )),
        Line::default(),
    ];
    lines.extend(wrapped(technique.purpose, width, theme::TEXT));

    f.render_widget(Paragraph::new(lines).block(panel(" Details ")), area);
}

pub(super) fn draw_guide(f: &mut Frame, area: Rect, frame: &RenderFrame) {
    let technique = frame.technique;
    let [body, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    let width = body.width.saturating_sub(4).max(10) as usize;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                technique.name,
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ·  {}", technique.pattern),
                Style::default().fg(theme::category_color(technique.category)),
            ),
        ]),
        Line::from(Span::styled(technique.tagline, Style::default().fg(theme::DIM_GRAY))),
        Line::default(),
    ];
    lines.extend(wrapped(technique.description, width, theme::TEXT));
    lines.push(Line::default());

    lines.push(heading("Purpose"));
    lines.extend(wrapped(technique.purpose, width, theme::TEXT));
    lines.push(Line::default());

    lines.push(heading("When to use"));
    lines.extend(wrapped(technique.use_case, width, theme::TEXT));
    lines.push(Line::default());

    lines.push(heading("Phases"));
    for phase in technique.phases {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<7}", phase.label.display()),
                Style::default().fg(theme::phase_color(phase.label)),
            ),
            Span::styled(
                format!("{:>4}s  ", phase_secs(phase.duration)),
                Style::default().fg(theme::TEXT),
            ),
            Span::styled(phase.instruction, Style::default().fg(theme::DIM_GRAY)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(
            "{}  ·  {} cycles by default",
            difficulty_text(technique.difficulty),
            technique.default_cycles
        ),
        Style::default().fg(theme::DIM_GRAY),
    )));

    f.render_widget(Paragraph::new(lines).block(panel(" Guide ")), body);
    f.render_widget(
        Paragraph::new(hints(&[
            ("↑↓", "other techniques"),
            ("Enter", "start"),
            ("b", "back"),
        ])),
        footer,
    );
}

/// Seconds with as many decimals as the phase needs, `4` or `5.5`
fn phase_secs(duration: std::time::Duration) -> String {
    format!("{}", duration.as_secs_f64())
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER))
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn wrapped(text: &str, width: usize, color: ratatui::style::Color) -> Vec<Line<'static>> {
    textwrap::wrap(text, width)
        .into_iter()
        .map(|line| Line::from(Span::styled(line.into_owned(), Style::default().fg(color))))
        .collect()
}

fn difficulty_text(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "Beginner",
        Difficulty::Intermediate => "Intermediate",
        Difficulty::Advanced => "Advanced",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_phase_secs_keeps_fractions() {
        assert_eq!(phase_secs(Duration::from_secs(4)), "4");
        assert_eq!(phase_secs(Duration::from_millis(5500)), "5.5");
        assert_eq!(phase_secs(Duration::from_millis(1250)), "1.25");
        assert_eq!(phase_secs(Duration::from_millis(500)), "0.5");
    }
}
