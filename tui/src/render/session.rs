//! Session visualizer and completion screen

use breathe_engine::animation::AnimationFrame;
use breathe_engine::{RenderFrame, RunState};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph};
use ratatui::Frame;

use super::{clock_text, hints};
use crate::theme;

/// Circle radius at empty and full lungs, in canvas units
const RADIUS_EMPTY: f64 = 0.25;
const RADIUS_FULL: f64 = 0.9;

pub(super) fn draw_session(f: &mut Frame, area: Rect, frame: &RenderFrame) {
    let Some(animation) = frame.animation.as_ref() else {
        return;
    };
    let color = theme::phase_color(animation.label);

    let [header, canvas_area, label_area, gauge_area, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .areas(area);

    let cycle = (animation.completed_cycles + 1).min(animation.target_cycles);
    let title = Line::from(vec![
        Span::styled(
            frame.technique.name,
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ·  {}  ·  Cycle {cycle}/{}", frame.technique.pattern, animation.target_cycles),
            Style::default().fg(theme::DIM_GRAY),
        ),
    ]);
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), header);

    draw_breath(f, canvas_area, animation);

    let mut label_lines = vec![
        Line::from(vec![
            Span::styled(
                animation.label.display(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", remaining_secs(animation)),
                Style::default().fg(theme::TEXT),
            ),
        ]),
        Line::from(Span::styled(animation.instruction, Style::default().fg(theme::DIM_GRAY))),
    ];
    if frame.state == RunState::Paused {
        label_lines.push(Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )));
    }
    f.render_widget(
        Paragraph::new(label_lines).alignment(Alignment::Center),
        label_area,
    );

    let [_, gauge_inner, _] = Layout::horizontal([
        Constraint::Percentage(15),
        Constraint::Percentage(70),
        Constraint::Percentage(15),
    ])
    .areas(gauge_area);
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color).bg(theme::BORDER))
            .ratio(animation.session_progress.clamp(0.0, 1.0))
            .label(clock_text(animation.active_time)),
        gauge_inner,
    );

    let pause_hint = if frame.state == RunState::Paused {
        ("Space", "resume")
    } else {
        ("Space", "pause")
    };
    let sound = if frame.audio_enabled { "mute" } else { "sound" };
    f.render_widget(
        Paragraph::new(vec![
            Line::default(),
            hints(&[pause_hint, ("r", "restart"), ("a", sound), ("b", "menu"), ("q", "quit")]),
        ]),
        footer,
    );
}

fn draw_breath(f: &mut Frame, area: Rect, animation: &AnimationFrame) {
    let color = theme::phase_color(animation.label);
    let radius = RADIUS_EMPTY + (RADIUS_FULL - RADIUS_EMPTY) * animation.amplitude;

    // Terminal cells are about twice as tall as wide
    let y_span = 1.05;
    let x_span = y_span * f64::from(area.width) / (2.0 * f64::from(area.height.max(1)));

    let canvas = Canvas::default()
        .block(Block::default())
        .marker(Marker::Braille)
        .x_bounds([-x_span, x_span])
        .y_bounds([-y_span, y_span])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color,
            });
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: radius * 0.6,
                color: theme::fade(color, 0.35 + 0.4 * animation.amplitude),
            });
            ctx.layer();
            for particle in animation.particles.as_slice() {
                let coords = [(particle.x * RADIUS_FULL, particle.y * RADIUS_FULL)];
                ctx.draw(&Points {
                    coords: &coords,
                    color: theme::fade(color, particle.opacity),
                });
            }
        });
    f.render_widget(canvas, area);
}

fn remaining_secs(animation: &AnimationFrame) -> String {
    let secs = animation.remaining.as_secs_f64().ceil() as u64;
    format!("{secs}")
}

fn draw_celebration(f: &mut Frame, area: Rect, animation: &AnimationFrame) {
    if animation.celebration.is_empty() {
        return;
    }

    let y_span = 1.05;
    let x_span = y_span * f64::from(area.width) / (2.0 * f64::from(area.height.max(1)));
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-x_span, x_span])
        .y_bounds([-y_span, y_span])
        .paint(move |ctx| {
            for (i, particle) in animation.celebration.as_slice().iter().enumerate() {
                let color = theme::CELEBRATION[i % theme::CELEBRATION.len()];
                // A short tail along the velocity reads as motion in Braille
                let coords = [
                    (particle.x, particle.y),
                    (particle.x - 0.04 * particle.vx, particle.y - 0.04 * particle.vy),
                ];
                ctx.draw(&Points {
                    coords: &coords,
                    color: theme::fade(color, particle.opacity),
                });
            }
        });
    f.render_widget(canvas, area);
}

pub(super) fn draw_completed(f: &mut Frame, area: Rect, frame: &RenderFrame) {
    if let Some(animation) = frame.animation.as_ref() {
        draw_celebration(f, area, animation);
    }

    let [_, middle, footer] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .areas(area);

    let (cycles, active) = frame
        .animation
        .map_or((0, std::time::Duration::ZERO), |a| (a.completed_cycles, a.active_time));

    let lines = vec![
        Line::from(Span::styled(
            "Session complete",
            Style::default().fg(theme::SUCCESS_GREEN).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(frame.technique.name, Style::default().fg(theme::ACCENT))),
        Line::from(Span::styled(
            format!(
                "{cycles} {}  ·  {}",
                if cycles == 1 { "cycle" } else { "cycles" },
                clock_text(active)
            ),
            Style::default().fg(theme::TEXT),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Notice how you feel.",
            Style::default().fg(theme::DIM_GRAY),
        )),
    ];
    let [_, text_area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(40),
        Constraint::Fill(1),
    ])
    .areas(middle);
    f.render_widget(Clear, text_area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);

    let [_, hint_row] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(footer);
    f.render_widget(
        Paragraph::new(hints(&[("Space", "again"), ("b", "menu"), ("q", "quit")])),
        hint_row,
    );
}
