//! Terminal renderer
//!
//! Paints engine [`RenderFrame`]s with ratatui. The renderer never changes a
//! frame; everything it shows comes from the snapshot it is handed.

mod help;
mod menu;
mod session;

use breathe_engine::{EngineError, FrameRenderer, RenderFrame, RunState};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::theme;

/// Smallest terminal the visualizer can draw in
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 16;

/// [`FrameRenderer`] drawing to a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalRenderer<B> {
    #[must_use]
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    /// Fail if the terminal is below the minimum size
    pub fn check_size(&self) -> Result<(), EngineError> {
        let size = self.terminal.size()?;
        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            return Err(EngineError::RenderBackend(format!(
                "terminal is {}x{}, need at least {MIN_WIDTH}x{MIN_HEIGHT}",
                size.width, size.height
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> FrameRenderer for TerminalRenderer<B> {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), EngineError> {
        self.terminal.draw(|f| draw(f, frame))?;
        Ok(())
    }
}

/// Draw one frame
pub fn draw(f: &mut Frame, frame: &RenderFrame) {
    let area = f.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        draw_too_small(f, area);
        return;
    }

    match frame.state {
        RunState::Selecting => menu::draw_menu(f, area, frame),
        RunState::Guide => menu::draw_guide(f, area, frame),
        RunState::Running | RunState::Paused => session::draw_session(f, area, frame),
        RunState::Completed => session::draw_completed(f, area, frame),
        RunState::Exited => {}
    }

    if frame.show_help {
        help::draw_help(f, area, frame);
    }
}

fn draw_too_small(f: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let text = vec![
        Line::from(Span::styled(
            "Terminal too small",
            Style::default().fg(theme::ERROR_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("resize to at least {MIN_WIDTH}x{MIN_HEIGHT}"),
            Style::default().fg(theme::DIM_GRAY),
        )),
    ];
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
}

/// Key hint footer line
fn hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 3);
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(
            (*key).to_string(),
            Style::default().fg(theme::ACCENT),
        ));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(theme::DIM_GRAY),
        ));
    }
    Line::from(spans).alignment(Alignment::Center)
}

/// `m:ss` for a duration
fn clock_text(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use breathe_engine::{
        catalog, BreatheConfig, CueDispatcher, CycleLimits, FrameScheduler, InputEvent,
        ManualClock, SessionMachine,
    };
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn screen(renderer: &TerminalRenderer<TestBackend>) -> String {
        let buffer = renderer.terminal().backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn renderer(width: u16, height: u16) -> TerminalRenderer<TestBackend> {
        TerminalRenderer::new(Terminal::new(TestBackend::new(width, height)).unwrap())
    }

    fn scheduler(clock: &ManualClock) -> FrameScheduler<&ManualClock> {
        let config = BreatheConfig::default();
        let machine = SessionMachine::new(CycleLimits::default(), false);
        FrameScheduler::new(clock, machine, CueDispatcher::disabled(), &config)
    }

    #[test]
    fn test_menu_lists_techniques() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = renderer(100, 40);
        r.render(&s.step(Duration::ZERO, None)).unwrap();

        let text = screen(&r);
        for technique in catalog::all() {
            assert!(text.contains(technique.name), "missing {}", technique.name);
        }
        assert!(text.contains("cycles"));
    }

    #[test]
    fn test_session_shows_phase() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = renderer(80, 30);
        s.step(Duration::ZERO, Some(InputEvent::Select));
        r.render(&s.step(Duration::from_millis(40), None)).unwrap();

        let text = screen(&r);
        assert!(text.contains("INHALE"));
        assert!(text.contains("Box Breathing"));
        assert!(text.contains("Cycle 1/5"));
    }

    #[test]
    fn test_paused_banner() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = renderer(80, 30);
        s.step(Duration::ZERO, Some(InputEvent::Select));
        r.render(&s.step(Duration::ZERO, Some(InputEvent::Pause))).unwrap();
        assert!(screen(&r).contains("PAUSED"));
    }

    #[test]
    fn test_guide_and_help_overlay() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = renderer(100, 40);
        s.step(Duration::ZERO, Some(InputEvent::ToggleGuide));
        r.render(&s.step(Duration::ZERO, Some(InputEvent::ToggleHelp))).unwrap();

        let text = screen(&r);
        assert!(text.contains("4-4-4-4"));
        assert!(text.contains("Keys"));
        assert!(text.contains("Toggle sound"));
    }

    #[test]
    fn test_completed_screen() {
        let clock = ManualClock::new();
        let config = BreatheConfig::default();
        let mut machine = SessionMachine::new(CycleLimits::default(), false);
        machine.start_immediately(catalog::lookup("energize").unwrap(), Some(1), std::time::Instant::now());
        let mut s = FrameScheduler::new(&clock, machine, CueDispatcher::disabled(), &config);
        let mut frame = s.step(Duration::ZERO, None);
        for _ in 0..40 {
            frame = s.step(Duration::from_millis(50), None);
        }
        assert_eq!(frame.state, RunState::Completed);

        let mut r = renderer(80, 30);
        r.render(&frame).unwrap();
        let text = screen(&r);
        assert!(text.contains("Session complete"));
        assert!(text.contains("0:02"));
    }

    #[test]
    fn test_completed_burst_fades_out() {
        let is_braille = |text: &str| text.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c));
        let clock = ManualClock::new();
        let config = BreatheConfig::default();
        let mut machine = SessionMachine::new(CycleLimits::default(), false);
        machine.start_immediately(catalog::lookup("energize").unwrap(), Some(1), std::time::Instant::now());
        let mut s = FrameScheduler::new(&clock, machine, CueDispatcher::disabled(), &config);
        let mut frame = s.step(Duration::ZERO, None);
        while frame.state != RunState::Completed {
            frame = s.step(Duration::from_millis(50), None);
        }

        for _ in 0..12 {
            frame = s.step(Duration::from_millis(50), None);
        }
        let mut r = renderer(80, 30);
        r.render(&frame).unwrap();
        let text = screen(&r);
        assert!(is_braille(&text));
        assert!(text.contains("Session complete"));

        for _ in 0..80 {
            frame = s.step(Duration::from_millis(50), None);
        }
        let mut r = renderer(80, 30);
        r.render(&frame).unwrap();
        let text = screen(&r);
        assert!(!is_braille(&text));
        assert!(text.contains("Session complete"));
    }

    #[test]
    fn test_too_small_hint() {
        let clock = ManualClock::new();
        let mut s = scheduler(&clock);
        let mut r = renderer(30, 10);
        r.render(&s.step(Duration::ZERO, None)).unwrap();
        assert!(screen(&r).contains("Terminal too small"));
        assert!(r.check_size().is_err());
        assert!(renderer(40, 16).check_size().is_ok());
    }

    #[test]
    fn test_clock_text() {
        assert_eq!(clock_text(Duration::from_secs(0)), "0:00");
        assert_eq!(clock_text(Duration::from_secs(125)), "2:05");
    }
}
