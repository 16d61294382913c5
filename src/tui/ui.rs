//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::focus::{Phase, TimerState};
use crate::tui::app::App;

const KEY_HINT: &str = "space:start/pause | s:skip | r:reset | ?:help | q:quit";

const HELP_LINES: [(&str, &str); 7] = [
    ("space / enter", "start, pause or resume"),
    ("s", "complete the session now"),
    ("r", "reset the timer"),
    ("w / b / l", "focus, short break, long break"),
    ("+ / -", "focus length by one minute"),
    ("?", "toggle this help"),
    ("q / esc", "quit"),
];

/// Colour of a phase.
const fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Work => Color::Red,
        Phase::Break => Color::Green,
        Phase::LongBreak => Color::Blue,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Create layout: header, timer, stats, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(7),    // Timer
            Constraint::Length(3), // Stats
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    if app.show_help {
        render_help(frame, chunks[1]);
    } else {
        render_timer(frame, app, chunks[1]);
    }
    render_stats(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let engine = app.engine();
    let color = phase_color(engine.phase());

    let mut spans = vec![Span::styled(
        format!(" {} ", engine.phase().display_name()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(goal) = engine.goal_id() {
        spans.push(Span::styled(
            format!(" goal {goal}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(header, area);
}

/// Render the countdown and progress gauge.
fn render_timer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let engine = app.engine();
    let color = phase_color(engine.phase());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // Countdown
            Constraint::Length(1), // State
            Constraint::Length(1),
            Constraint::Length(1), // Gauge
            Constraint::Min(0),
        ])
        .split(inner);

    let countdown = Paragraph::new(engine.format_remaining())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    frame.render_widget(countdown, rows[1]);

    let state_label = match engine.state() {
        TimerState::Idle => "ready",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
        TimerState::Completed => "done, next session loaded",
    };
    let state = Paragraph::new(state_label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(state, rows[2]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(engine.progress().clamp(0.0, 1.0))
        .label(format!("{:.0}%", engine.progress() * 100.0));
    frame.render_widget(gauge, rows[4]);
}

/// Render the key list in place of the timer.
fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:>14}  "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*what),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Keys ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(help, area);
}

/// Render today's figures.
fn render_stats(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let engine = app.engine();
    let summary = engine.summary();

    let line = Line::from(vec![
        Span::raw(" Today: "),
        Span::styled(
            summary.completed_work_sessions.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" sessions | "),
        Span::styled(
            format!("{:.1}h", summary.focus_hours),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" focus | "),
        Span::styled(
            summary.cycles.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" cycles | "),
        Span::styled(
            format!("{} min", engine.work_duration().minutes()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let stats = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = app.status().map_or_else(
        || (KEY_HINT, Style::default().fg(Color::DarkGray)),
        |status| (status, Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(Paragraph::new(text).style(style), area);
}
