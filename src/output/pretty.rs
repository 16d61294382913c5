use chrono::{Duration, NaiveDate};
use colored::Colorize;

use crate::focus::{
    format_duration, DailySummary, FocusSession, Phase, SessionStatus, SESSIONS_PER_CYCLE,
};

/// Format today's figures as pretty output
pub fn format_today_pretty(summary: &DailySummary, date: NaiveDate) -> String {
    let mut output = format!("{} {}\n", "Today".bold(), date.to_string().dimmed());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    output.push_str(&format!(
        "  {}:  {}\n",
        "Sessions".dimmed(),
        summary.completed_work_sessions.to_string().bold()
    ));
    output.push_str(&format!(
        "  {}:     {:.1}h\n",
        "Focus".dimmed(),
        summary.focus_hours
    ));
    output.push_str(&format!("  {}:    {}\n", "Cycles".dimmed(), summary.cycles));

    let until_long = SESSIONS_PER_CYCLE - summary.completed_work_sessions % SESSIONS_PER_CYCLE;
    output.push_str(
        &format!(
            "\n  Long break after {} more focus session{}",
            until_long,
            if until_long == 1 { "" } else { "s" }
        )
        .dimmed()
        .to_string(),
    );

    output
}

/// Format session history as a pretty table
pub fn format_history_pretty(sessions: &[FocusSession]) -> String {
    if sessions.is_empty() {
        return "No focus sessions found.\n\nStart one with: tomato start".to_string();
    }

    let mut output = vec![
        "Focus Session History".bold().to_string(),
        "═".repeat(60),
        format!(
            "{:<17} {:<12} {:<12} {:<8} {}",
            "Started", "Type", "Focused", "Status", "Goal"
        ),
        "─".repeat(60),
    ];

    for session in sessions {
        let started = session.started_at_local().format("%Y-%m-%d %H:%M");
        let session_type = match session.session_type {
            Phase::Work => "Focus".red(),
            Phase::Break => "Break".green(),
            Phase::LongBreak => "Long break".blue(),
        };
        let focused = format_duration(Duration::seconds(i64::from(session.elapsed_seconds)));
        let status = match session.status {
            SessionStatus::Completed => "done".green(),
            SessionStatus::Active => "active".yellow(),
            SessionStatus::Paused => "paused".yellow(),
        };
        let goal = session.goal_id.as_deref().unwrap_or("-");

        output.push(format!(
            "{started:<17} {:<12} {focused:<12} {:<8} {}",
            session_type,
            status,
            goal.dimmed()
        ));
    }

    output.join("\n")
}
