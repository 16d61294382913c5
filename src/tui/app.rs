//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::focus::{Completion, FocusEngine, Ticker, TimerState, WorkDuration};
use crate::persistence::PersistenceNotice;
use crate::tui::event::{map_key, Action, AppEvent};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(4);

const FOCUS_DONE: &str = "Focus session completed! Great job!";
const BREAK_DONE: &str = "Break completed! Ready for another focus session?";

/// Application state.
pub struct App {
    engine: FocusEngine,
    ticker: Ticker<AppEvent>,
    status: Option<(String, Instant)>,
    notifications: bool,
    bell: bool,
    /// Whether the key list is shown.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create a new app instance.
    #[must_use]
    pub fn new(engine: FocusEngine, ticker: Ticker<AppEvent>, notifications: bool) -> Self {
        Self {
            engine,
            ticker,
            status: None,
            notifications,
            bell: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// The engine being driven.
    #[must_use]
    pub const fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    /// Handle one event from the app channel.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                if let Some(completion) = self.engine.tick() {
                    self.on_completion(&completion);
                }
            }
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key) {
                    self.apply(action);
                }
            }
            AppEvent::Notice(notice) => self.on_notice(notice),
            AppEvent::Redraw => {}
        }
        self.sync_ticker();
    }

    /// Perform a user action.
    pub fn apply(&mut self, action: Action) {
        let result = match action {
            Action::Toggle => match self.engine.state() {
                TimerState::Running => self.engine.pause(),
                TimerState::Paused => self.engine.resume(),
                TimerState::Idle | TimerState::Completed => self.engine.start().map(|_| ()),
            },
            Action::Reset => {
                self.engine.reset();
                self.set_status("Timer reset");
                Ok(())
            }
            Action::Skip => self
                .engine
                .complete()
                .map(|completion| self.on_completion(&completion)),
            Action::Select(phase) => self.engine.select_phase(phase),
            Action::Longer => self.adjust_work_minutes(1),
            Action::Shorter => self.adjust_work_minutes(-1),
            Action::Help => {
                self.show_help = !self.show_help;
                Ok(())
            }
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.set_status(e.to_string());
        }
        self.sync_ticker();
    }

    /// Current status message, if it hasn't expired.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL)
            .map(|(text, _)| text.as_str())
    }

    /// Whether the bell should ring; clears the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Stop the tick source.
    pub fn shutdown(&mut self) {
        self.ticker.stop();
    }

    fn adjust_work_minutes(&mut self, delta: i64) -> Result<(), crate::focus::TransitionError> {
        let current = i64::from(self.engine.work_duration().minutes());
        let minutes = u32::try_from((current + delta).max(0)).unwrap_or(0);
        let duration = WorkDuration::new(minutes)?;
        self.engine.set_work_duration(duration)?;
        self.set_status(format!("Focus length: {} min", duration.minutes()));
        Ok(())
    }

    fn on_completion(&mut self, completion: &Completion) {
        let message = if completion.finished.is_break() {
            BREAK_DONE
        } else {
            FOCUS_DONE
        };
        self.set_status(message);
        self.bell = self.notifications;
    }

    fn on_notice(&mut self, notice: PersistenceNotice) {
        match notice {
            PersistenceNotice::Created { key, id } => self.engine.attach_session_id(key, id),
            PersistenceNotice::Failed { operation, message } => {
                self.set_status(format!("Could not save session ({operation}): {message}"));
            }
        }
    }

    /// Run the tick source exactly while the engine is running.
    fn sync_ticker(&mut self) {
        if self.engine.is_running() {
            self.ticker.start();
        } else {
            self.ticker.stop();
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some((text.into(), Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{Phase, SessionId};
    use crate::persistence::PersistenceHandle;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn make_app(minutes: u32) -> (App, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = FocusEngine::new(
            WorkDuration::new(minutes).unwrap(),
            PersistenceHandle::disabled(),
        );
        let ticker = Ticker::every_second(tx, AppEvent::Tick);
        (App::new(engine, ticker, true), rx)
    }

    fn key(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_toggle_starts_pauses_resumes() {
        let (mut app, _rx) = make_app(25);

        app.apply(Action::Toggle);
        assert_eq!(app.engine().state(), TimerState::Running);
        assert!(app.ticker.is_active());

        app.apply(Action::Toggle);
        assert_eq!(app.engine().state(), TimerState::Paused);
        assert!(!app.ticker.is_active());

        app.apply(Action::Toggle);
        assert_eq!(app.engine().state(), TimerState::Running);
        assert!(app.ticker.is_active());
    }

    #[tokio::test]
    async fn test_work_completion_message_and_bell() {
        let (mut app, _rx) = make_app(1);
        app.apply(Action::Toggle);

        for _ in 0..60 {
            app.handle_event(AppEvent::Tick);
        }

        assert_eq!(app.engine().state(), TimerState::Completed);
        assert_eq!(app.engine().phase(), Phase::Break);
        assert_eq!(app.status(), Some(FOCUS_DONE));
        assert!(app.take_bell());
        assert!(!app.take_bell());
        assert!(!app.ticker.is_active());
    }

    #[tokio::test]
    async fn test_skip_break_message() {
        let (mut app, _rx) = make_app(25);
        app.apply(Action::Select(Phase::Break));
        app.apply(Action::Toggle);

        app.apply(Action::Skip);

        assert_eq!(app.status(), Some(BREAK_DONE));
        assert_eq!(app.engine().phase(), Phase::Work);
    }

    #[tokio::test]
    async fn test_bell_disabled() {
        let (mut app, _rx) = make_app(25);
        app.notifications = false;
        app.apply(Action::Toggle);
        app.apply(Action::Skip);
        assert!(!app.take_bell());
    }

    #[tokio::test]
    async fn test_rejected_action_shows_error() {
        let (mut app, _rx) = make_app(25);
        app.apply(Action::Skip);

        assert_eq!(app.engine().state(), TimerState::Idle);
        assert!(app.status().is_some_and(|s| s.contains("cannot complete")));
    }

    #[tokio::test]
    async fn test_adjust_work_minutes_within_range() {
        let (mut app, _rx) = make_app(60);

        app.apply(Action::Longer);
        assert_eq!(app.engine().work_duration().minutes(), 60);

        app.apply(Action::Shorter);
        assert_eq!(app.engine().work_duration().minutes(), 59);
        assert_eq!(app.engine().remaining_seconds(), 59 * 60);

        let (mut app, _rx) = make_app(1);
        app.apply(Action::Shorter);
        assert_eq!(app.engine().work_duration().minutes(), 1);
    }

    #[tokio::test]
    async fn test_keys_drive_engine() {
        let (mut app, _rx) = make_app(25);

        app.handle_event(key('l'));
        assert_eq!(app.engine().phase(), Phase::LongBreak);

        app.handle_event(key(' '));
        assert!(app.engine().is_running());

        app.handle_event(key('r'));
        assert_eq!(app.engine().state(), TimerState::Idle);
        assert_eq!(app.engine().remaining_seconds(), 900);

        app.handle_event(key('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_failed_notice_is_shown() {
        let (mut app, _rx) = make_app(25);
        app.handle_event(AppEvent::Notice(PersistenceNotice::Failed {
            operation: "create",
            message: "offline".to_string(),
        }));

        assert!(app.status().is_some_and(|s| s.contains("offline")));
    }

    #[tokio::test]
    async fn test_created_notice_attaches_id() {
        let (mut app, _rx) = make_app(25);
        let key = app.engine.start().unwrap();
        app.handle_event(AppEvent::Notice(PersistenceNotice::Created {
            key,
            id: SessionId::from("remote-1"),
        }));

        assert_eq!(
            app.engine().session().and_then(|s| s.id.clone()),
            Some(SessionId::from("remote-1"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_delivers_ticks() {
        let (mut app, mut rx) = make_app(25);
        app.apply(Action::Toggle);

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert_eq!(rx.recv().await, Some(AppEvent::Tick));

        app.shutdown();
        assert!(!app.ticker.is_active());
    }
}
