//! Event handling for the TUI.
//!
//! Keyboard input, timer ticks and persistence notices all arrive on one
//! channel so the app loop only ever waits on a single receiver.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::focus::Phase;
use crate::persistence::PersistenceNotice;

/// Something the app loop has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One second passed on the running timer.
    Tick,
    /// A key was pressed.
    Key(KeyEvent),
    /// The persistence worker reported back.
    Notice(PersistenceNotice),
    /// The terminal was resized.
    Redraw,
}

/// Action requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start, pause or resume depending on the timer state.
    Toggle,
    /// Drop the current session.
    Reset,
    /// Complete the running session now.
    Skip,
    /// Load a phase for the next start.
    Select(Phase),
    /// One more minute of work.
    Longer,
    /// One less minute of work.
    Shorter,
    /// Show or hide the key list.
    Help,
    /// Leave the timer screen.
    Quit,
}

/// Map a key press to an action.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Toggle),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('s') => Some(Action::Skip),
        KeyCode::Char('w') => Some(Action::Select(Phase::Work)),
        KeyCode::Char('b') => Some(Action::Select(Phase::Break)),
        KeyCode::Char('l') => Some(Action::Select(Phase::LongBreak)),
        KeyCode::Char('+' | '=') | KeyCode::Up => Some(Action::Longer),
        KeyCode::Char('-') | KeyCode::Down => Some(Action::Shorter),
        KeyCode::Char('?') => Some(Action::Help),
        _ => None,
    }
}

/// Read terminal input on a dedicated thread.
///
/// The thread exits once the app loop drops its receiver, or when the
/// terminal stops delivering events.
pub fn spawn_input_reader(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => {}
                Ok(true) => {
                    let forwarded = match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(_, _)) => Some(AppEvent::Redraw),
                        Ok(_) => None,
                        Err(e) => {
                            tracing::warn!(error = %e, "terminal event read failed");
                            break;
                        }
                    };
                    if let Some(event) = forwarded {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event poll failed");
                    break;
                }
            }
        }
    })
}

/// Forward persistence notices into the app channel.
pub fn forward_notices(
    mut notices: UnboundedReceiver<PersistenceNotice>,
    tx: UnboundedSender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            if tx.send(AppEvent::Notice(notice)).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::SessionId;
    use crossterm::event::KeyEventState;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_key_controls() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::Toggle));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Action::Toggle));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(Action::Reset));
        assert_eq!(map_key(press(KeyCode::Char('s'))), Some(Action::Skip));
        assert_eq!(map_key(press(KeyCode::Char('+'))), Some(Action::Longer));
        assert_eq!(map_key(press(KeyCode::Char('-'))), Some(Action::Shorter));
        assert_eq!(map_key(press(KeyCode::Char('?'))), Some(Action::Help));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_map_key_phases() {
        assert_eq!(
            map_key(press(KeyCode::Char('w'))),
            Some(Action::Select(Phase::Work))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('b'))),
            Some(Action::Select(Phase::Break))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('l'))),
            Some(Action::Select(Phase::LongBreak))
        );
    }

    #[test]
    fn test_map_key_quit() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_map_key_ignores_release() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }

    #[tokio::test]
    async fn test_forward_notices() {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (app_tx, mut app_rx) = mpsc::unbounded_channel();
        let task = forward_notices(notice_rx, app_tx);

        let notice = PersistenceNotice::Created {
            key: crate::focus::SessionKey::new(),
            id: SessionId::from("abc"),
        };
        notice_tx.send(notice.clone()).unwrap();
        drop(notice_tx);
        task.await.unwrap();

        assert_eq!(app_rx.recv().await, Some(AppEvent::Notice(notice)));
    }
}
