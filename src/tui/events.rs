//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crate::error::{QueryLensError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// How long one poll waits before yielding a tick.
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Text pasted into the terminal.
    Paste(String),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (spinner animation, toast expiry).
    Tick,
}

/// Blocks for up to `tick_rate` waiting for the next terminal event.
///
/// Key releases are folded into ticks so each key press is handled once on
/// platforms that report both.
pub fn poll_event(tick_rate: Duration) -> Result<Event> {
    if !event::poll(tick_rate)
        .map_err(|e| QueryLensError::internal(format!("Failed to poll events: {e}")))?
    {
        return Ok(Event::Tick);
    }

    let event =
        event::read().map_err(|e| QueryLensError::internal(format!("Failed to read event: {e}")))?;
    Ok(from_crossterm(event))
}

/// Starts the terminal event reader on a blocking thread.
///
/// The reader owns the terminal input for the lifetime of the UI, so events
/// read while the main loop is busy elsewhere wait in the channel. It stops
/// after the first poll error or once the receiver is dropped.
pub fn spawn_reader(tick_rate: Duration) -> mpsc::Receiver<Result<Event>> {
    spawn_reader_with(move || poll_event(tick_rate))
}

fn spawn_reader_with<F>(mut poll: F) -> mpsc::Receiver<Result<Event>>
where
    F: FnMut() -> Result<Event> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(64);
    tokio::task::spawn_blocking(move || loop {
        let event = poll();
        let failed = event.is_err();
        if tx.blocking_send(event).is_err() {
            debug!("Event receiver closed, stopping reader");
            break;
        }
        if failed {
            break;
        }
    });
    rx
}

fn from_crossterm(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Event::Key(key),
        CrosstermEvent::Paste(text) => Event::Paste(text),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        _ => Event::Tick,
    }
}
