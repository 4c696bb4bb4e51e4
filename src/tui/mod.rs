//! Terminal User Interface for querylens.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod clipboard;
mod events;
mod ui;
pub mod widgets;

pub use app::App;
pub use events::Event;

use crate::config::Settings;
use crate::controller::{RequestLifecycleController, Ticket};
use crate::error::{QueryLensError, Result};
use crate::payload::ResponsePayload;
use crate::render::ResponseDispatcher;
use crate::service::QueryService;
use app::Action;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// A request finished, successfully or not.
    Completed {
        ticket: Ticket,
        outcome: Result<ResponsePayload>,
    },
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        // Non-fatal: copies fall back to OSC 52.
        if let Err(e) = clipboard::init() {
            warn!("Failed to initialize clipboard: {}", e);
        }

        Ok(Self { terminal })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| QueryLensError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).map_err(|e| {
            QueryLensError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| QueryLensError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| QueryLensError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )
        .map_err(|e| QueryLensError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| QueryLensError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self, mut app: App) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
            original_hook(panic_info);
        }));

        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(8);
        let mut terminal_events = events::spawn_reader(events::TICK_RATE);
        let result = self
            .run_event_loop(&mut app, tx, &mut rx, &mut terminal_events)
            .await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(
        &mut self,
        app: &mut App,
        tx: mpsc::Sender<AsyncMessage>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
        terminal_events: &mut mpsc::Receiver<Result<Event>>,
    ) -> Result<()> {
        loop {
            app.clear_expired_toast();

            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| QueryLensError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            tokio::select! {
                Some(event) = terminal_events.recv() => {
                    self.handle_event(event?, app, &tx);
                }

                Some(msg) = rx.recv() => {
                    Self::handle_async_message(msg, app);
                }

                else => {
                    return Err(QueryLensError::internal("Terminal event reader stopped"));
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, app: &mut App, tx: &mpsc::Sender<AsyncMessage>) {
        match event {
            Event::Key(key) => match app.handle_key(key) {
                Action::None => {}
                Action::Submit { ticket, request } => {
                    let service = app.controller().service();
                    let tx = tx.clone();
                    debug!(generation = ticket.generation(), "Dispatching request");
                    tokio::spawn(async move {
                        let outcome = service.query(&request).await;
                        if tx
                            .send(AsyncMessage::Completed { ticket, outcome })
                            .await
                            .is_err()
                        {
                            debug!("UI closed before the response arrived");
                        }
                    });
                }
                Action::Copy(text) => match clipboard::copy(&text) {
                    Ok(()) => app.show_toast("Copied generated query", false),
                    Err(e) => {
                        warn!("Clipboard copy failed: {}", e);
                        app.show_toast("Failed to copy to clipboard", true);
                    }
                },
            },
            Event::Paste(text) => app.handle_paste(&text),
            Event::Resize(_, _) | Event::Tick => {}
        }
    }

    fn handle_async_message(msg: AsyncMessage, app: &mut App) {
        match msg {
            AsyncMessage::Completed { ticket, outcome } => {
                app.apply_outcome(ticket, outcome);
            }
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI against `service`, with `prompt` prefilled.
pub async fn run(
    settings: &Settings,
    service: Arc<dyn QueryService>,
    prompt: Option<&str>,
) -> Result<()> {
    let dispatcher = ResponseDispatcher::terminal().with_diagnostics(settings.show_diagnostics);
    let controller = RequestLifecycleController::new(service, dispatcher);
    let app = App::new(
        controller,
        settings.endpoint.as_str(),
        settings.database_url.as_deref(),
    )
    .with_prompt(prompt);

    info!(endpoint = %settings.endpoint, "Starting TUI");
    let mut tui = Tui::new()?;
    tui.run(app).await
}
