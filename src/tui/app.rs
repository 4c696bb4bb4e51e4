//! Application state for the TUI.
//!
//! Holds the two input fields, the request lifecycle controller and the
//! transient UI state (focus, scroll, notice, toast). Key handling is pure
//! state mutation; anything that needs I/O is returned as an [`Action`] for
//! the event loop to carry out.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::widgets::spinner::Spinner;
use crate::controller::{RequestLifecycleController, SubmissionInput, Ticket};
use crate::error::{QueryLensError, Result};
use crate::payload::{QueryRequest, ResponsePayload};

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Lines moved by PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    DatabaseUrl,
    #[default]
    Prompt,
    Results,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::DatabaseUrl => Self::Prompt,
            Self::Prompt => Self::Results,
            Self::Results => Self::DatabaseUrl,
        }
    }

    /// Cycles to the previous focus panel.
    pub fn prev(self) -> Self {
        match self {
            Self::DatabaseUrl => Self::Results,
            Self::Prompt => Self::DatabaseUrl,
            Self::Results => Self::Prompt,
        }
    }
}

/// Input state for text editing.
///
/// The cursor is a character index, not a byte offset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    /// Creates a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Inserts a string at the cursor. Newlines become spaces.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }

        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start of the input.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clears the input.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns true if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Something the event loop must do after a key press.
#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    /// Issue this request; deliver its outcome with this ticket.
    Submit {
        ticket: Ticket,
        request: QueryRequest,
    },
    /// Copy this text to the clipboard.
    Copy(String),
}

/// A short-lived status message.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
    expires_at: Instant,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// Database URL field.
    pub database_url: InputState,
    /// Prompt field.
    pub prompt: InputState,
    /// Results scroll offset (lines from top).
    pub results_scroll: usize,
    /// Blocking notice; keys other than Enter/Esc are ignored while shown.
    pub notice: Option<String>,
    /// Service endpoint, for the header.
    pub endpoint: String,
    spinner: Option<Spinner>,
    toast: Option<Toast>,
    controller: RequestLifecycleController,
}

impl App {
    /// Creates a new App instance.
    pub fn new(
        controller: RequestLifecycleController,
        endpoint: impl Into<String>,
        database_url: Option<&str>,
    ) -> Self {
        let database_url = database_url.map(InputState::with_text).unwrap_or_default();
        let focus = if database_url.is_empty() {
            Focus::DatabaseUrl
        } else {
            Focus::Prompt
        };

        Self {
            running: true,
            focus,
            database_url,
            prompt: InputState::new(),
            results_scroll: 0,
            notice: None,
            endpoint: endpoint.into(),
            spinner: None,
            toast: None,
            controller,
        }
    }

    /// Prefills the prompt field, e.g. from `--prompt`.
    pub fn with_prompt(mut self, prompt: Option<&str>) -> Self {
        if let Some(prompt) = prompt {
            self.prompt = InputState::new();
            self.prompt.insert_str(prompt);
        }
        self
    }

    pub fn controller(&self) -> &RequestLifecycleController {
        &self.controller
    }

    /// The busy spinner, while a request is outstanding.
    pub fn spinner(&self) -> Option<&Spinner> {
        self.spinner.as_ref()
    }

    /// The current toast, if any.
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Shows a toast for a few seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error,
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drops the toast once it has expired.
    pub fn clear_expired_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| Instant::now() >= t.expires_at)
        {
            self.toast = None;
        }
    }

    /// The current field values, as a submission.
    pub fn submission(&self) -> SubmissionInput {
        SubmissionInput::new(&self.database_url.text, &self.prompt.text)
    }

    /// Starts a submission from the current fields.
    ///
    /// A rejected submission (blank field, request in flight) raises the
    /// notice and leaves everything else untouched.
    pub fn submit(&mut self) -> Action {
        match self.controller.begin(&self.submission()) {
            Ok((ticket, request)) => {
                self.spinner = Some(Spinner::querying());
                self.results_scroll = 0;
                Action::Submit { ticket, request }
            }
            Err(e) => {
                self.raise_notice(e);
                Action::None
            }
        }
    }

    /// Applies a finished request's outcome.
    pub fn apply_outcome(&mut self, ticket: Ticket, outcome: Result<ResponsePayload>) {
        if self.controller.complete(ticket, outcome) {
            self.spinner = None;
            self.results_scroll = 0;
        }
    }

    fn raise_notice(&mut self, error: QueryLensError) {
        self.notice = Some(error.to_string());
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                Action::None
            }
            KeyCode::Char('l') if ctrl => {
                if let Err(e) = self.controller.clear() {
                    self.raise_notice(e);
                }
                self.results_scroll = 0;
                Action::None
            }
            KeyCode::Char('y') if ctrl => match self.controller.display().generated_query() {
                Some(query) => Action::Copy(query.to_string()),
                None => {
                    self.show_toast("No generated query to copy", true);
                    Action::None
                }
            },
            KeyCode::Tab => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            _ => {
                match self.focus {
                    Focus::DatabaseUrl => Self::edit(&mut self.database_url, key),
                    Focus::Prompt => Self::edit(&mut self.prompt, key),
                    Focus::Results => self.scroll(key.code),
                }
                Action::None
            }
        }
    }

    /// Handles pasted text into the focused field.
    pub fn handle_paste(&mut self, text: &str) {
        if self.notice.is_some() {
            return;
        }
        match self.focus {
            Focus::DatabaseUrl => self.database_url.insert_str(text.trim()),
            Focus::Prompt => self.prompt.insert_str(text),
            Focus::Results => {}
        }
    }

    fn edit(input: &mut InputState, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => input.delete_word(),
            KeyCode::Char('u') if ctrl => input.clear(),
            KeyCode::Char('a') if ctrl => input.move_home(),
            KeyCode::Char('e') if ctrl => input.move_end(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }

    fn scroll(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.results_scroll = self.results_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.results_scroll = self.results_scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(PAGE_SCROLL);
            }
            KeyCode::PageDown => {
                self.results_scroll = self.results_scroll.saturating_add(PAGE_SCROLL);
            }
            KeyCode::Home => self.results_scroll = 0,
            // Clamped during render.
            KeyCode::End => self.results_scroll = usize::MAX,
            _ => {}
        }
    }
}
