//! Clipboard support for the TUI.
//!
//! Uses the native clipboard when one is reachable and falls back to the
//! OSC 52 terminal escape otherwise (SSH sessions, headless X).

use arboard::Clipboard;
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;

/// Native clipboard handle, held open for the life of the TUI.
static CLIPBOARD: Mutex<Option<Clipboard>> = Mutex::new(None);

/// Clipboard operation errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to acquire clipboard lock")]
    Lock,

    #[error("Failed to copy to clipboard: {0}")]
    Copy(String),
}

/// Opens the native clipboard. Failure is not fatal; copies then use OSC 52.
pub fn init() -> Result<(), ClipboardError> {
    let clipboard = Clipboard::new().map_err(|e| ClipboardError::Copy(e.to_string()))?;
    let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
    *guard = Some(clipboard);
    Ok(())
}

/// Copies text to the clipboard.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    {
        let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
        if let Some(clipboard) = guard.as_mut() {
            match clipboard.set_text(text) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::debug!("Native clipboard failed, using OSC 52: {}", e),
            }
        }
    }
    copy_osc52(text)
}

/// OSC 52 format: ESC ] 52 ; c ; <base64-data> ESC \
fn osc52_sequence(text: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};

    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text))
}

fn copy_osc52(text: &str) -> Result<(), ClipboardError> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| ClipboardError::Copy(format!("Failed to write OSC 52: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("SELECT 1"), "\x1b]52;c;U0VMRUNUIDE=\x1b\\");
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::Copy("no display".to_string());
        assert_eq!(err.to_string(), "Failed to copy to clipboard: no display");
    }
}
