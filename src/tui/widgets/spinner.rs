//! Spinner shown while a query request is outstanding.

use std::time::{Duration, Instant};

/// Braille spinner frames.
const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Spinner state for the busy indicator.
#[derive(Debug, Clone)]
pub struct Spinner {
    /// When the spinner started.
    start_time: Instant,
    /// Label to display with the spinner.
    label: String,
}

impl Spinner {
    /// Creates a new spinner with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Spinner shown while the service works on a prompt.
    pub fn querying() -> Self {
        Self::new("Querying")
    }

    /// Returns the frame for the given elapsed time.
    fn frame_at(elapsed: Duration) -> &'static str {
        let frame_index = (elapsed.as_millis() / FRAME_DURATION_MS) as usize;
        BRAILLE_FRAMES[frame_index % BRAILLE_FRAMES.len()]
    }

    /// Returns the current frame of the animation.
    pub fn frame(&self) -> &'static str {
        Self::frame_at(self.start_time.elapsed())
    }

    /// Returns the display string, including elapsed seconds once past one.
    pub fn display(&self) -> String {
        let elapsed = self.start_time.elapsed();
        if elapsed.as_secs() >= 1 {
            format!("{} {} ({}s)", self.frame(), self.label, elapsed.as_secs())
        } else {
            format!("{} {}", self.frame(), self.label)
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
