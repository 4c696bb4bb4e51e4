//! TUI widgets for querylens.
//!
//! Contains reusable UI components.

pub mod chart;
pub mod header;
pub mod input;
pub mod notice;
pub mod results;
pub mod spinner;
pub mod table;
pub mod toast;
