//! querylens - a terminal client for natural-language database query services.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod output;
pub mod payload;
pub mod render;
pub mod service;
pub mod tui;
