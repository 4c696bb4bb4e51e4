//! Integration tests for querylens.
//!
//! HTTP tests run against an in-process axum stub of the query service;
//! CLI tests run the built binary with the mock service.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
