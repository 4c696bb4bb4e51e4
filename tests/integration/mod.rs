//! Integration tests for querylens.

pub mod cli_test;
pub mod http_test;
pub mod lifecycle_test;
pub mod stub;
