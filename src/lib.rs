//! wxalert library
//!
//! Exposes the expiring cache, the alert engine, the provider clients and the
//! CLI configuration for use by the binary and by integration tests.

pub mod alerts;
pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod logging;
pub mod report;
