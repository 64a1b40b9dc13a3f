// ABOUTME: Library root for v3push - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod archive;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod logs;
pub mod output;
pub mod types;
