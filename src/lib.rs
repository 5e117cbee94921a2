// ABOUTME: Library root for pomo: re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod host;
pub mod logging;
pub mod session;
pub mod store;
pub mod tui;
