// ABOUTME: Library root for railyard - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod promote;
pub mod types;
