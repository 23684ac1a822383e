//! Infrastructure adapters. Implement outbound ports, drive the inbound one.
//!
//! Model API, SQLite and JSON storage, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod persistence;
pub mod ui;
