//! Persistence adapters. libsql database for contacts, archetypes and journal; JSON file
//! for view preferences.

pub mod sqlite_repo;
pub mod state_json;

pub use sqlite_repo::SqliteRepo;
pub use state_json::StateJson;
