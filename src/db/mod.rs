//! Session store
//!
//! SQLx/SQLite persistence for users, activity-log entries, playlists, and
//! genres. Activity-log rows are keyed and updated per entry (with a
//! revision compare-and-swap) rather than rewritten as a whole-array blob.

mod engine;
pub mod tables;

pub use engine::{setup, DbEngine};

#[cfg(test)]
pub(crate) use engine::testing;
