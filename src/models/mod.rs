//! Data models for the swipe-to-playlist core
//!
//! This module contains the shared data contracts used throughout the crate.

mod activity;
mod candidate;
mod genre;
mod mode;
mod playlist;
mod user;

pub use activity::{ActivityLogEntry, SwipeDecision};
pub use candidate::Candidate;
pub use genre::Genre;
pub use mode::Mode;
pub use playlist::{Playlist, Privacy, MAX_NAME_LEN};
pub use user::User;
