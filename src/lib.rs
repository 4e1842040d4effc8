//! vibeswipe: swipe-based music discovery core
//!
//! The pipeline that turns a swipe session into a playlist: a session
//! manager owning the activity-log lifecycle, a deck builder, and a
//! materializer that converts liked candidates into a playlist on the
//! external streaming platform plus a local record. Consumed in-process by
//! the app's UI event handlers; this crate owns no screens, ports, or auth.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod models;
pub mod platform;
pub mod recommend;

pub use error::{Error, Result};
