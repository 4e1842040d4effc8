//! Core pipeline: session lifecycle, deck building, and materialization

pub mod deck;
pub mod materializer;
pub mod sessions;

pub use deck::build_deck;
pub use materializer::PlaylistMaterializer;
pub use sessions::SessionManager;
