//! Candidate model

use serde::{Deserialize, Serialize};

/// An item offered during swiping
///
/// Ephemeral: candidates exist only for the duration of a session's deck and
/// are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Platform id (track/artist) or local genre id
    pub id: String,
    /// Text shown on the card
    pub display_name: String,
    /// Card artwork
    #[serde(default)]
    pub image_url: Option<String>,
    /// Genres, when the platform reports them (artists only)
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            image_url: None,
            genres: Vec::new(),
        }
    }
}
