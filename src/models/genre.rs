//! Genre model

use serde::{Deserialize, Serialize};

/// A swipeable genre, seeded into the local store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    /// Genre id (slug)
    pub id: String,
    /// Display name
    pub name: String,
    /// Card artwork
    #[serde(default)]
    pub image: Option<String>,
}

impl Genre {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
        }
    }
}
