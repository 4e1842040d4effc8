//! Swipe mode

use serde::{Deserialize, Serialize};

/// What kind of candidates a session deals in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Songs,
    Artists,
    Genres,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Songs => "songs",
            Mode::Artists => "artists",
            Mode::Genres => "genres",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "songs" => Some(Mode::Songs),
            "artists" => Some(Mode::Artists),
            "genres" => Some(Mode::Genres),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for mode in [Mode::Songs, Mode::Artists, Mode::Genres] {
            assert_eq!(Mode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_mode_from_str_rejects_unknown() {
        assert_eq!(Mode::from_str("albums"), None);
        assert_eq!(Mode::from_str(""), None);
    }

    #[test]
    fn test_mode_from_str_is_case_insensitive() {
        assert_eq!(Mode::from_str("Songs"), Some(Mode::Songs));
        assert_eq!(Mode::from_str("ARTISTS"), Some(Mode::Artists));
    }
}
