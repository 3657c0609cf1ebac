//! Stereo directions for tones
//!
//! The host settings record stores directions as small integers
//! (0 = Left ... 4 = RightToLeft); this module maps them to a typed enum.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Where a tone sits in the stereo field.
///
/// The two sweep variants only matter for progress tones, where the pan
/// follows the completion percentage. Plain beeps treat them as centred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Left,
    Center,
    Right,
    /// Pan moves from left (0%) to right (100%)
    LeftToRight,
    /// Pan moves from right (0%) to left (100%)
    RightToLeft,
}

impl Direction {
    /// Parse the integer index used by the settings record
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Left),
            1 => Some(Direction::Center),
            2 => Some(Direction::Right),
            3 => Some(Direction::LeftToRight),
            4 => Some(Direction::RightToLeft),
            _ => None,
        }
    }

    /// Integer index used by the settings record
    pub fn index(&self) -> u8 {
        match self {
            Direction::Left => 0,
            Direction::Center => 1,
            Direction::Right => 2,
            Direction::LeftToRight => 3,
            Direction::RightToLeft => 4,
        }
    }

    /// True for the two directions whose pan follows progress
    pub fn is_sweep(&self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }

    /// Parse from a CLI-style name (`left`, `center`, `left-to-right`, ...)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "left" => Some(Direction::Left),
            "center" | "centre" => Some(Direction::Center),
            "right" => Some(Direction::Right),
            "left-to-right" | "ltr" => Some(Direction::LeftToRight),
            "right-to-left" | "rtl" => Some(Direction::RightToLeft),
            _ => None,
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Center => "Center",
            Direction::Right => "Right",
            Direction::LeftToRight => "Left to Right",
            Direction::RightToLeft => "Right to Left",
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Direction::from_index(value)
            .ok_or_else(|| Error::InvalidInput(format!("direction index out of range: {}", value)))
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        direction.index()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping_matches_settings_record() {
        assert_eq!(Direction::from_index(0), Some(Direction::Left));
        assert_eq!(Direction::from_index(3), Some(Direction::LeftToRight));
        assert_eq!(Direction::from_index(5), None);
        assert_eq!(Direction::RightToLeft.index(), 4);
    }

    #[test]
    fn test_serde_uses_integer_index() {
        let json = serde_json::to_string(&Direction::Right).unwrap();
        assert_eq!(json, "2");

        let parsed: Direction = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, Direction::RightToLeft);

        assert!(serde_json::from_str::<Direction>("9").is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Direction::from_name("Left_To_Right"), Some(Direction::LeftToRight));
        assert_eq!(Direction::from_name("centre"), Some(Direction::Center));
        assert_eq!(Direction::from_name("up"), None);
    }

    #[test]
    fn test_sweep_directions() {
        assert!(Direction::LeftToRight.is_sweep());
        assert!(Direction::RightToLeft.is_sweep());
        assert!(!Direction::Center.is_sweep());
    }
}
