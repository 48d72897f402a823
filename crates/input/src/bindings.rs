use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four movement directions a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Up,
        MoveDirection::Down,
        MoveDirection::Left,
        MoveDirection::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown direction {0:?}, expected one of up, down, left, right")]
pub struct ParseDirectionError(String);

impl FromStr for MoveDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "forward" => Ok(MoveDirection::Up),
            "down" | "back" | "backward" => Ok(MoveDirection::Down),
            "left" => Ok(MoveDirection::Left),
            "right" => Ok(MoveDirection::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Key-identifier lists for each direction.
///
/// Identifiers follow the host's logical key names: single characters are
/// the produced text (`"w"`), named keys use their name (`"ArrowUp"`).
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: vec!["w".into(), "ArrowUp".into()],
            down: vec!["s".into(), "ArrowDown".into()],
            left: vec!["a".into(), "ArrowLeft".into()],
            right: vec!["d".into(), "ArrowRight".into()],
        }
    }
}

impl KeyBindings {
    /// Resolve a key to a direction.
    ///
    /// Lists are checked in the order up, down, right, left; a key bound to
    /// several directions resolves to the first match.
    pub fn direction_for(&self, key: &str) -> Option<MoveDirection> {
        let lists = [
            (&self.up, MoveDirection::Up),
            (&self.down, MoveDirection::Down),
            (&self.right, MoveDirection::Right),
            (&self.left, MoveDirection::Left),
        ];
        lists
            .into_iter()
            .find(|(keys, _)| keys.iter().any(|k| k == key))
            .map(|(_, dir)| dir)
    }

    pub fn keys_for(&self, direction: MoveDirection) -> &[String] {
        match direction {
            MoveDirection::Up => &self.up,
            MoveDirection::Down => &self.down,
            MoveDirection::Left => &self.left,
            MoveDirection::Right => &self.right,
        }
    }
}
