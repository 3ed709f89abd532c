//! Cell states for the player board.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Content of a single player-board cell.
///
/// Persisted boards and the backend use a single-character string
/// encoding: `"0"` empty, `"1"` filled, `"X"` marked. The serde
/// implementations speak that encoding so saved boards round-trip
/// byte-compatibly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
    Marked,
}

impl Cell {
    /// The single-character wire encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cell::Empty => "0",
            Cell::Filled => "1",
            Cell::Marked => "X",
        }
    }

    /// Marks are scratch annotations; for solving purposes they count
    /// as empty.
    pub fn normalized(&self) -> Cell {
        match self {
            Cell::Marked => Cell::Empty,
            other => *other,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CellVisitor;

        impl Visitor<'_> for CellVisitor {
            type Value = Cell;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a cell state string: "0", "1", or "X""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value {
                    "0" => Ok(Cell::Empty),
                    "1" => Ok(Cell::Filled),
                    "X" => Ok(Cell::Marked),
                    other => Err(E::custom(format!("invalid cell state: {:?}", other))),
                }
            }
        }

        deserializer.deserialize_str(CellVisitor)
    }
}
