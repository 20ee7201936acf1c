//! The five numeric fields a daily quote entry must carry.
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A required quote field. Displays as its lowercase key name (`open`, `volume`, ...).
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    /// All fields in the order errors are reported.
    pub const ALL: [Field; 5] = [Field::Open, Field::High, Field::Low, Field::Close, Field::Volume];

    /// Maps a key name (ordinal prefix already stripped) to a field, ignoring ASCII case.
    pub fn from_key(name: &str) -> Option<Field> {
        name.parse().ok()
    }

    /// Position of the field in `Field::ALL`.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
