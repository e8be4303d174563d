use std::fmt;
use std::str::FromStr;

use crate::coordinates::GridPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectColor {
    #[default]
    Red,
    Blue,
    Green,
}

impl ObjectColor {
    pub const ALL: [ObjectColor; 3] = [ObjectColor::Red, ObjectColor::Blue, ObjectColor::Green];

    pub fn name(self) -> &'static str {
        match self {
            ObjectColor::Red => "red",
            ObjectColor::Blue => "blue",
            ObjectColor::Green => "green",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            ObjectColor::Red => [255, 0, 0],
            ObjectColor::Blue => [0, 0, 255],
            ObjectColor::Green => [0, 128, 0],
        }
    }
}

impl fmt::Display for ObjectColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object color '{0}' (expected red, blue or green)")]
pub struct ParseColorError(pub String);

impl FromStr for ObjectColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ObjectColor::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldObject {
    pub position: GridPoint,
    pub color: ObjectColor,
}

impl FieldObject {
    pub fn new(position: GridPoint, color: ObjectColor) -> Self {
        Self { position, color }
    }
}
