//! Shared primitive types used across the entire generator.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for a star system (UUID-v4 shaped).
pub type SystemId = String;

/// Integer world coordinate of a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// Settlement classification of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Oikumene,
    Uninhabited,
    LostColony,
    HiddenEnclave,
}

impl Classification {
    pub fn is_oikumene(&self) -> bool {
        matches!(self, Self::Oikumene)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oikumene      => "oikumene",
            Self::Uninhabited   => "uninhabited",
            Self::LostColony    => "lost_colony",
            Self::HiddenEnclave => "hidden_enclave",
        }
    }
}
