use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Auto,
    Bicycle,
    Pedestrian,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown transport mode {0:?}, expected auto, bicycle or pedestrian")]
pub struct ParseTransportModeError(pub String);

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [
        TransportMode::Auto,
        TransportMode::Bicycle,
        TransportMode::Pedestrian,
    ];

    /// Valhalla costing model for this mode.
    pub fn costing(&self) -> &'static str {
        match self {
            TransportMode::Auto => "auto",
            TransportMode::Bicycle => "bicycle",
            TransportMode::Pedestrian => "pedestrian",
        }
    }
}

impl Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.costing())
    }
}

impl FromStr for TransportMode {
    type Err = ParseTransportModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "car" | "driving" => Ok(TransportMode::Auto),
            "bicycle" | "bike" | "cycling" => Ok(TransportMode::Bicycle),
            "pedestrian" | "foot" | "walking" => Ok(TransportMode::Pedestrian),
            _ => Err(ParseTransportModeError(s.to_string())),
        }
    }
}
