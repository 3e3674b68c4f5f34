use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::transport_mode::TransportMode;

const ALL_MODES: &[TransportMode] = &TransportMode::ALL;
const AUTO_ONLY: &[TransportMode] = &[TransportMode::Auto];
const BICYCLE_ONLY: &[TransportMode] = &[TransportMode::Bicycle];
const PEDESTRIAN_ONLY: &[TransportMode] = &[TransportMode::Pedestrian];
const NON_MOTORIZED: &[TransportMode] = &[TransportMode::Bicycle, TransportMode::Pedestrian];

/// What caused a closure. Categories the client doesn't know are kept
/// verbatim in [`ClosureCategory::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClosureCategory {
    Construction,
    Accident,
    Event,
    Maintenance,
    Weather,
    Emergency,
    Other,
    BridgeClosure,
    LaneClosure,
    SidewalkRepair,
    SidewalkClosure,
    CrosswalkClosure,
    BikeLaneClosure,
    BikePathClosure,
    TrailClosure,
    Unknown(String),
}

impl ClosureCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ClosureCategory::Construction => "construction",
            ClosureCategory::Accident => "accident",
            ClosureCategory::Event => "event",
            ClosureCategory::Maintenance => "maintenance",
            ClosureCategory::Weather => "weather",
            ClosureCategory::Emergency => "emergency",
            ClosureCategory::Other => "other",
            ClosureCategory::BridgeClosure => "bridge_closure",
            ClosureCategory::LaneClosure => "lane_closure",
            ClosureCategory::SidewalkRepair => "sidewalk_repair",
            ClosureCategory::SidewalkClosure => "sidewalk_closure",
            ClosureCategory::CrosswalkClosure => "crosswalk_closure",
            ClosureCategory::BikeLaneClosure => "bike_lane_closure",
            ClosureCategory::BikePathClosure => "bike_path_closure",
            ClosureCategory::TrailClosure => "trail_closure",
            ClosureCategory::Unknown(name) => name,
        }
    }

    /// Entry of the category/mode table, `None` for unmapped categories.
    pub fn mapped_modes(&self) -> Option<&'static [TransportMode]> {
        match self {
            ClosureCategory::Construction
            | ClosureCategory::Accident
            | ClosureCategory::Event
            | ClosureCategory::Maintenance
            | ClosureCategory::Weather
            | ClosureCategory::Emergency
            | ClosureCategory::Other
            | ClosureCategory::BridgeClosure => Some(ALL_MODES),
            ClosureCategory::LaneClosure => Some(AUTO_ONLY),
            ClosureCategory::SidewalkRepair
            | ClosureCategory::SidewalkClosure
            | ClosureCategory::CrosswalkClosure => Some(PEDESTRIAN_ONLY),
            ClosureCategory::BikeLaneClosure | ClosureCategory::BikePathClosure => {
                Some(BICYCLE_ONLY)
            }
            ClosureCategory::TrailClosure => Some(NON_MOTORIZED),
            ClosureCategory::Unknown(_) => None,
        }
    }

    /// Modes obstructed by this category. Unmapped categories obstruct every mode.
    pub fn affected_modes(&self) -> &'static [TransportMode] {
        self.mapped_modes().unwrap_or(ALL_MODES)
    }

    pub fn affects(&self, mode: TransportMode) -> bool {
        self.affected_modes().contains(&mode)
    }
}

impl From<String> for ClosureCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "construction" => ClosureCategory::Construction,
            "accident" => ClosureCategory::Accident,
            "event" => ClosureCategory::Event,
            "maintenance" => ClosureCategory::Maintenance,
            "weather" => ClosureCategory::Weather,
            "emergency" => ClosureCategory::Emergency,
            "other" => ClosureCategory::Other,
            "bridge_closure" => ClosureCategory::BridgeClosure,
            "lane_closure" => ClosureCategory::LaneClosure,
            "sidewalk_repair" => ClosureCategory::SidewalkRepair,
            "sidewalk_closure" => ClosureCategory::SidewalkClosure,
            "crosswalk_closure" => ClosureCategory::CrosswalkClosure,
            "bike_lane_closure" => ClosureCategory::BikeLaneClosure,
            "bike_path_closure" => ClosureCategory::BikePathClosure,
            "trail_closure" => ClosureCategory::TrailClosure,
            _ => ClosureCategory::Unknown(value),
        }
    }
}

impl From<&str> for ClosureCategory {
    fn from(value: &str) -> Self {
        ClosureCategory::from(value.to_string())
    }
}

impl From<ClosureCategory> for String {
    fn from(value: ClosureCategory) -> Self {
        match value {
            ClosureCategory::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for ClosureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_category_affects_every_mode() {
        let category = ClosureCategory::from("sinkhole");
        assert_eq!(category, ClosureCategory::Unknown("sinkhole".to_string()));
        assert_eq!(category.mapped_modes(), None);

        for mode in TransportMode::ALL {
            assert!(category.affects(mode));
        }
    }

    #[test]
    fn test_mode_specific_categories() {
        assert!(ClosureCategory::SidewalkRepair.affects(TransportMode::Pedestrian));
        assert!(!ClosureCategory::SidewalkRepair.affects(TransportMode::Auto));
        assert!(!ClosureCategory::SidewalkRepair.affects(TransportMode::Bicycle));

        assert!(ClosureCategory::BikeLaneClosure.affects(TransportMode::Bicycle));
        assert!(!ClosureCategory::BikeLaneClosure.affects(TransportMode::Pedestrian));

        assert!(ClosureCategory::LaneClosure.affects(TransportMode::Auto));
        assert!(!ClosureCategory::LaneClosure.affects(TransportMode::Pedestrian));

        assert!(!ClosureCategory::TrailClosure.affects(TransportMode::Auto));
        assert!(ClosureCategory::TrailClosure.affects(TransportMode::Bicycle));

        for mode in TransportMode::ALL {
            assert!(ClosureCategory::BridgeClosure.affects(mode));
            assert!(ClosureCategory::Construction.affects(mode));
        }
    }

    #[test]
    fn test_string_round_trip() {
        for name in ["construction", "bike_path_closure", "road_flooding"] {
            let category = ClosureCategory::from(name);
            assert_eq!(category.to_string(), name);
            assert_eq!(String::from(category), name);
        }
    }
}
