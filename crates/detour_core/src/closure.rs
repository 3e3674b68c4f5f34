use jiff::{SignedDuration, Timestamp};
use rstar::AABB;
use serde::{Deserialize, Serialize};

use crate::{closure_category::ClosureCategory, geopoint::GeoPoint};

pub type ClosureId = i64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureStatus {
    Active,
    Inactive,
    Expired,
    Cancelled,
    Planned,
}

impl ClosureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureStatus::Active => "active",
            ClosureStatus::Inactive => "inactive",
            ClosureStatus::Expired => "expired",
            ClosureStatus::Cancelled => "cancelled",
            ClosureStatus::Planned => "planned",
        }
    }
}

impl std::fmt::Display for ClosureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GeoJSON geometry of a closure, positions are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum ClosureGeometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
}

impl ClosureGeometry {
    pub fn positions(&self) -> &[[f64; 2]] {
        match self {
            ClosureGeometry::Point(position) => std::slice::from_ref(position),
            ClosureGeometry::LineString(positions) => positions,
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.positions().iter().copied().map(GeoPoint::from_lon_lat)
    }

    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_points(self.positions())
    }

    pub fn is_point(&self) -> bool {
        matches!(self, ClosureGeometry::Point(_))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directionality {
    Bidirectional,
    OneWay,
}

/// A reported road obstruction, as served by the closures API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    pub id: ClosureId,
    pub geometry: ClosureGeometry,
    pub description: String,
    #[serde(rename = "closure_type")]
    pub category: ClosureCategory,
    pub status: ClosureStatus,
    pub start_time: Timestamp,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub confidence_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bidirectional: Option<bool>,
    pub submitter_id: i64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openlr_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Closure {
    pub fn vertices(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.geometry.vertices()
    }

    pub fn is_active(&self) -> bool {
        self.status == ClosureStatus::Active
    }

    /// `None` for point closures. Line closures without a flag are treated as
    /// bidirectional, the backend's default.
    pub fn directionality(&self) -> Option<Directionality> {
        match self.geometry {
            ClosureGeometry::Point(_) => None,
            ClosureGeometry::LineString(_) => Some(if self.is_bidirectional.unwrap_or(true) {
                Directionality::Bidirectional
            } else {
                Directionality::OneWay
            }),
        }
    }

    /// `None` for open ended closures.
    pub fn duration(&self) -> Option<SignedDuration> {
        self.end_time
            .map(|end_time| end_time.duration_since(self.start_time))
    }

    pub fn duration_hours(&self) -> Option<f64> {
        self.duration()
            .map(|duration| duration.as_secs_f64() / 3600.0)
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.end_time.is_some_and(|end_time| end_time < now)
    }

    /// Status once the time window is taken into account. Stored statuses lag
    /// behind the clock: an active closure past its end is expired and a
    /// planned closure past its start is in effect.
    pub fn status_at(&self, now: Timestamp) -> ClosureStatus {
        match self.status {
            ClosureStatus::Active if self.is_expired_at(now) => ClosureStatus::Expired,
            ClosureStatus::Planned if self.start_time <= now => {
                if self.is_expired_at(now) {
                    ClosureStatus::Expired
                } else {
                    ClosureStatus::Active
                }
            }
            status => status,
        }
    }

    /// Active and inside its time window.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.status == ClosureStatus::Active
            && self.start_time <= now
            && !self.is_expired_at(now)
    }
}
