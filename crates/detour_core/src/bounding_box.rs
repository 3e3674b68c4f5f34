use std::{fmt::Display, str::FromStr};

use rstar::AABB;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geopoint::GeoPoint;

/// Padding added on every side of a route's bounding box, about one mile.
/// Closures next to, but not strictly between, the endpoints still count.
pub const BOUNDING_BOX_BUFFER_DEGREES: f64 = 0.0145;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseBoundingBoxError {
    #[error("expected `min_lon,min_lat,max_lon,max_lat`, got {0} values")]
    Arity(usize),
    #[error("invalid number {0:?}")]
    Number(String),
    #[error("minimum {min} is greater than maximum {max}")]
    Inverted { min: f64, max: f64 },
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Query region for a route between `a` and `b`.
    pub fn around(a: &GeoPoint, b: &GeoPoint) -> Self {
        Self::around_with_buffer(a, b, BOUNDING_BOX_BUFFER_DEGREES)
    }

    pub fn around_with_buffer(a: &GeoPoint, b: &GeoPoint, buffer: f64) -> Self {
        Self {
            north: a.lat.max(b.lat) + buffer,
            south: a.lat.min(b.lat) - buffer,
            east: a.lng.max(b.lng) + buffer,
            west: a.lng.min(b.lng) - buffer,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Envelope in `[lng, lat]` order, matching [`GeoPoint`]'s r-tree envelope.
    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.west, self.south], [self.east, self.north])
    }

    /// The `bbox` query parameter of the closures API: `west,south,east,north`.
    pub fn to_query_param(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_param())
    }
}

impl FromStr for BoundingBox {
    type Err = ParseBoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|value| {
                let value = value.trim();
                value
                    .parse::<f64>()
                    .map_err(|_| ParseBoundingBoxError::Number(value.to_string()))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let [west, south, east, north] = values[..] else {
            return Err(ParseBoundingBoxError::Arity(values.len()));
        };

        if west > east {
            return Err(ParseBoundingBoxError::Inverted {
                min: west,
                max: east,
            });
        }
        if south > north {
            return Err(ParseBoundingBoxError::Inverted {
                min: south,
                max: north,
            });
        }

        Ok(BoundingBox {
            north,
            south,
            east,
            west,
        })
    }
}
