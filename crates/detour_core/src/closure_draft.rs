use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    closure::{ClosureGeometry, ClosureStatus},
    closure_category::ClosureCategory,
};

pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const SOURCE_MAX_CHARS: usize = 100;
pub const CONFIDENCE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Positions are stored with 5 decimals, about one meter.
const COORDINATE_SCALE: f64 = 100_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum ClosureValidationError {
    #[error("description cannot be empty or only whitespace")]
    EmptyDescription,
    #[error("description must be between 10 and 1000 characters, got {0}")]
    DescriptionLength(usize),
    #[error("LineString must have at least 2 coordinates, got {0}")]
    TooFewCoordinates(usize),
    #[error("longitude {0} is out of range [-180, 180]")]
    Longitude(f64),
    #[error("latitude {0} is out of range [-90, 90]")]
    Latitude(f64),
    #[error("end_time must be after start_time")]
    EndBeforeStart,
    #[error("confidence level must be between 1 and 10, got {0}")]
    Confidence(u8),
    #[error("source must be at most 100 characters, got {0}")]
    SourceLength(usize),
}

/// A closure about to be submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureDraft {
    pub geometry: ClosureGeometry,
    pub description: String,
    #[serde(rename = "closure_type")]
    pub category: ClosureCategory,
    pub start_time: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bidirectional: Option<bool>,
}

/// Partial edit of an existing closure, `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosureUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<ClosureGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "closure_type", skip_serializing_if = "Option::is_none")]
    pub category: Option<ClosureCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ClosureStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
}

impl ClosureDraft {
    /// Checks the draft against the API's constraints and normalizes it:
    /// trimmed description, rounded positions and no directionality on points.
    pub fn validate(mut self) -> Result<ClosureDraft, ClosureValidationError> {
        self.description = validate_description(&self.description)?;
        self.geometry = validate_geometry(self.geometry)?;
        validate_time_window(self.start_time, self.end_time)?;

        if let Some(confidence) = self.confidence_level {
            validate_confidence(confidence)?;
        }
        if let Some(source) = &self.source {
            validate_source(source)?;
        }
        if self.geometry.is_point() {
            self.is_bidirectional = None;
        }

        Ok(self)
    }
}

impl ClosureUpdate {
    pub fn status(status: ClosureStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn validate(mut self) -> Result<ClosureUpdate, ClosureValidationError> {
        if let Some(description) = &self.description {
            self.description = Some(validate_description(description)?);
        }
        if let Some(geometry) = self.geometry.take() {
            self.geometry = Some(validate_geometry(geometry)?);
        }
        if let Some(start_time) = self.start_time {
            validate_time_window(start_time, self.end_time)?;
        }
        if let Some(confidence) = self.confidence_level {
            validate_confidence(confidence)?;
        }
        if let Some(source) = &self.source {
            validate_source(source)?;
        }

        Ok(self)
    }
}

fn validate_description(description: &str) -> Result<String, ClosureValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ClosureValidationError::EmptyDescription);
    }

    let length = trimmed.chars().count();
    if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&length) {
        return Err(ClosureValidationError::DescriptionLength(length));
    }

    Ok(trimmed.to_string())
}

fn validate_geometry(geometry: ClosureGeometry) -> Result<ClosureGeometry, ClosureValidationError> {
    if let ClosureGeometry::LineString(positions) = &geometry {
        if positions.len() < 2 {
            return Err(ClosureValidationError::TooFewCoordinates(positions.len()));
        }
    }

    for [lon, lat] in geometry.positions() {
        if !(-180.0..=180.0).contains(lon) {
            return Err(ClosureValidationError::Longitude(*lon));
        }
        if !(-90.0..=90.0).contains(lat) {
            return Err(ClosureValidationError::Latitude(*lat));
        }
    }

    Ok(match geometry {
        ClosureGeometry::Point(position) => ClosureGeometry::Point(round_position(position)),
        ClosureGeometry::LineString(positions) => {
            ClosureGeometry::LineString(positions.into_iter().map(round_position).collect())
        }
    })
}

fn validate_time_window(
    start_time: Timestamp,
    end_time: Option<Timestamp>,
) -> Result<(), ClosureValidationError> {
    match end_time {
        Some(end_time) if end_time <= start_time => Err(ClosureValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

fn validate_confidence(confidence: u8) -> Result<(), ClosureValidationError> {
    if CONFIDENCE_RANGE.contains(&confidence) {
        Ok(())
    } else {
        Err(ClosureValidationError::Confidence(confidence))
    }
}

fn validate_source(source: &str) -> Result<(), ClosureValidationError> {
    let length = source.chars().count();
    if length > SOURCE_MAX_CHARS {
        return Err(ClosureValidationError::SourceLength(length));
    }
    Ok(())
}

fn round_position([lon, lat]: [f64; 2]) -> [f64; 2] {
    [
        (lon * COORDINATE_SCALE).round() / COORDINATE_SCALE,
        (lat * COORDINATE_SCALE).round() / COORDINATE_SCALE,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(geometry: ClosureGeometry) -> ClosureDraft {
        ClosureDraft {
            geometry,
            description: "  Water main repair blocking eastbound traffic ".to_string(),
            category: ClosureCategory::Construction,
            start_time: "2025-06-01T08:00:00Z".parse().unwrap(),
            end_time: Some("2025-06-01T18:00:00Z".parse().unwrap()),
            source: Some("City of Chicago".to_string()),
            confidence_level: Some(9),
            is_bidirectional: Some(true),
        }
    }

    #[test]
    fn test_validate_normalizes_draft() {
        let validated = draft(ClosureGeometry::LineString(vec![
            [-87.629801234, 41.878104321],
            [-87.62900, 41.87850],
        ]))
        .validate()
        .unwrap();

        assert_eq!(
            validated.description,
            "Water main repair blocking eastbound traffic"
        );
        assert_eq!(
            validated.geometry,
            ClosureGeometry::LineString(vec![[-87.6298, 41.8781], [-87.629, 41.8785]])
        );
        assert_eq!(validated.is_bidirectional, Some(true));
    }

    #[test]
    fn test_point_drops_directionality() {
        let validated = draft(ClosureGeometry::Point([-87.6298, 41.8781]))
            .validate()
            .unwrap();
        assert_eq!(validated.is_bidirectional, None);
    }

    #[test]
    fn test_validation_errors() {
        let mut short = draft(ClosureGeometry::Point([0.0, 0.0]));
        short.description = "pothole".to_string();
        assert_eq!(
            short.validate(),
            Err(ClosureValidationError::DescriptionLength(7))
        );

        let mut blank = draft(ClosureGeometry::Point([0.0, 0.0]));
        blank.description = "   ".to_string();
        assert_eq!(blank.validate(), Err(ClosureValidationError::EmptyDescription));

        assert_eq!(
            draft(ClosureGeometry::LineString(vec![[0.0, 0.0]])).validate(),
            Err(ClosureValidationError::TooFewCoordinates(1))
        );
        assert_eq!(
            draft(ClosureGeometry::Point([181.0, 0.0])).validate(),
            Err(ClosureValidationError::Longitude(181.0))
        );
        assert_eq!(
            draft(ClosureGeometry::Point([0.0, -91.0])).validate(),
            Err(ClosureValidationError::Latitude(-91.0))
        );

        let mut inverted = draft(ClosureGeometry::Point([0.0, 0.0]));
        inverted.end_time = Some(inverted.start_time);
        assert_eq!(inverted.validate(), Err(ClosureValidationError::EndBeforeStart));

        let mut unsure = draft(ClosureGeometry::Point([0.0, 0.0]));
        unsure.confidence_level = Some(11);
        assert_eq!(unsure.validate(), Err(ClosureValidationError::Confidence(11)));
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ClosureUpdate::status(ClosureStatus::Cancelled);
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"status":"cancelled"}"#
        );
    }
}
