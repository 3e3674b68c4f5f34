use detour_core::{bounding_box::BoundingBox, closure::ClosureStatus, geopoint::GeoPoint};

/// `LAT,LNG`
pub fn parse_geo_point(input: &str) -> Result<GeoPoint, String> {
    input.parse().map_err(|err| format!("{err}"))
}

/// `WEST,SOUTH,EAST,NORTH`
pub fn parse_bbox(input: &str) -> Result<BoundingBox, String> {
    input.parse().map_err(|err| format!("{err}"))
}

pub fn parse_status(input: &str) -> Result<ClosureStatus, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "active" => Ok(ClosureStatus::Active),
        "inactive" => Ok(ClosureStatus::Inactive),
        "expired" => Ok(ClosureStatus::Expired),
        "cancelled" | "canceled" => Ok(ClosureStatus::Cancelled),
        "planned" => Ok(ClosureStatus::Planned),
        _ => Err(format!(
            "Invalid status {input:?}, expected active, inactive, expired, cancelled or planned"
        )),
    }
}
