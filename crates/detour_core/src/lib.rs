pub mod arrows;
pub mod bounding_box;
pub mod closure;
pub mod closure_category;
pub mod closure_draft;
pub mod exclusions;
pub mod geopoint;
pub mod polyline;
pub mod relevance;
pub mod route;
pub mod transport_mode;
