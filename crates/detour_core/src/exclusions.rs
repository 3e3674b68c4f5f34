use crate::{closure::Closure, geopoint::GeoPoint};

/// Valhalla accepts at most this many `exclude_locations` per request.
pub const MAX_EXCLUDED_LOCATIONS: usize = 49;

/// Flattens closure geometries into avoidance points, in closure then vertex
/// order. Points past [`MAX_EXCLUDED_LOCATIONS`] are dropped.
pub fn exclusion_points<'a, I>(closures: I) -> Vec<GeoPoint>
where
    I: IntoIterator<Item = &'a Closure>,
{
    closures
        .into_iter()
        .flat_map(Closure::vertices)
        .take(MAX_EXCLUDED_LOCATIONS)
        .collect()
}
