use serde::Serialize;

use crate::{closure::Directionality, geopoint::GeoPoint};

/// Where along a segment the arrows of a bidirectional closure sit, so the
/// two opposed glyphs don't overlap.
const BIDIRECTIONAL_FRACTIONS: (f64, f64) = (0.35, 0.65);

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DirectionArrow {
    pub position: GeoPoint,
    /// Degrees clockwise from north.
    pub bearing: f64,
}

/// Arrow glyphs for a closed line: one per segment pointing along the line
/// for one-way closures, two opposed ones for bidirectional closures.
/// Degenerate segments get no arrow.
pub fn direction_arrows(
    vertices: &[GeoPoint],
    directionality: Directionality,
) -> Vec<DirectionArrow> {
    let mut arrows = Vec::with_capacity(vertices.len() * 2);

    for segment in vertices.windows(2) {
        let (from, to) = (&segment[0], &segment[1]);
        if from == to {
            continue;
        }

        let bearing = from.bearing_to(to);

        match directionality {
            Directionality::OneWay => arrows.push(DirectionArrow {
                position: from.interpolate(to, 0.5),
                bearing,
            }),
            Directionality::Bidirectional => {
                let (first, second) = BIDIRECTIONAL_FRACTIONS;
                arrows.push(DirectionArrow {
                    position: from.interpolate(to, first),
                    bearing,
                });
                arrows.push(DirectionArrow {
                    position: from.interpolate(to, second),
                    bearing: (bearing + 180.0) % 360.0,
                });
            }
        }
    }

    arrows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_way_points_along_segment() {
        let vertices = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0)];
        let arrows = direction_arrows(&vertices, Directionality::OneWay);

        assert_eq!(arrows.len(), 2);
        assert!((arrows[0].bearing - 90.0).abs() < 1e-9);
        assert_eq!(arrows[0].position, GeoPoint::new(0.0, 0.5));
        assert!(arrows[1].bearing.abs() < 1e-9);
    }

    #[test]
    fn test_bidirectional_has_two_opposed_arrows() {
        let vertices = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
        let arrows = direction_arrows(&vertices, Directionality::Bidirectional);

        assert_eq!(arrows.len(), 2);
        assert!((arrows[0].bearing - 90.0).abs() < 1e-9);
        assert!((arrows[1].bearing - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_skips_degenerate_segments() {
        let vertices = [GeoPoint::new(1.0, 1.0), GeoPoint::new(1.0, 1.0)];
        assert!(direction_arrows(&vertices, Directionality::OneWay).is_empty());
        assert!(direction_arrows(&vertices[..1], Directionality::OneWay).is_empty());
    }
}
