//! Conversions into [`geo`] types.
//!
//! The local model keeps rings exactly as parsed. `geo` closes every ring
//! of a polygon on construction, so converted rings may gain a closing
//! point; that is fine for containment tests, which are what these
//! conversions are used for.

use election_map_geometry_models::{MultiPolygon, Polygon, Ring, ScreenPoint, ScreenPolygon};
use geo::{Coord, LineString};

fn ring_to_line_string(ring: &Ring) -> LineString<f64> {
    LineString::new(
        ring.coords()
            .iter()
            .map(|c| Coord { x: c.x, y: c.y })
            .collect(),
    )
}

fn screen_ring_to_line_string(points: &[ScreenPoint]) -> LineString<f64> {
    LineString::new(points.iter().map(|p| Coord { x: p.x, y: p.y }).collect())
}

/// Converts a model polygon. A polygon with no rings becomes a `geo`
/// polygon with an empty exterior.
#[must_use]
pub fn to_geo_polygon(polygon: &Polygon) -> geo::Polygon<f64> {
    let exterior = polygon
        .exterior()
        .map_or_else(|| LineString::new(Vec::new()), ring_to_line_string);
    let interiors = polygon.holes().iter().map(ring_to_line_string).collect();
    geo::Polygon::new(exterior, interiors)
}

#[must_use]
pub fn to_geo_multipolygon(polygons: &MultiPolygon) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon::new(polygons.iter().map(to_geo_polygon).collect())
}

/// Converts a projected polygon, keeping its holes as interiors.
#[must_use]
pub fn screen_to_geo_polygon(polygon: &ScreenPolygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        screen_ring_to_line_string(&polygon.exterior),
        polygon
            .holes
            .iter()
            .map(|hole| screen_ring_to_line_string(hole))
            .collect(),
    )
}

/// Converts a flat list of screen points (one ring, no holes).
#[must_use]
pub fn screen_ring_to_geo_polygon(points: &[ScreenPoint]) -> geo::Polygon<f64> {
    geo::Polygon::new(screen_ring_to_line_string(points), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_wkt;
    use geo::Contains;

    #[test]
    fn converted_polygon_respects_holes() {
        let mp = parse_wkt("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))")
            .unwrap();
        let geo_mp = to_geo_multipolygon(&mp);

        assert_eq!(geo_mp.0.len(), 1);
        assert!(geo_mp.contains(&geo::Point::new(2.0, 2.0)));
        assert!(!geo_mp.contains(&geo::Point::new(5.0, 5.0)));
    }

    #[test]
    fn unclosed_ring_is_closed_by_geo() {
        let mp = parse_wkt("POLYGON((0 0, 4 0, 4 4))").unwrap();
        let poly = to_geo_polygon(&mp.polygons()[0]);
        assert_eq!(poly.exterior().0.len(), 4);
        assert!(poly.contains(&geo::Point::new(3.0, 1.0)));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        let poly = to_geo_polygon(&Polygon::default());
        assert!(!poly.contains(&geo::Point::new(0.0, 0.0)));
    }

    #[test]
    fn screen_polygon_conversion() {
        let screen = ScreenPolygon {
            exterior: vec![
                ScreenPoint::new(0.0, 0.0),
                ScreenPoint::new(100.0, 0.0),
                ScreenPoint::new(100.0, 100.0),
                ScreenPoint::new(0.0, 100.0),
            ],
            holes: vec![vec![
                ScreenPoint::new(40.0, 40.0),
                ScreenPoint::new(60.0, 40.0),
                ScreenPoint::new(60.0, 60.0),
            ]],
        };
        let poly = screen_to_geo_polygon(&screen);
        assert!(poly.contains(&geo::Point::new(10.0, 90.0)));
        assert!(!poly.contains(&geo::Point::new(58.0, 45.0)));

        let flat = screen_ring_to_geo_polygon(&screen.exterior);
        assert!(flat.contains(&geo::Point::new(58.0, 45.0)));
    }
}
