#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Polygon, ring and coordinate types for administrative boundaries.
//!
//! These types are the in-memory form of parsed WKT geometry. They carry
//! no projection information: every coordinate lives in the single planar
//! reference system of the source data. Screen-space counterparts
//! ([`ScreenPoint`], [`ScreenPolygon`]) are produced by the projector.

use serde::{Deserialize, Serialize};

/// Minimum number of points a ring needs to enclose an area.
pub const MIN_FILLED_RING_POINTS: usize = 3;

/// A planar coordinate. Both ordinates are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Easting / horizontal ordinate.
    pub x: f64,
    /// Northing / vertical ordinate (increases upward).
    pub y: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An ordered sequence of coordinates.
///
/// The closing point is kept exactly as given: a ring read from
/// `(0 0, 1 0, 1 1, 0 0)` has four points, one from `(0 0, 1 0, 1 1)` has
/// three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Coordinate>);

impl Ring {
    #[must_use]
    pub const fn new(coords: Vec<Coordinate>) -> Self {
        Self(coords)
    }

    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the ring has too few points to be drawn as a
    /// filled area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.0.len() < MIN_FILLED_RING_POINTS
    }
}

impl From<Vec<Coordinate>> for Ring {
    fn from(coords: Vec<Coordinate>) -> Self {
        Self(coords)
    }
}

/// A polygon: `rings[0]` is the exterior boundary, the rest are holes.
///
/// A polygon with no rings is the empty polygon (e.g. a `MULTIPOLYGON`
/// member written as `EMPTY`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub const fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// The exterior ring, if the polygon has any rings at all.
    #[must_use]
    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    /// Hole rings (everything after the exterior).
    #[must_use]
    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// A list of independent polygons.
///
/// Parsing a `POLYGON` yields a one-element `MultiPolygon`, so every
/// consumer handles a single shape type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    #[must_use]
    pub const fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends every polygon of `other`. No union or deduplication is
    /// performed.
    pub fn append(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Total number of coordinates across all rings.
    #[must_use]
    pub fn coordinate_count(&self) -> usize {
        self.0
            .iter()
            .flat_map(|p| p.rings.iter())
            .map(Ring::len)
            .sum()
    }
}

impl From<Vec<Polygon>> for MultiPolygon {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }
}

impl<'a> IntoIterator for &'a MultiPolygon {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MultiPolygon {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Axis-aligned bounding box in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// A zero-extent box around a single coordinate.
    #[must_use]
    pub const fn from_coordinate(c: Coordinate) -> Self {
        Self {
            min_x: c.x,
            min_y: c.y,
            max_x: c.x,
            max_y: c.y,
        }
    }

    /// Grows the box to include `c`.
    pub fn include(&mut self, c: Coordinate) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    /// The smallest box containing both `self` and `other`.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A projected point in pixel space (Y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shifts the point by a panel origin.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A polygon after projection: exterior plus hole rings, in pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPolygon {
    pub exterior: Vec<ScreenPoint>,
    pub holes: Vec<Vec<ScreenPoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ])
    }

    #[test]
    fn degenerate_rings() {
        assert!(Ring::default().is_degenerate());
        assert!(Ring::new(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]).is_degenerate());
        assert!(!square().is_degenerate());
    }

    #[test]
    fn exterior_and_holes() {
        let poly = Polygon::new(vec![square(), square()]);
        assert_eq!(poly.exterior().map(Ring::len), Some(5));
        assert_eq!(poly.holes().len(), 1);

        let empty = Polygon::default();
        assert!(empty.exterior().is_none());
        assert!(empty.holes().is_empty());
    }

    #[test]
    fn append_concatenates_without_dedup() {
        let mut a = MultiPolygon::new(vec![Polygon::new(vec![square()])]);
        let b = a.clone();
        a.append(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.coordinate_count(), 10);
    }

    #[test]
    fn bounds_grow_and_merge() {
        let mut b = Bounds::from_coordinate(Coordinate::new(2.0, 3.0));
        b.include(Coordinate::new(-1.0, 5.0));
        assert!((b.width() - 3.0).abs() < f64::EPSILON);
        assert!((b.height() - 2.0).abs() < f64::EPSILON);

        let other = Bounds::from_coordinate(Coordinate::new(10.0, 0.0));
        let merged = b.merged(other);
        assert!((merged.max_x - 10.0).abs() < f64::EPSILON);
        assert!(merged.min_y.abs() < f64::EPSILON);
    }
}
