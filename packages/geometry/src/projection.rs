//! Bounding boxes and the source-to-screen affine transform.
//!
//! The projector scales uniformly (the smaller of the two axis scales wins)
//! so shapes are never stretched, and flips the vertical axis because
//! source Y grows upward while pixel Y grows downward.

use election_map_geometry_models::{
    Bounds, Coordinate, MultiPolygon, Polygon, Ring, ScreenPoint, ScreenPolygon,
};

use crate::GeometryError;

/// Extent substituted for a zero-width or zero-height box (a single point,
/// a vertical line) so the scale stays finite.
const DEGENERATE_EXTENT: f64 = 1.0;

/// Computes the bounding box of every polygon's exterior ring.
///
/// Hole rings are ignored: they lie inside their exterior, so they can
/// never grow the box.
///
/// # Errors
///
/// Returns [`GeometryError::NoGeometry`] if no exterior ring has a
/// coordinate.
pub fn bounds(polygons: &MultiPolygon) -> Result<Bounds, GeometryError> {
    polygons
        .iter()
        .filter_map(Polygon::exterior)
        .flat_map(|ring| ring.coords().iter().copied())
        .fold(None, |acc: Option<Bounds>, c| {
            Some(acc.map_or_else(
                || Bounds::from_coordinate(c),
                |mut b| {
                    b.include(c);
                    b
                },
            ))
        })
        .ok_or(GeometryError::NoGeometry)
}

/// A target pixel rectangle with uniform padding on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    padding: f64,
}

impl Viewport {
    /// Creates a viewport.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidViewport`] if any dimension is not
    /// finite, the padding is negative, or the padding leaves no drawable
    /// area on either axis.
    pub fn new(width: f64, height: f64, padding: f64) -> Result<Self, GeometryError> {
        let finite = width.is_finite() && height.is_finite() && padding.is_finite();
        if !finite || padding < 0.0 || width - 2.0 * padding <= 0.0 || height - 2.0 * padding <= 0.0
        {
            return Err(GeometryError::InvalidViewport {
                width,
                height,
                padding,
            });
        }

        Ok(Self {
            width,
            height,
            padding,
        })
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub const fn padding(&self) -> f64 {
        self.padding
    }
}

/// Affine map from source coordinates into a [`Viewport`].
///
/// Offsets and extents are computed on halved coordinates, so boxes
/// spanning most of the `f64` range still get a finite scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    half_min_x: f64,
    half_min_y: f64,
    /// Pixels per half source unit.
    half_scale: f64,
    height: f64,
    padding: f64,
}

impl Projector {
    /// Builds the transform that fits `bounds` inside `viewport` without
    /// distortion.
    #[must_use]
    pub fn new(bounds: Bounds, viewport: Viewport) -> Self {
        let half_min_x = bounds.min_x * 0.5;
        let half_min_y = bounds.min_y * 0.5;
        let half_dx = non_degenerate(bounds.max_x.mul_add(0.5, -half_min_x));
        let half_dy = non_degenerate(bounds.max_y.mul_add(0.5, -half_min_y));
        let inner_w = 2.0f64.mul_add(-viewport.padding, viewport.width);
        let inner_h = 2.0f64.mul_add(-viewport.padding, viewport.height);

        Self {
            half_min_x,
            half_min_y,
            half_scale: (inner_w / half_dx).min(inner_h / half_dy),
            height: viewport.height,
            padding: viewport.padding,
        }
    }

    /// Bounds the polygons and builds a projector for them in one step.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoGeometry`] if the polygons have no
    /// exterior coordinates.
    pub fn fit(polygons: &MultiPolygon, viewport: Viewport) -> Result<Self, GeometryError> {
        Ok(Self::new(bounds(polygons)?, viewport))
    }

    /// Pixels per source unit.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.half_scale * 0.5
    }

    /// Projects a single coordinate.
    #[must_use]
    pub fn project(&self, c: Coordinate) -> ScreenPoint {
        ScreenPoint::new(
            c.x.mul_add(0.5, -self.half_min_x)
                .mul_add(self.half_scale, self.padding),
            self.height
                - c.y
                    .mul_add(0.5, -self.half_min_y)
                    .mul_add(self.half_scale, self.padding),
        )
    }

    #[must_use]
    pub fn project_ring(&self, ring: &Ring) -> Vec<ScreenPoint> {
        ring.coords().iter().map(|&c| self.project(c)).collect()
    }

    /// Projects the exterior and every hole. An empty polygon projects to
    /// an empty exterior.
    #[must_use]
    pub fn project_polygon(&self, polygon: &Polygon) -> ScreenPolygon {
        ScreenPolygon {
            exterior: polygon
                .exterior()
                .map(|ring| self.project_ring(ring))
                .unwrap_or_default(),
            holes: polygon
                .holes()
                .iter()
                .map(|ring| self.project_ring(ring))
                .collect(),
        }
    }

    #[must_use]
    pub fn project_multipolygon(&self, polygons: &MultiPolygon) -> Vec<ScreenPolygon> {
        polygons.iter().map(|p| self.project_polygon(p)).collect()
    }
}

/// Takes and returns a half extent.
fn non_degenerate(half_extent: f64) -> f64 {
    if half_extent * 2.0 > f64::EPSILON {
        half_extent
    } else {
        DEGENERATE_EXTENT * 0.5
    }
}
