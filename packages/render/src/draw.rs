//! Projecting administrative units into a panel and drawing them.

use std::cmp::Ordering;

use election_map_geometry::{GeometryError, Projector, Viewport};
use election_map_geometry_models::{
    MIN_FILLED_RING_POINTS, MultiPolygon, ScreenPoint, ScreenPolygon,
};
use election_map_region_models::{AdministrativeLevel, AdministrativeUnit};

use crate::{ColorScheme, RenderSurface, Selection};

/// A rectangle of the canvas with its own projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Left edge on the canvas, in pixels.
    pub origin_x: f64,
    /// Top edge on the canvas, in pixels.
    pub origin_y: f64,
    pub viewport: Viewport,
}

impl Panel {
    #[must_use]
    pub const fn new(origin_x: f64, origin_y: f64, viewport: Viewport) -> Self {
        Self {
            origin_x,
            origin_y,
            viewport,
        }
    }

    /// A panel covering the whole canvas.
    #[must_use]
    pub const fn full(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport)
    }

    fn place(&self, points: &[ScreenPoint]) -> Vec<ScreenPoint> {
        points
            .iter()
            .map(|p| p.offset(self.origin_x, self.origin_y))
            .collect()
    }
}

/// Draws `units` into `panel`, fitted together under one projection.
///
/// District units are filled by region, municipality units with the
/// municipality fill. Every exterior ring gets a click handler selecting
/// its unit. Holes are painted over in the background color and carry no
/// handler. Rings with fewer than three points are skipped.
///
/// Polygons with holes are drawn first, largest first, each followed by its
/// hole overlays. The remaining polygons follow in unit order, so a unit
/// sitting in another unit's hole stays visible and clickable.
///
/// Returns the number of shapes drawn.
///
/// # Errors
///
/// Returns [`GeometryError::NoGeometry`] if no unit has an exterior
/// coordinate. Nothing is drawn in that case.
pub fn draw_units<S: RenderSurface + ?Sized>(
    surface: &mut S,
    level: AdministrativeLevel,
    units: &[AdministrativeUnit],
    panel: &Panel,
    colors: &ColorScheme,
) -> Result<usize, GeometryError> {
    let combined = MultiPolygon::new(
        units
            .iter()
            .flat_map(|unit| unit.polygons.iter().cloned())
            .collect(),
    );
    let projector = Projector::fit(&combined, panel.viewport)?;

    let mut queue: Vec<(&AdministrativeUnit, ScreenPolygon)> = units
        .iter()
        .flat_map(|unit| {
            unit.polygons
                .iter()
                .map(move |polygon| (unit, projector.project_polygon(polygon)))
        })
        .filter(|(_, screen)| screen.exterior.len() >= MIN_FILLED_RING_POINTS)
        .collect();

    // Stable, so hole-free polygons keep their unit order.
    queue.sort_by(|(_, a), (_, b)| {
        has_holes(b)
            .cmp(&has_holes(a))
            .then_with(|| {
                if has_holes(a) && has_holes(b) {
                    box_area(&b.exterior).total_cmp(&box_area(&a.exterior))
                } else {
                    Ordering::Equal
                }
            })
    });

    let mut drawn = 0;
    for (unit, screen) in &queue {
        let fill = match level {
            AdministrativeLevel::District => colors.region_fill(unit.region),
            AdministrativeLevel::Municipality => colors.municipality_fill.as_str(),
        };

        let handle = surface.draw_polygon(&panel.place(&screen.exterior), fill, &colors.outline);
        let selection = Selection::for_unit(level, unit);
        surface.bind_click(handle, Box::new(move || selection.clone()));
        drawn += 1;

        for hole in &screen.holes {
            if hole.len() < MIN_FILLED_RING_POINTS {
                continue;
            }
            surface.draw_polygon(&panel.place(hole), &colors.background, &colors.outline);
            drawn += 1;
        }
    }

    log::debug!(
        "Drew {drawn} shapes for {} {level} units at scale {:.4}",
        units.len(),
        projector.scale()
    );

    Ok(drawn)
}

fn has_holes(polygon: &ScreenPolygon) -> bool {
    polygon
        .holes
        .iter()
        .any(|hole| hole.len() >= MIN_FILLED_RING_POINTS)
}

fn box_area(ring: &[ScreenPoint]) -> f64 {
    let (min_x, max_x, min_y, max_y) = ring.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
        },
    );
    (max_x - min_x) * (max_y - min_y)
}
