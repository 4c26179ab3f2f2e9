//! A retained render surface.
//!
//! [`Scene`] records every polygon in draw order. Clicks are resolved
//! against the topmost shape under the pointer, so a hole overlay drawn
//! after its exterior swallows clicks inside the hole.

use std::fmt;

use election_map_geometry::convert::screen_ring_to_geo_polygon;
use election_map_geometry_models::ScreenPoint;
use geo::Contains;

use crate::{ClickHandler, RenderSurface, Selection, ShapeHandle};

/// One drawn polygon.
pub struct SceneShape {
    pub points: Vec<ScreenPoint>,
    pub fill: String,
    pub outline: String,
    area: geo::Polygon<f64>,
    handler: Option<ClickHandler>,
}

impl SceneShape {
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.handler.is_some()
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.area.contains(&geo::Point::new(x, y))
    }
}

impl fmt::Debug for SceneShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneShape")
            .field("points", &self.points.len())
            .field("fill", &self.fill)
            .field("outline", &self.outline)
            .field("clickable", &self.is_clickable())
            .finish_non_exhaustive()
    }
}

/// Shapes in draw order, bottom first.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: Vec<SceneShape>,
    clears: usize,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shapes(&self) -> &[SceneShape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// How many times the scene has been cleared.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clears
    }

    /// Resolves a click at `(x, y)`.
    ///
    /// Returns the selection of the topmost shape containing the point, or
    /// `None` if there is no shape there or the topmost one has no handler.
    #[must_use]
    pub fn click(&self, x: f64, y: f64) -> Option<Selection> {
        let shape = self.shapes.iter().rev().find(|s| s.contains(x, y))?;
        shape.handler.as_ref().map(|handler| handler())
    }

    /// Renders the scene as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self, width: f64, height: f64, background: &str) -> String {
        Svg {
            scene: self,
            width,
            height,
            background,
        }
        .to_string()
    }
}

impl RenderSurface for Scene {
    fn clear(&mut self) {
        self.shapes.clear();
        self.clears += 1;
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: &str, outline: &str) -> ShapeHandle {
        self.shapes.push(SceneShape {
            points: points.to_vec(),
            fill: fill.to_string(),
            outline: outline.to_string(),
            area: screen_ring_to_geo_polygon(points),
            handler: None,
        });
        ShapeHandle(self.shapes.len() - 1)
    }

    fn bind_click(&mut self, handle: ShapeHandle, handler: ClickHandler) {
        if let Some(shape) = self.shapes.get_mut(handle.0) {
            shape.handler = Some(handler);
        } else {
            log::warn!("Ignoring click binding for unknown shape {}", handle.0);
        }
    }
}

/// Attribute value with XML markup characters escaped.
struct Attr<'a>(&'a str);

impl fmt::Display for Attr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

struct Svg<'a> {
    scene: &'a Scene,
    width: f64,
    height: f64,
    background: &'a str,
}

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (self.width, self.height);
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        writeln!(
            f,
            r#"  <rect width="{w}" height="{h}" fill="{}"/>"#,
            Attr(self.background)
        )?;

        for shape in &self.scene.shapes {
            write!(f, r#"  <polygon points=""#)?;
            for (i, p) in shape.points.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.2},{:.2}", p.x, p.y)?;
            }
            writeln!(
                f,
                r#"" fill="{}" stroke="{}" stroke-width="1"/>"#,
                Attr(&shape.fill),
                Attr(&shape.outline)
            )?;
        }

        writeln!(f, "</svg>")
    }
}
