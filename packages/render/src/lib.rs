#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drawing boundary units onto a render surface.
//!
//! The map only needs three things from whatever displays it: wipe the
//! canvas, draw a filled polygon, and run a callback when that polygon is
//! clicked. [`RenderSurface`] captures exactly that. [`draw_units`] projects
//! a set of administrative units into a [`Panel`] and draws them with the
//! configured [`ColorScheme`]. [`Scene`] is a retained surface that keeps
//! what was drawn so it can answer clicks and export SVG.

pub mod colors;
pub mod draw;
pub mod scene;

pub use colors::{ColorError, ColorScheme, all_schemes, parse_color_toml, scheme};
pub use draw::{Panel, draw_units};
pub use scene::{Scene, SceneShape};

use election_map_geometry_models::ScreenPoint;
use election_map_region_models::{AdministrativeLevel, AdministrativeUnit};

/// Identifies a polygon previously drawn on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub usize);

/// What a click on a drawn unit selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    District { code: u32, name: String },
    Municipality { code: u32, name: String },
}

impl Selection {
    /// Selection for a unit displayed at `level`.
    #[must_use]
    pub fn for_unit(level: AdministrativeLevel, unit: &AdministrativeUnit) -> Self {
        match level {
            AdministrativeLevel::District => Self::District {
                code: unit.code,
                name: unit.name.clone(),
            },
            AdministrativeLevel::Municipality => Self::Municipality {
                code: unit.code,
                name: unit.name.clone(),
            },
        }
    }

    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::District { code, .. } | Self::Municipality { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::District { name, .. } | Self::Municipality { name, .. } => name,
        }
    }
}

/// Callback bound to a drawn shape. Handlers own everything they need;
/// the values are moved in when the handler is built.
pub type ClickHandler = Box<dyn Fn() -> Selection>;

/// A canvas that accepts screen-space polygons.
pub trait RenderSurface {
    /// Removes every shape and click binding.
    fn clear(&mut self);

    /// Draws a closed polygon and returns a handle to it.
    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: &str, outline: &str) -> ShapeHandle;

    /// Runs `handler` when the shape behind `handle` is clicked.
    fn bind_click(&mut self, handle: ShapeHandle, handler: ClickHandler);
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: &str, outline: &str) -> ShapeHandle {
        (**self).draw_polygon(points, fill, outline)
    }

    fn bind_click(&mut self, handle: ShapeHandle, handler: ClickHandler) {
        (**self).bind_click(handle, handler);
    }
}
