#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared geometry pipeline for boundary maps.
//!
//! Parses WKT text into [`MultiPolygon`]s, computes bounding boxes over
//! exterior rings, and projects source coordinates into a pixel viewport
//! with a uniform, Y-flipped affine transform. Every drawing and loading
//! caller goes through this crate instead of carrying its own parser.

pub mod convert;
pub mod projection;
pub mod wkt;

pub use election_map_geometry_models::{
    Bounds, Coordinate, MultiPolygon, Polygon, Ring, ScreenPoint, ScreenPolygon,
};
pub use projection::{Projector, Viewport, bounds};
pub use wkt::{WktError, parse_optional_wkt, parse_wkt};

use thiserror::Error;

/// Errors that can occur while bounding or projecting geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// No exterior ring in the input has any coordinate.
    #[error("No geometry: no exterior ring coordinates to bound")]
    NoGeometry,

    /// The viewport cannot hold a drawing after padding is applied.
    #[error("Invalid viewport {width}x{height} with padding {padding}")]
    InvalidViewport {
        /// Requested width in pixels.
        width: f64,
        /// Requested height in pixels.
        height: f64,
        /// Requested padding in pixels.
        padding: f64,
    },

    /// WKT parsing failed.
    #[error("WKT error: {0}")]
    Wkt(#[from] WktError),
}
