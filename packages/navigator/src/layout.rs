//! Canvas layout for the two map views.
//!
//! The overview stacks the mainland above the archipelagos: the continent
//! takes the top share of the canvas, and the Azores and Madeira split the
//! strip underneath. Each region gets its own projection so the islands
//! stay legible next to the mainland.

use election_map_geometry::{GeometryError, Viewport};
use election_map_region::RegionTag;
use election_map_render::Panel;
use serde::{Deserialize, Serialize};

/// Canvas size, padding and overview split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    /// Padding inside every panel, in pixels.
    pub padding: f64,
    /// Fraction of the canvas height given to the mainland panel.
    pub mainland_share: f64,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 800.0,
            padding: 10.0,
            mainland_share: 0.7,
        }
    }
}

impl MapLayout {
    /// One panel per region for the overview, in drawing order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidViewport`] if any panel is too small
    /// to hold a drawing after padding.
    pub fn overview_panels(&self) -> Result<Vec<(RegionTag, Panel)>, GeometryError> {
        let top = self.height * self.mainland_share;
        let bottom = self.height - top;
        let half = self.width / 2.0;

        Ok(vec![
            (
                RegionTag::Continental,
                Panel::new(0.0, 0.0, Viewport::new(self.width, top, self.padding)?),
            ),
            (
                RegionTag::Azores,
                Panel::new(0.0, top, Viewport::new(half, bottom, self.padding)?),
            ),
            (
                RegionTag::Madeira,
                Panel::new(half, top, Viewport::new(half, bottom, self.padding)?),
            ),
        ])
    }

    /// The whole canvas, used by the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidViewport`] if the canvas is too small.
    pub fn detail_panel(&self) -> Result<Panel, GeometryError> {
        Ok(Panel::full(Viewport::new(
            self.width,
            self.height,
            self.padding,
        )?))
    }
}
