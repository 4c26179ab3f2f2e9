#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region tags, administrative levels and boundary record types.
//!
//! Shared between the geometry store (which filters by district ranges)
//! and the region aggregator (which merges records under logical codes).

pub mod codes;

pub use codes::{classify, district_code_range, logical_code, municipality_district};

use election_map_geometry_models::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The three map regions, each drawn in its own panel and color.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum RegionTag {
    /// Mainland Portugal.
    #[serde(alias = "C")]
    #[strum(to_string = "continental", serialize = "C", serialize = "continente")]
    Continental,
    /// The Azores archipelago.
    #[serde(alias = "A")]
    #[strum(to_string = "azores", serialize = "A", serialize = "açores", serialize = "acores")]
    Azores,
    /// The Madeira archipelago.
    #[serde(alias = "M")]
    #[strum(to_string = "madeira", serialize = "M")]
    Madeira,
}

impl RegionTag {
    /// The logical district code an archipelago is shown under.
    ///
    /// `None` for the continent, whose districts keep their own codes.
    #[must_use]
    pub const fn nominal_code(self) -> Option<u32> {
        match self {
            Self::Continental => None,
            Self::Azores => Some(codes::AZORES_CODE),
            Self::Madeira => Some(codes::MADEIRA_CODE),
        }
    }
}

/// The administrative levels the map can display.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AdministrativeLevel {
    District,
    Municipality,
}

/// One raw boundary record as returned by a geometry store.
///
/// The WKT is kept as text: geometry is re-parsed on every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRecord {
    /// Raw administrative code (district `DD` or municipality `DDMM`).
    pub code: u32,
    /// Display name.
    pub name: String,
    /// Region tag as stored (e.g. `"C"`, `"Açores"`), if any.
    pub region_tag: Option<String>,
    /// Boundary geometry as WKT.
    pub wkt: String,
}

impl GeometryRecord {
    #[must_use]
    pub fn new(code: u32, name: impl Into<String>, wkt: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            region_tag: None,
            wkt: wkt.into(),
        }
    }

    #[must_use]
    pub fn with_region_tag(mut self, tag: impl Into<String>) -> Self {
        self.region_tag = Some(tag.into());
        self
    }

    /// Parses the stored region tag, if present and recognized.
    #[must_use]
    pub fn parsed_region_tag(&self) -> Option<RegionTag> {
        self.region_tag
            .as_deref()
            .and_then(|tag| tag.trim().parse().ok())
    }
}

/// A district or municipality with every polygon merged under its
/// logical code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeUnit {
    /// Logical code (archipelagos collapsed to their nominal code).
    pub code: u32,
    /// Display name.
    pub name: String,
    /// Region used for panel placement and coloring.
    pub region: RegionTag,
    /// Concatenated polygons of every record mapped to this unit.
    pub polygons: MultiPolygon,
}
