#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region classification and shape aggregation.
//!
//! Raw boundary records come out of the geometry store one per island,
//! district or municipality. This crate decides which logical unit each
//! record belongs to (collapsing the archipelagos onto their nominal
//! district codes), parses the WKT, and concatenates the polygons of every
//! record that lands on the same unit.

pub mod merge;

pub use election_map_region_models::{
    AdministrativeLevel, AdministrativeUnit, GeometryRecord, RegionTag, classify,
    district_code_range, logical_code, municipality_district,
};
pub use merge::{AggregateOutcome, MergeOutcome, MergeWarning, aggregate_units, merge_shapes};

/// Logical code of a raw code at `level`.
///
/// Districts collapse onto their archipelago's nominal code; municipality
/// codes are already unique and map to themselves.
#[must_use]
pub const fn logical_code_at(level: AdministrativeLevel, code: u32) -> u32 {
    match level {
        AdministrativeLevel::District => logical_code(code),
        AdministrativeLevel::Municipality => code,
    }
}

/// Region of a raw code at `level`. Municipalities take the region of the
/// district encoded in their code.
#[must_use]
pub const fn region_of(level: AdministrativeLevel, code: u32) -> RegionTag {
    match level {
        AdministrativeLevel::District => classify(code),
        AdministrativeLevel::Municipality => classify(municipality_district(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_codes_collapse_municipality_codes_do_not() {
        assert_eq!(logical_code_at(AdministrativeLevel::District, 33), 30);
        assert_eq!(logical_code_at(AdministrativeLevel::District, 8), 8);
        assert_eq!(logical_code_at(AdministrativeLevel::Municipality, 3103), 3103);
    }

    #[test]
    fn region_by_level() {
        assert_eq!(region_of(AdministrativeLevel::District, 45), RegionTag::Azores);
        assert_eq!(region_of(AdministrativeLevel::Municipality, 3201), RegionTag::Madeira);
        assert_eq!(region_of(AdministrativeLevel::Municipality, 1106), RegionTag::Continental);
    }
}
