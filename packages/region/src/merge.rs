//! Merging raw boundary records into logical units.
//!
//! Merging is plain concatenation of polygon lists: no union, no
//! deduplication. Records are visited in ascending `(code, wkt)` order, so
//! the merged geometry does not depend on the order the store returned
//! them in.

use std::collections::BTreeMap;

use election_map_geometry::{WktError, parse_wkt};
use election_map_geometry_models::MultiPolygon;
use election_map_region_models::{AdministrativeLevel, AdministrativeUnit, GeometryRecord};
use thiserror::Error;

use crate::{logical_code_at, region_of};

/// A record that was dropped because its WKT did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dropped shape for {name} ({code}): {error}")]
pub struct MergeWarning {
    /// Raw code of the dropped record.
    pub code: u32,
    /// Display name of the dropped record.
    pub name: String,
    /// Why parsing failed.
    pub error: WktError,
}

/// Result of [`merge_shapes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Logical code -> concatenated polygons. Every logical code seen in
    /// the input has an entry, even if all its records failed.
    pub shapes: BTreeMap<u32, MultiPolygon>,
    /// Records dropped because of parse failures.
    pub warnings: Vec<MergeWarning>,
}

/// Result of [`aggregate_units`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOutcome {
    /// Units in ascending logical-code order.
    pub units: Vec<AdministrativeUnit>,
    /// Records dropped because of parse failures.
    pub warnings: Vec<MergeWarning>,
}

fn sorted(records: &[GeometryRecord]) -> Vec<&GeometryRecord> {
    let mut sorted: Vec<&GeometryRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.wkt.cmp(&b.wkt)));
    sorted
}

/// Parses and concatenates every record's polygons under its logical code.
///
/// Unparseable records are logged at warn level, reported in
/// [`MergeOutcome::warnings`], and otherwise ignored.
#[must_use]
pub fn merge_shapes(level: AdministrativeLevel, records: &[GeometryRecord]) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for record in sorted(records) {
        let target = outcome
            .shapes
            .entry(logical_code_at(level, record.code))
            .or_default();

        match parse_wkt(&record.wkt) {
            Ok(polygons) => target.append(polygons),
            Err(error) => {
                log::warn!(
                    "Dropping {level} shape {} ({}): {error}",
                    record.code,
                    record.name
                );
                outcome.warnings.push(MergeWarning {
                    code: record.code,
                    name: record.name.clone(),
                    error,
                });
            }
        }
    }

    outcome
}

/// Builds administrative units from raw records.
///
/// Each unit is named after the record whose raw code equals the logical
/// code when there is one (e.g. the `30` record for Madeira), otherwise
/// after the lowest-coded record.
#[must_use]
pub fn aggregate_units(level: AdministrativeLevel, records: &[GeometryRecord]) -> AggregateOutcome {
    let mut names: BTreeMap<u32, &str> = BTreeMap::new();
    for record in sorted(records) {
        let code = logical_code_at(level, record.code);

        if record.code == code || !names.contains_key(&code) {
            names.insert(code, &record.name);
        }

        let region = region_of(level, record.code);
        if let Some(stored) = record.parsed_region_tag()
            && stored != region
        {
            log::debug!(
                "Record {} ({}) is tagged {stored} but its code classifies as {region}",
                record.code,
                record.name
            );
        }
    }

    let MergeOutcome { shapes, warnings } = merge_shapes(level, records);

    let units = shapes
        .into_iter()
        .map(|(code, polygons)| AdministrativeUnit {
            code,
            name: names.get(&code).map(|n| (*n).to_string()).unwrap_or_default(),
            region: region_of(level, code),
            polygons,
        })
        .collect();

    AggregateOutcome { units, warnings }
}
