#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry store: where raw boundary records come from.
//!
//! The map never keeps parsed geometry around. Each draw asks a
//! [`GeometryStore`] for the WKT records of one administrative level and
//! re-parses them. Two stores are provided: [`DuckDbStore`], which reads
//! the boundary tables of an existing elections database, and
//! [`MemoryStore`], which serves records held in memory.
//!
//! Both apply the archipelago flattening when filtering by parent: asking
//! for the municipalities of district `30` returns every municipality
//! whose district code lies in `30..40`.
//!
//! The same stores also answer [`ResultsStore`] queries: per-party vote
//! totals for a district or a municipality.

pub mod duck;
pub mod memory;

pub use duck::DuckDbStore;
pub use memory::MemoryStore;

use std::ops::Range;

use election_map_region_models::{AdministrativeLevel, GeometryRecord, district_code_range};
use thiserror::Error;

/// Errors that can occur while reading boundary records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),
}

/// A source of raw boundary records.
pub trait GeometryStore {
    /// Returns the boundary records of `level`.
    ///
    /// With `parent = None` every record of the level is returned. With a
    /// parent code, only records whose district lies in that code's
    /// logical range are returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying source cannot be read.
    fn fetch(
        &self,
        level: AdministrativeLevel,
        parent: Option<u32>,
    ) -> Result<Vec<GeometryRecord>, StoreError>;
}

impl<T: GeometryStore + ?Sized> GeometryStore for &T {
    fn fetch(
        &self,
        level: AdministrativeLevel,
        parent: Option<u32>,
    ) -> Result<Vec<GeometryRecord>, StoreError> {
        (**self).fetch(level, parent)
    }
}

impl<T: GeometryStore + ?Sized> GeometryStore for Box<T> {
    fn fetch(
        &self,
        level: AdministrativeLevel,
        parent: Option<u32>,
    ) -> Result<Vec<GeometryRecord>, StoreError> {
        (**self).fetch(level, parent)
    }
}

/// Votes summed for one party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyVotes {
    pub party: String,
    pub votes: u64,
}

/// The area whose votes are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsScope {
    /// Every municipality whose district lies in the code's logical range,
    /// so `30` covers all of Madeira's island groups.
    District(u32),
    Municipality(u32),
}

/// A source of election results.
pub trait ResultsStore {
    /// Returns the vote total of every party in `scope`.
    ///
    /// Parties whose total is zero are left out. The rest are ordered by
    /// votes, most first, with ties broken by party name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying source cannot be read.
    fn party_totals(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, StoreError>;
}

impl<T: ResultsStore + ?Sized> ResultsStore for &T {
    fn party_totals(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, StoreError> {
        (**self).party_totals(scope)
    }
}

impl<T: ResultsStore + ?Sized> ResultsStore for Box<T> {
    fn party_totals(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, StoreError> {
        (**self).party_totals(scope)
    }
}

/// Raw district codes selected by an optional parent code.
fn parent_range(parent: Option<u32>) -> Range<u32> {
    parent.map_or(0..u32::MAX, district_code_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_ranges() {
        assert_eq!(parent_range(None), 0..u32::MAX);
        assert_eq!(parent_range(Some(30)), 30..40);
        assert_eq!(parent_range(Some(44)), 40..50);
        assert_eq!(parent_range(Some(11)), 11..12);
    }
}
