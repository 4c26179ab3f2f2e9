//! In-memory geometry store.

use std::collections::BTreeMap;

use election_map_region_models::{
    AdministrativeLevel, GeometryRecord, district_code_range, municipality_district,
};

use crate::{GeometryStore, PartyVotes, ResultsScope, ResultsStore, StoreError, parent_range};

/// Serves boundary records held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    districts: Vec<GeometryRecord>,
    /// `(raw district code, record)`
    municipalities: Vec<(u32, GeometryRecord)>,
    /// `(municipality code, party, votes)`
    votes: Vec<(u32, String, u64)>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a district shape record (one per island group for the
    /// archipelagos).
    pub fn add_district(&mut self, record: GeometryRecord) -> &mut Self {
        self.districts.push(record);
        self
    }

    /// Adds a municipality shape record under its raw district code.
    pub fn add_municipality(&mut self, district_code: u32, record: GeometryRecord) -> &mut Self {
        self.municipalities.push((district_code, record));
        self
    }

    /// Adds a party's votes in one municipality.
    pub fn add_votes(
        &mut self,
        municipality_code: u32,
        party: impl Into<String>,
        votes: u64,
    ) -> &mut Self {
        self.votes.push((municipality_code, party.into(), votes));
        self
    }

    /// Raw district code of a municipality. Municipalities added without a
    /// shape fall back to the `DDMM` code layout.
    fn district_of(&self, municipality_code: u32) -> u32 {
        self.municipalities
            .iter()
            .find(|(_, record)| record.code == municipality_code)
            .map_or_else(
                || municipality_district(municipality_code),
                |(district, _)| *district,
            )
    }
}

impl GeometryStore for MemoryStore {
    fn fetch(
        &self,
        level: AdministrativeLevel,
        parent: Option<u32>,
    ) -> Result<Vec<GeometryRecord>, StoreError> {
        let range = parent_range(parent);

        let records = match level {
            AdministrativeLevel::District => self
                .districts
                .iter()
                .filter(|r| range.contains(&r.code))
                .cloned()
                .collect(),
            AdministrativeLevel::Municipality => self
                .municipalities
                .iter()
                .filter(|(district, _)| range.contains(district))
                .map(|(_, r)| r.clone())
                .collect(),
        };

        Ok(records)
    }
}

impl ResultsStore for MemoryStore {
    fn party_totals(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, StoreError> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();

        for (municipality, party, votes) in &self.votes {
            let included = match scope {
                ResultsScope::District(code) => {
                    district_code_range(code).contains(&self.district_of(*municipality))
                }
                ResultsScope::Municipality(code) => *municipality == code,
            };
            if included {
                *totals.entry(party.as_str()).or_default() += votes;
            }
        }

        let mut results: Vec<PartyVotes> = totals
            .into_iter()
            .filter(|(_, votes)| *votes > 0)
            .map(|(party, votes)| PartyVotes {
                party: party.to_string(),
                votes,
            })
            .collect();
        // Stable over the name-ordered map, so ties stay alphabetical.
        results.sort_by(|a, b| b.votes.cmp(&a.votes));

        Ok(results)
    }
}
