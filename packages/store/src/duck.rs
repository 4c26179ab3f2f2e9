//! `DuckDB`-backed geometry store.
//!
//! Reads the boundary tables of an elections database:
//!
//! | Table | Columns |
//! |-------|---------|
//! | `DISTRICTS` | `CODE`, `NAME`, `REGION` |
//! | `DISTRICT_SHAPE` | `DISTRICT_CODE`, `GEOM_WKT` |
//! | `MUNICIPALITIES` | `CODE`, `NAME`, `DISTRICT_CODE` |
//! | `MUNICIPALITY_SHAPE` | `MUNICIPALITY_CODE`, `GEOM_WKT` |
//! | `VOTINGS` | `MUNICIPALITY_CODE`, `DETAILED_NAME`, `VOTES` |
//!
//! The store only reads. Loading the tables is the ETL's job.

use std::ops::Range;
use std::path::Path;

use duckdb::Connection;
use election_map_region_models::codes::{AZORES_CODE, AZORES_RANGE, MADEIRA_CODE, MADEIRA_RANGE};
use election_map_region_models::{AdministrativeLevel, GeometryRecord, district_code_range};

use crate::{GeometryStore, PartyVotes, ResultsScope, ResultsStore, StoreError, parent_range};

/// Reads boundary records from a `DuckDB` database.
pub struct DuckDbStore {
    conn: Connection,
}

impl DuckDbStore {
    /// Opens the database at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            duckdb::Config::default().access_mode(duckdb::AccessMode::ReadOnly)?,
        )?;
        log::debug!("Opened geometry store {}", path.display());
        Ok(Self { conn })
    }

    /// Opens an empty in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `DuckDB` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wraps an already-open connection.
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn fetch_districts(&self, range: &Range<u32>) -> Result<Vec<GeometryRecord>, StoreError> {
        // Island-group shapes (31, 32, ...) take the name and region of
        // their archipelago's row when the DISTRICTS table has one.
        let sql = format!(
            "SELECT s.DISTRICT_CODE,
                    COALESCE(logical.NAME, own.NAME),
                    COALESCE(logical.REGION, own.REGION),
                    s.GEOM_WKT
             FROM DISTRICT_SHAPE s
             LEFT JOIN DISTRICTS own ON own.CODE = s.DISTRICT_CODE
             LEFT JOIN DISTRICTS logical ON logical.CODE = CASE
                 WHEN s.DISTRICT_CODE >= {} AND s.DISTRICT_CODE < {} THEN {MADEIRA_CODE}
                 WHEN s.DISTRICT_CODE >= {} AND s.DISTRICT_CODE < {} THEN {AZORES_CODE}
                 ELSE s.DISTRICT_CODE
             END
             WHERE s.DISTRICT_CODE >= ? AND s.DISTRICT_CODE < ?
             ORDER BY s.DISTRICT_CODE",
            MADEIRA_RANGE.start, MADEIRA_RANGE.end, AZORES_RANGE.start, AZORES_RANGE.end,
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(duckdb::params![
            i64::from(range.start),
            i64::from(range.end)
        ])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let raw_code: i64 = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let region_tag: Option<String> = row.get(2)?;
            let wkt: Option<String> = row.get(3)?;

            let Ok(code) = u32::try_from(raw_code) else {
                log::warn!("Skipping district shape with out-of-range code {raw_code}");
                continue;
            };

            records.push(GeometryRecord {
                code,
                name: name.unwrap_or_default(),
                region_tag,
                wkt: wkt.unwrap_or_default(),
            });
        }

        Ok(records)
    }

    fn fetch_municipalities(&self, range: &Range<u32>) -> Result<Vec<GeometryRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT m.CODE, m.NAME, s.GEOM_WKT
             FROM MUNICIPALITIES m
             JOIN MUNICIPALITY_SHAPE s ON s.MUNICIPALITY_CODE = m.CODE
             WHERE m.DISTRICT_CODE >= ? AND m.DISTRICT_CODE < ?
             ORDER BY m.NAME, m.CODE",
        )?;
        let mut rows = stmt.query(duckdb::params![
            i64::from(range.start),
            i64::from(range.end)
        ])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let raw_code: i64 = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let wkt: Option<String> = row.get(2)?;

            let Ok(code) = u32::try_from(raw_code) else {
                log::warn!("Skipping municipality shape with out-of-range code {raw_code}");
                continue;
            };

            records.push(GeometryRecord {
                code,
                name: name.unwrap_or_default(),
                region_tag: None,
                wkt: wkt.unwrap_or_default(),
            });
        }

        Ok(records)
    }
}

impl GeometryStore for DuckDbStore {
    fn fetch(
        &self,
        level: AdministrativeLevel,
        parent: Option<u32>,
    ) -> Result<Vec<GeometryRecord>, StoreError> {
        let range = parent_range(parent);
        let records = match level {
            AdministrativeLevel::District => self.fetch_districts(&range)?,
            AdministrativeLevel::Municipality => self.fetch_municipalities(&range)?,
        };
        log::debug!(
            "Fetched {} {level} records (parent={parent:?})",
            records.len()
        );
        Ok(records)
    }
}

impl ResultsStore for DuckDbStore {
    fn party_totals(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, StoreError> {
        let (mut stmt, lower, upper) = match scope {
            ResultsScope::District(code) => {
                let range = district_code_range(code);
                let stmt = self.conn.prepare(
                    "SELECT v.DETAILED_NAME, CAST(SUM(v.VOTES) AS BIGINT) AS total
                     FROM VOTINGS v
                     JOIN MUNICIPALITIES m ON m.CODE = v.MUNICIPALITY_CODE
                     WHERE m.DISTRICT_CODE >= ? AND m.DISTRICT_CODE < ?
                     GROUP BY v.DETAILED_NAME
                     HAVING SUM(v.VOTES) > 0
                     ORDER BY total DESC, v.DETAILED_NAME",
                )?;
                (stmt, range.start, range.end)
            }
            ResultsScope::Municipality(code) => {
                let stmt = self.conn.prepare(
                    "SELECT DETAILED_NAME, CAST(SUM(VOTES) AS BIGINT) AS total
                     FROM VOTINGS
                     WHERE MUNICIPALITY_CODE >= ? AND MUNICIPALITY_CODE < ?
                     GROUP BY DETAILED_NAME
                     HAVING SUM(VOTES) > 0
                     ORDER BY total DESC, DETAILED_NAME",
                )?;
                (stmt, code, code.saturating_add(1))
            }
        };

        let mut rows = stmt.query(duckdb::params![i64::from(lower), i64::from(upper)])?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let party: Option<String> = row.get(0)?;
            let total: i64 = row.get(1)?;

            let Ok(votes) = u64::try_from(total) else {
                log::warn!("Skipping negative vote total {total} for {party:?}");
                continue;
            };

            results.push(PartyVotes {
                party: party.unwrap_or_default(),
                votes,
            });
        }

        log::debug!("Fetched {} party totals for {scope:?}", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "
        CREATE TABLE DISTRICTS (CODE INTEGER, NAME TEXT, REGION TEXT);
        CREATE TABLE DISTRICT_SHAPE (DISTRICT_CODE INTEGER, GEOM_WKT TEXT);
        CREATE TABLE MUNICIPALITIES (CODE INTEGER, NAME TEXT, DISTRICT_CODE INTEGER);
        CREATE TABLE MUNICIPALITY_SHAPE (MUNICIPALITY_CODE INTEGER, GEOM_WKT TEXT);

        INSERT INTO DISTRICTS VALUES
            (11, 'Lisboa', 'C'),
            (13, 'Porto', 'C'),
            (30, 'Madeira', 'M'),
            (40, 'Açores', 'A');

        INSERT INTO DISTRICT_SHAPE VALUES
            (11, 'POLYGON((0 0, 1 0, 1 1, 0 0))'),
            (13, 'POLYGON((2 2, 3 2, 3 3, 2 2))'),
            (31, 'POLYGON((5 5, 6 5, 6 6, 5 5))'),
            (32, 'POLYGON((7 7, 8 7, 8 8, 7 7))'),
            (41, 'POLYGON((9 9, 10 9, 10 10, 9 9))'),
            (99, NULL);

        INSERT INTO MUNICIPALITIES VALUES
            (1106, 'Lisboa', 11),
            (1109, 'Loures', 11),
            (3103, 'Funchal', 31),
            (3201, 'Porto Santo', 32),
            (4101, 'Vila do Porto', 41);

        INSERT INTO MUNICIPALITY_SHAPE VALUES
            (1106, 'POLYGON((0 0, 1 0, 1 1, 0 0))'),
            (1109, 'POLYGON((1 1, 2 1, 2 2, 1 1))'),
            (3103, 'POLYGON((5 5, 6 5, 6 6, 5 5))'),
            (3201, 'POLYGON((7 7, 8 7, 8 8, 7 7))'),
            (4101, 'POLYGON((9 9, 10 9, 10 10, 9 9))');

        CREATE TABLE VOTINGS (
            MUNICIPALITY_CODE INTEGER,
            PARTY_ACRONYM TEXT,
            DETAILED_NAME TEXT,
            VOTES INTEGER
        );

        INSERT INTO VOTINGS VALUES
            (1106, 'PS', 'PS', 300),
            (1106, 'PPD/PSD', 'PPD/PSD', 200),
            (1106, 'L', 'LIVRE', 0),
            (1109, 'PS', 'PS', 150),
            (1109, 'PPD/PSD', 'PPD/PSD', 250),
            (3103, 'PPD/PSD', 'PPD/PSD', 500),
            (3201, 'PS', 'PS', 120),
            (3201, 'PPD/PSD', 'PPD/PSD', 80);
    ";

    fn store() -> DuckDbStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        DuckDbStore::from_connection(conn)
    }

    #[test]
    fn districts_carry_archipelago_names() {
        let records = store().fetch(AdministrativeLevel::District, None).unwrap();
        let summary: Vec<(u32, &str, Option<&str>)> = records
            .iter()
            .map(|r| (r.code, r.name.as_str(), r.region_tag.as_deref()))
            .collect();

        assert_eq!(
            summary,
            vec![
                (11, "Lisboa", Some("C")),
                (13, "Porto", Some("C")),
                (31, "Madeira", Some("M")),
                (32, "Madeira", Some("M")),
                (41, "Açores", Some("A")),
                (99, "", None),
            ]
        );
        assert!(records.last().unwrap().wkt.is_empty());
    }

    #[test]
    fn district_parent_filter_uses_logical_range() {
        let records = store()
            .fetch(AdministrativeLevel::District, Some(30))
            .unwrap();
        assert_eq!(
            records.iter().map(|r| r.code).collect::<Vec<_>>(),
            vec![31, 32]
        );
    }

    #[test]
    fn municipalities_under_madeira() {
        let records = store()
            .fetch(AdministrativeLevel::Municipality, Some(30))
            .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Funchal", "Porto Santo"]);
        assert!(records.iter().all(|r| r.region_tag.is_none()));
    }

    #[test]
    fn municipalities_under_continental_district() {
        let records = store()
            .fetch(AdministrativeLevel::Municipality, Some(11))
            .unwrap();
        assert_eq!(
            records.iter().map(|r| r.code).collect::<Vec<_>>(),
            vec![1106, 1109]
        );
    }

    fn totals(store: &DuckDbStore, scope: ResultsScope) -> Vec<(String, u64)> {
        store
            .party_totals(scope)
            .unwrap()
            .into_iter()
            .map(|p| (p.party, p.votes))
            .collect()
    }

    #[test]
    fn district_totals_sum_every_municipality() {
        assert_eq!(
            totals(&store(), ResultsScope::District(11)),
            vec![("PPD/PSD".to_string(), 450), ("PS".to_string(), 450)]
        );
    }

    #[test]
    fn archipelago_totals_cover_island_groups() {
        assert_eq!(
            totals(&store(), ResultsScope::District(30)),
            vec![("PPD/PSD".to_string(), 580), ("PS".to_string(), 120)]
        );
        assert!(totals(&store(), ResultsScope::District(40)).is_empty());
    }

    #[test]
    fn municipality_totals_skip_zero_votes() {
        assert_eq!(
            totals(&store(), ResultsScope::Municipality(1106)),
            vec![("PS".to_string(), 300), ("PPD/PSD".to_string(), 200)]
        );
    }

    #[test]
    fn missing_tables_are_errors() {
        let store = DuckDbStore::open_in_memory().unwrap();
        assert!(matches!(
            store.fetch(AdministrativeLevel::District, None),
            Err(StoreError::Database(_))
        ));
        assert!(matches!(
            store.party_totals(ResultsScope::District(11)),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn opens_file_read_only() {
        let path = std::env::temp_dir().join(format!(
            "election_map_store_test_{}.duckdb",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA).unwrap();
        }

        let store = DuckDbStore::open(&path).unwrap();
        let records = store
            .fetch(AdministrativeLevel::Municipality, Some(40))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(
            store
                .conn
                .execute_batch("CREATE TABLE scratch (x INTEGER)")
                .is_err()
        );

        drop(store);
        let _ = std::fs::remove_file(&path);
    }
}
