#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drill-down navigation for the election map.
//!
//! The map has two levels. The overview shows every district, grouped
//! into a mainland panel and one panel per archipelago. Selecting a
//! district switches to its detail view, which shows the district's
//! municipalities on the whole canvas. [`Navigator::back`] returns to the
//! overview.
//!
//! The navigator only orchestrates: records come from a
//! [`GeometryStore`], units from the region aggregator, and drawing goes
//! through [`draw_units`]. Nothing is cached between draws.
//!
//! Every read happens before the surface is cleared. A failed draw leaves
//! both the surface and the navigation state as they were.
//!
//! The detail view and a focused municipality also carry the top
//! [`RESULTS_LIMIT`] party totals from the store's [`ResultsStore`] side.

pub mod layout;

pub use layout::MapLayout;

use election_map_geometry::GeometryError;
use election_map_region::{
    AdministrativeLevel, AdministrativeUnit, MergeWarning, aggregate_units, logical_code,
};
use election_map_render::{ColorScheme, Panel, RenderSurface, Selection, draw_units};
use election_map_store::{GeometryStore, PartyVotes, ResultsScope, ResultsStore, StoreError};
use thiserror::Error;

/// Number of parties listed with a district or municipality.
pub const RESULTS_LIMIT: usize = 10;

/// Errors that can occur while navigating the map.
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Reading boundary records failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Projection failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Which level the map is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Overview,
    /// Municipalities of one logical district.
    RegionDetail { code: u32, name: String },
}

/// Outcome of one draw cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStatus {
    Drawn { shapes: usize },
    /// Nothing to draw for this selection.
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawReport {
    pub status: DrawStatus,
    /// Records dropped because their geometry did not parse.
    pub warnings: Vec<MergeWarning>,
    /// Leading party totals of the shown district. Empty at the overview.
    pub results: Vec<PartyVotes>,
}

/// A municipality picked in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedMunicipality {
    pub code: u32,
    pub name: String,
    /// Leading party totals of the municipality.
    pub results: Vec<PartyVotes>,
}

/// Owns the current map level and redraws the surface on every change.
pub struct Navigator<S> {
    store: S,
    layout: MapLayout,
    colors: ColorScheme,
    state: NavState,
    focused: Option<FocusedMunicipality>,
}

impl<S: GeometryStore + ResultsStore> Navigator<S> {
    /// Creates a navigator at the overview. Nothing is drawn until
    /// [`Self::show_overview`] is called.
    pub fn new(store: S, layout: MapLayout, colors: ColorScheme) -> Self {
        Self {
            store,
            layout,
            colors,
            state: NavState::Overview,
            focused: None,
        }
    }

    pub const fn state(&self) -> &NavState {
        &self.state
    }

    pub const fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub const fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    /// The last municipality clicked in the current detail view.
    pub const fn focused_municipality(&self) -> Option<&FocusedMunicipality> {
        self.focused.as_ref()
    }

    /// Draws every district, one panel per region.
    ///
    /// Regions without geometry are left blank.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError`] if the store cannot be read or the layout
    /// does not fit the canvas.
    pub fn show_overview<R: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut R,
    ) -> Result<DrawReport, NavigatorError> {
        let records = self.store.fetch(AdministrativeLevel::District, None)?;
        let outcome = aggregate_units(AdministrativeLevel::District, &records);
        let panels = self.layout.overview_panels()?;

        surface.clear();
        self.state = NavState::Overview;
        self.focused = None;

        let mut shapes = 0;
        for (region, panel) in panels {
            let units: Vec<AdministrativeUnit> = outcome
                .units
                .iter()
                .filter(|unit| unit.region == region)
                .cloned()
                .collect();

            match draw_units(
                surface,
                AdministrativeLevel::District,
                &units,
                &panel,
                &self.colors,
            ) {
                Ok(drawn) => shapes += drawn,
                Err(GeometryError::NoGeometry) => {
                    log::debug!("No {region} geometry; leaving its panel blank");
                }
                Err(e) => return Err(e.into()),
            }
        }

        log::info!(
            "Overview: {} districts, {shapes} shapes, {} dropped records",
            outcome.units.len(),
            outcome.warnings.len()
        );

        Ok(report(shapes, outcome.warnings, Vec::new()))
    }

    /// Switches to the detail view of the district `code`.
    ///
    /// Archipelago island codes select their whole archipelago. The report
    /// carries the district's leading party totals.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError`] if the store cannot be read or the canvas
    /// is too small. A district without municipality geometry is not an
    /// error; it reports [`DrawStatus::NoData`].
    pub fn select_district<R: RenderSurface + ?Sized>(
        &mut self,
        code: u32,
        surface: &mut R,
    ) -> Result<DrawReport, NavigatorError> {
        let code = logical_code(code);
        let name = self.district_name(code)?;
        let records = self
            .store
            .fetch(AdministrativeLevel::Municipality, Some(code))?;
        let outcome = aggregate_units(AdministrativeLevel::Municipality, &records);
        let panel: Panel = self.layout.detail_panel()?;
        let results = self.leading_parties(ResultsScope::District(code))?;

        surface.clear();
        self.state = NavState::RegionDetail {
            code,
            name: name.clone(),
        };
        self.focused = None;

        let shapes = match draw_units(
            surface,
            AdministrativeLevel::Municipality,
            &outcome.units,
            &panel,
            &self.colors,
        ) {
            Ok(drawn) => drawn,
            Err(GeometryError::NoGeometry) => {
                log::info!("No municipality geometry for {name} ({code})");
                0
            }
            Err(e) => return Err(e.into()),
        };

        log::info!(
            "District {name} ({code}): {} municipalities, {shapes} shapes",
            outcome.units.len()
        );

        Ok(report(shapes, outcome.warnings, results))
    }

    /// Returns to the overview. Does nothing at the overview.
    ///
    /// # Errors
    ///
    /// See [`Self::show_overview`].
    pub fn back<R: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut R,
    ) -> Result<Option<DrawReport>, NavigatorError> {
        match self.state {
            NavState::Overview => Ok(None),
            NavState::RegionDetail { .. } => self.show_overview(surface).map(Some),
        }
    }

    /// Reacts to a click resolved by the surface.
    ///
    /// A district opens its detail view. A municipality only becomes the
    /// focused municipality, with its leading party totals; there is no
    /// deeper level, so nothing is redrawn and `None` is returned.
    ///
    /// # Errors
    ///
    /// See [`Self::select_district`]. A municipality whose results cannot
    /// be read leaves the previous focus in place.
    pub fn handle_selection<R: RenderSurface + ?Sized>(
        &mut self,
        selection: Selection,
        surface: &mut R,
    ) -> Result<Option<DrawReport>, NavigatorError> {
        match selection {
            Selection::District { code, .. } => self.select_district(code, surface).map(Some),
            Selection::Municipality { code, name } => {
                let results = self.leading_parties(ResultsScope::Municipality(code))?;
                log::info!(
                    "Focused municipality {name} ({code}): {} parties",
                    results.len()
                );
                self.focused = Some(FocusedMunicipality {
                    code,
                    name,
                    results,
                });
                Ok(None)
            }
        }
    }

    /// Redraws the current level.
    ///
    /// # Errors
    ///
    /// See [`Self::show_overview`] and [`Self::select_district`].
    pub fn redraw<R: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut R,
    ) -> Result<DrawReport, NavigatorError> {
        match self.state {
            NavState::Overview => self.show_overview(surface),
            NavState::RegionDetail { code, .. } => self.select_district(code, surface),
        }
    }

    fn leading_parties(&self, scope: ResultsScope) -> Result<Vec<PartyVotes>, NavigatorError> {
        let mut results = self.store.party_totals(scope)?;
        results.truncate(RESULTS_LIMIT);
        Ok(results)
    }

    fn district_name(&self, code: u32) -> Result<String, NavigatorError> {
        let records = self
            .store
            .fetch(AdministrativeLevel::District, Some(code))?;
        let outcome = aggregate_units(AdministrativeLevel::District, &records);

        Ok(outcome
            .units
            .into_iter()
            .find(|unit| unit.code == code)
            .map(|unit| unit.name)
            .unwrap_or_default())
    }
}

fn report(shapes: usize, warnings: Vec<MergeWarning>, results: Vec<PartyVotes>) -> DrawReport {
    DrawReport {
        status: if shapes == 0 {
            DrawStatus::NoData
        } else {
            DrawStatus::Drawn { shapes }
        },
        warnings,
        results,
    }
}
