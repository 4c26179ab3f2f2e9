//! Color schemes, loaded from embedded TOML.
//!
//! Each `.toml` file in `packages/render/colors/` is baked into the binary
//! with [`include_str!`]. A scheme maps every region to a fill and names
//! the municipality fill, outline and background colors.

use std::collections::BTreeMap;

use election_map_region_models::RegionTag;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheme used when none is requested.
pub const DEFAULT_SCHEME: &str = "default";

/// TOML configs embedded at compile time.
const SCHEME_TOMLS: &[(&str, &str)] = &[
    ("default", include_str!("../colors/default.toml")),
    ("grayscale", include_str!("../colors/grayscale.toml")),
];

#[cfg(test)]
const EXPECTED_SCHEME_COUNT: usize = 2;

/// Errors that can occur while loading a color scheme.
#[derive(Debug, Error)]
pub enum ColorError {
    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A color is not a `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` hex code.
    #[error("Invalid color for {field}: {value:?}")]
    InvalidColor { field: String, value: String },
}

/// Fill and stroke colors for the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Fill per region, used at district level.
    pub regions: BTreeMap<RegionTag, String>,
    /// Fill of every municipality in the detail view.
    pub municipality_fill: String,
    pub outline: String,
    /// Canvas color; also used to paint holes.
    pub background: String,
}

impl ColorScheme {
    /// Checks that every color is a hex color code.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidColor`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ColorError> {
        let named = [
            ("municipality_fill".to_string(), &self.municipality_fill),
            ("outline".to_string(), &self.outline),
            ("background".to_string(), &self.background),
        ];
        let regions = self
            .regions
            .iter()
            .map(|(region, color)| (format!("regions.{region}"), color));

        for (field, value) in named.into_iter().chain(regions) {
            if !is_hex_color(value) {
                return Err(ColorError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Fill for a district in `region`. Regions missing from the table fall
    /// back to the municipality fill.
    #[must_use]
    pub fn region_fill(&self, region: RegionTag) -> &str {
        self.regions
            .get(&region)
            .map_or(self.municipality_fill.as_str(), String::as_str)
    }
}

impl Default for ColorScheme {
    /// # Panics
    ///
    /// Panics if the embedded default scheme is malformed.
    fn default() -> Self {
        scheme(DEFAULT_SCHEME)
            .unwrap_or_else(|| panic!("Missing embedded {DEFAULT_SCHEME}.toml color scheme"))
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Parses and validates a color scheme from TOML text.
///
/// # Errors
///
/// Returns [`ColorError`] if the text is not a valid scheme or a color is
/// not a hex code.
pub fn parse_color_toml(text: &str) -> Result<ColorScheme, ColorError> {
    let scheme: ColorScheme = toml::de::from_str(text)?;
    scheme.validate()?;
    Ok(scheme)
}

/// Returns every embedded color scheme.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_schemes() -> Vec<ColorScheme> {
    SCHEME_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_color_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up an embedded scheme by id.
#[must_use]
pub fn scheme(id: &str) -> Option<ColorScheme> {
    all_schemes().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn loads_all_schemes() {
        assert_eq!(all_schemes().len(), EXPECTED_SCHEME_COUNT);
    }

    #[test]
    fn scheme_ids_are_unique() {
        let schemes = all_schemes();
        let mut ids: Vec<&str> = schemes.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_SCHEME_COUNT);
    }

    #[test]
    fn every_scheme_colors_every_region() {
        for scheme in &all_schemes() {
            for region in RegionTag::iter() {
                assert!(
                    scheme.regions.contains_key(&region),
                    "{}: no fill for {region}",
                    scheme.id
                );
            }
            for color in scheme
                .regions
                .values()
                .chain([&scheme.municipality_fill, &scheme.outline, &scheme.background])
            {
                assert!(color.starts_with('#'), "{}: bad color {color}", scheme.id);
            }
        }
    }

    #[test]
    fn default_scheme_colors() {
        let colors = ColorScheme::default();
        assert_eq!(colors.region_fill(RegionTag::Continental), "#377eb8");
        assert_eq!(colors.region_fill(RegionTag::Azores), "#4daf4a");
        assert_eq!(colors.region_fill(RegionTag::Madeira), "#ff7f00");
        assert_eq!(colors.municipality_fill, "#8fbce6");
        assert_eq!(colors.outline, "#222222");
        assert_eq!(colors.background, "#ffffff");
    }

    #[test]
    fn region_keys_accept_short_tags() {
        let colors = parse_color_toml(
            r##"
            id = "custom"
            background = "#000000"
            outline = "#ffffff"
            municipality_fill = "#123456"

            [regions]
            C = "#111111"
            "##,
        )
        .unwrap();

        assert_eq!(colors.region_fill(RegionTag::Continental), "#111111");
        assert_eq!(colors.region_fill(RegionTag::Madeira), "#123456");
        assert!(colors.description.is_empty());
    }

    #[test]
    fn missing_fields_are_errors() {
        assert!(matches!(
            parse_color_toml("id = \"broken\""),
            Err(ColorError::Toml(_))
        ));
    }

    #[test]
    fn non_hex_colors_are_rejected() {
        let result = parse_color_toml(
            r##"
            id = "injected"
            background = "#ffffff"
            outline = "#222222"
            municipality_fill = "#8fbce6"

            [regions]
            madeira = "red\" onclick=\"x"
            "##,
        );
        assert!(matches!(
            result,
            Err(ColorError::InvalidColor { ref field, .. }) if field == "regions.madeira"
        ));

        for bad in ["ffffff", "#ffff", "#gggggg", "#12345", ""] {
            assert!(!is_hex_color(bad), "{bad:?} accepted");
        }
        for good in ["#fff", "#FFFA", "#8fbce6", "#8fbce6cc"] {
            assert!(is_hex_color(good), "{good:?} rejected");
        }
    }
}
