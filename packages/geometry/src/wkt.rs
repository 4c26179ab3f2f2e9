//! Well-Known-Text reader for polygonal geometry.
//!
//! Accepts `POLYGON`, `MULTIPOLYGON` and `GEOMETRYCOLLECTION`, with an
//! optional `SRID=<n>;` prefix and an optional `Z`/`M`/`ZM` dimension
//! marker. Everything is flattened to a [`MultiPolygon`]: a `POLYGON`
//! becomes a one-element list and a collection keeps only the polygonal
//! members it can parse.
//!
//! Extra ordinates (Z, M) are read and dropped. The SRID is discarded
//! without any reprojection.

use election_map_geometry_models::{Coordinate, MultiPolygon, Polygon, Ring};
use thiserror::Error;

/// Maximum depth of nested `GEOMETRYCOLLECTION`s. Members nested deeper
/// are dropped.
const MAX_NESTING_DEPTH: usize = 32;

/// Number of characters of offending input quoted in error messages.
const ERROR_SNIPPET_LEN: usize = 40;

/// Errors produced while reading WKT text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WktError {
    /// The geometry keyword is missing or is not a polygonal type.
    #[error("Unsupported geometry type: {keyword:?}")]
    UnsupportedGeometryType {
        /// The keyword as read (upper-cased), empty if none was present.
        keyword: String,
    },

    /// A `(` was never closed, or a `)` had no matching `(`.
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    /// A coordinate group had fewer than two ordinates or a non-numeric /
    /// non-finite ordinate.
    #[error("Malformed coordinate: {text:?}")]
    MalformedCoordinate {
        /// The offending coordinate group.
        text: String,
    },

    /// An `SRID=` prefix without an integer value or terminating `;`.
    #[error("Malformed SRID prefix: {text:?}")]
    MalformedSrid {
        /// The text following `SRID=`.
        text: String,
    },

    /// A geometry or ring body did not start with `(`.
    #[error("Expected '(' but found {found:?}")]
    ExpectedOpenParenthesis {
        /// The start of the text found instead (empty at end of input).
        found: String,
    },

    /// Non-whitespace text after a complete geometry or ring.
    #[error("Unexpected input after geometry: {text:?}")]
    UnexpectedInput {
        /// The trailing text.
        text: String,
    },

    /// Geometry collections nested beyond [`MAX_NESTING_DEPTH`].
    #[error("Geometry collections nested deeper than {max} levels")]
    NestingTooDeep {
        /// The nesting limit.
        max: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeometryKind {
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    /// Matches an upper-cased keyword.
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "POLYGON" => Some(Self::Polygon),
            "MULTIPOLYGON" => Some(Self::MultiPolygon),
            "GEOMETRYCOLLECTION" => Some(Self::GeometryCollection),
            _ => None,
        }
    }
}

/// Parses optional WKT text. `None` yields an empty [`MultiPolygon`].
///
/// # Errors
///
/// Returns [`WktError`] under the same conditions as [`parse_wkt`].
pub fn parse_optional_wkt(text: Option<&str>) -> Result<MultiPolygon, WktError> {
    text.map_or_else(|| Ok(MultiPolygon::empty()), parse_wkt)
}

/// Parses WKT text into a [`MultiPolygon`].
///
/// Empty or whitespace-only text yields an empty result, as does any
/// geometry whose body is `EMPTY`.
///
/// # Errors
///
/// Returns [`WktError`] if the text is not a supported polygonal geometry
/// or is syntactically malformed. Errors inside a `GEOMETRYCOLLECTION`
/// member only drop that member.
pub fn parse_wkt(text: &str) -> Result<MultiPolygon, WktError> {
    parse_geometry(text, 0)
}

fn parse_geometry(text: &str, depth: usize) -> Result<MultiPolygon, WktError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(MultiPolygon::empty());
    }

    let text = strip_srid(text)?;
    let (kind, rest) = read_keyword(text)?;
    let body = skip_dimension(rest);

    if body.eq_ignore_ascii_case("EMPTY") {
        return Ok(MultiPolygon::empty());
    }

    let content = enclosed(body)?;

    match kind {
        GeometryKind::Polygon => Ok(MultiPolygon::new(vec![parse_ring_list(content)?])),
        GeometryKind::MultiPolygon => split_top_level(content)?
            .into_iter()
            .map(parse_polygon_member)
            .collect::<Result<Vec<_>, _>>()
            .map(MultiPolygon::new),
        GeometryKind::GeometryCollection => parse_collection(content, depth),
    }
}

/// Removes a leading `SRID=<integer>;`, if present.
fn strip_srid(text: &str) -> Result<&str, WktError> {
    const PREFIX: &str = "SRID=";

    let Some(head) = text.get(..PREFIX.len()) else {
        return Ok(text);
    };
    if !head.eq_ignore_ascii_case(PREFIX) {
        return Ok(text);
    }

    let after = &text[PREFIX.len()..];
    let Some((srid, rest)) = after.split_once(';') else {
        return Err(WktError::MalformedSrid {
            text: snippet(after),
        });
    };
    if srid.trim().parse::<i64>().is_err() {
        return Err(WktError::MalformedSrid {
            text: snippet(srid),
        });
    }

    Ok(rest.trim_start())
}

/// Reads the geometry keyword, tolerating a dimension marker glued to it
/// (`POLYGONZ`, `MULTIPOLYGONZM`).
fn read_keyword(text: &str) -> Result<(GeometryKind, &str), WktError> {
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let word = text[..end].to_ascii_uppercase();
    let rest = &text[end..];

    if let Some(kind) = GeometryKind::from_keyword(&word) {
        return Ok((kind, rest));
    }

    for suffix in ["ZM", "Z", "M"] {
        if let Some(base) = word.strip_suffix(suffix)
            && let Some(kind) = GeometryKind::from_keyword(base)
        {
            return Ok((kind, rest));
        }
    }

    Err(WktError::UnsupportedGeometryType { keyword: word })
}

/// Skips a standalone `Z`, `M` or `ZM` marker and returns the trimmed body.
fn skip_dimension(text: &str) -> &str {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let word = &text[..end];

    if ["Z", "M", "ZM"]
        .iter()
        .any(|dim| word.eq_ignore_ascii_case(dim))
    {
        text[end..].trim_start()
    } else {
        text
    }
}

/// Splits `(content)rest` into `content` and `rest` by depth counting.
fn balanced_content(text: &str) -> Result<(&str, &str), WktError> {
    let text = text.trim_start();
    if !text.starts_with('(') {
        return Err(WktError::ExpectedOpenParenthesis {
            found: snippet(text),
        });
    }

    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }

    Err(WktError::UnbalancedParentheses)
}

/// Like [`balanced_content`], but nothing may follow the closing `)`.
fn enclosed(text: &str) -> Result<&str, WktError> {
    let (content, trailing) = balanced_content(text)?;
    let trailing = trailing.trim();
    if trailing.is_empty() {
        Ok(content)
    } else {
        Err(WktError::UnexpectedInput {
            text: snippet(trailing),
        })
    }
}

/// Splits on commas that are not inside nested parentheses.
fn split_top_level(content: &str) -> Result<Vec<&str>, WktError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;

    for (i, ch) in content.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(WktError::UnbalancedParentheses)?;
            }
            ',' if depth == 0 => {
                parts.push(content[last..i].trim());
                last = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(WktError::UnbalancedParentheses);
    }

    parts.push(content[last..].trim());
    Ok(parts)
}

/// Parses `(ring), (ring), ...` into a polygon.
fn parse_ring_list(content: &str) -> Result<Polygon, WktError> {
    split_top_level(content)?
        .into_iter()
        .map(|block| enclosed(block).and_then(parse_ring))
        .collect::<Result<Vec<_>, _>>()
        .map(Polygon::new)
}

/// Parses one `MULTIPOLYGON` member: `((ring), ...)` or `EMPTY`.
fn parse_polygon_member(part: &str) -> Result<Polygon, WktError> {
    if part.eq_ignore_ascii_case("EMPTY") {
        return Ok(Polygon::default());
    }
    parse_ring_list(enclosed(part)?)
}

fn parse_collection(content: &str, depth: usize) -> Result<MultiPolygon, WktError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(WktError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    let mut polygons = MultiPolygon::empty();
    for member in split_top_level(content)? {
        match parse_geometry(member, depth + 1) {
            Ok(parsed) => polygons.append(parsed),
            Err(e) => {
                log::debug!(
                    "Dropping geometry collection member {:?}: {e}",
                    snippet(member)
                );
            }
        }
    }

    Ok(polygons)
}

/// Parses `x y [z [m]], ...` into a ring. An empty body is an empty ring.
fn parse_ring(content: &str) -> Result<Ring, WktError> {
    if content.trim().is_empty() {
        return Ok(Ring::default());
    }

    content
        .split(',')
        .map(parse_coordinate)
        .collect::<Result<Vec<_>, _>>()
        .map(Ring::new)
}

fn parse_coordinate(group: &str) -> Result<Coordinate, WktError> {
    let malformed = || WktError::MalformedCoordinate {
        text: snippet(group.trim()),
    };

    let mut tokens = group.split_whitespace();
    let (Some(x), Some(y)) = (tokens.next(), tokens.next()) else {
        return Err(malformed());
    };

    let ordinate = |token: &str| {
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(malformed)
    };

    Ok(Coordinate::new(ordinate(x)?, ordinate(y)?))
}

fn snippet(text: &str) -> String {
    text.chars().take(ERROR_SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exterior(mp: &MultiPolygon, idx: usize) -> &Ring {
        mp.polygons()[idx].exterior().expect("polygon has an exterior")
    }

    #[test]
    fn empty_input_is_empty_geometry() {
        assert!(parse_wkt("").unwrap().is_empty());
        assert!(parse_wkt("   \n\t").unwrap().is_empty());
        assert!(parse_optional_wkt(None).unwrap().is_empty());
        assert!(parse_optional_wkt(Some("")).unwrap().is_empty());
    }

    #[test]
    fn simple_polygon() {
        let mp = parse_wkt("POLYGON((0 0, 10 0, 10 8, 0 8, 0 0))").unwrap();
        assert_eq!(mp.len(), 1);
        assert_eq!(mp.polygons()[0].rings.len(), 1);

        let ring = exterior(&mp, 0);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.coords()[0], Coordinate::new(0.0, 0.0));
        assert_eq!(ring.coords()[4], Coordinate::new(0.0, 0.0));
        assert_eq!(ring.coords()[2], Coordinate::new(10.0, 8.0));
    }

    #[test]
    fn polygon_with_hole() {
        let mp = parse_wkt("POLYGON((0 0, 10 0, 10 10, 0 10, 0 0), (2 2, 4 2, 4 4, 2 2))").unwrap();
        let poly = &mp.polygons()[0];
        assert_eq!(poly.rings.len(), 2);
        assert_eq!(poly.holes().len(), 1);
        assert_eq!(poly.holes()[0].len(), 4);
    }

    #[test]
    fn ring_closure_is_preserved_as_given() {
        let mp = parse_wkt("POLYGON((0 0, 1 0, 1 1))").unwrap();
        assert_eq!(exterior(&mp, 0).len(), 3);
    }

    #[test]
    fn multipolygon_has_one_entry_per_member() {
        let mp =
            parse_wkt("MULTIPOLYGON(((0 0,1 0,1 1,0 1,0 0)),((2 2,3 2,3 3,2 3,2 2)))").unwrap();
        assert_eq!(mp.len(), 2);
        assert_eq!(exterior(&mp, 1).coords()[0], Coordinate::new(2.0, 2.0));
    }

    #[test]
    fn single_member_multipolygon_is_not_collapsed() {
        let mp = parse_wkt("MULTIPOLYGON(((0 0,1 0,1 1,0 0),(0.2 0.2,0.4 0.2,0.4 0.4,0.2 0.2)))")
            .unwrap();
        assert_eq!(mp.len(), 1);
        assert_eq!(mp.polygons()[0].rings.len(), 2);
    }

    #[test]
    fn multipolygon_empty_member() {
        let mp = parse_wkt("MULTIPOLYGON(EMPTY, ((0 0, 1 0, 1 1, 0 0)))").unwrap();
        assert_eq!(mp.len(), 2);
        assert!(mp.polygons()[0].is_empty());
        assert_eq!(exterior(&mp, 1).len(), 4);
    }

    #[test]
    fn srid_prefix_is_ignored() {
        let plain = parse_wkt("POLYGON((0 0,1 0,1 1,0 0))").unwrap();
        let with_srid = parse_wkt("SRID=3857;POLYGON((0 0,1 0,1 1,0 0))").unwrap();
        let lower = parse_wkt("srid=4326; polygon((0 0,1 0,1 1,0 0))").unwrap();
        assert_eq!(plain, with_srid);
        assert_eq!(plain, lower);
    }

    #[test]
    fn malformed_srid() {
        assert!(matches!(
            parse_wkt("SRID=abc;POLYGON((0 0,1 0,1 1,0 0))"),
            Err(WktError::MalformedSrid { .. })
        ));
        assert!(matches!(
            parse_wkt("SRID=4326 POLYGON((0 0,1 0,1 1,0 0))"),
            Err(WktError::MalformedSrid { .. })
        ));
    }

    #[test]
    fn mixed_case_and_surrounding_whitespace() {
        let mp = parse_wkt("  \n MultiPolygon ( ( ( 0 0 , 1 0 , 1 1 , 0 0 ) ) )  \n").unwrap();
        assert_eq!(mp.len(), 1);
        assert_eq!(exterior(&mp, 0).len(), 4);
    }

    #[test]
    fn dimension_markers_drop_extra_ordinates() {
        let z = parse_wkt("POLYGON Z ((0 0 5, 1 0 5, 1 1 5, 0 0 5))").unwrap();
        let m = parse_wkt("POLYGON M((0 0 7, 1 0 7, 1 1 7, 0 0 7))").unwrap();
        let zm = parse_wkt("MULTIPOLYGONZM(((0 0 5 7, 1 0 5 7, 1 1 5 7, 0 0 5 7)))").unwrap();
        let plain = parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0))").unwrap();
        assert_eq!(z, plain);
        assert_eq!(m, plain);
        assert_eq!(zm, plain);
    }

    #[test]
    fn empty_bodies() {
        assert!(parse_wkt("POLYGON EMPTY").unwrap().is_empty());
        assert!(parse_wkt("multipolygon z empty").unwrap().is_empty());
        assert!(parse_wkt("GEOMETRYCOLLECTION EMPTY").unwrap().is_empty());
        assert!(parse_wkt("SRID=4326;POLYGON EMPTY").unwrap().is_empty());
    }

    #[test]
    fn collection_drops_non_polygon_members() {
        let mp = parse_wkt("GEOMETRYCOLLECTION(POLYGON((0 0,1 0,1 1,0 0)), POINT(5 5))").unwrap();
        assert_eq!(mp.len(), 1);
        assert_eq!(exterior(&mp, 0).len(), 4);
    }

    #[test]
    fn collection_drops_broken_members() {
        let mp = parse_wkt(
            "GEOMETRYCOLLECTION(POLYGON((0 0, x 0, 1 1, 0 0)), \
             MULTIPOLYGON(((0 0,1 0,1 1,0 0)),((5 5,6 5,6 6,5 5))), \
             LINESTRING(0 0, 1 1))",
        )
        .unwrap();
        assert_eq!(mp.len(), 2);
    }

    #[test]
    fn nested_collections_are_flattened() {
        let mp = parse_wkt(
            "GEOMETRYCOLLECTION(GEOMETRYCOLLECTION(POLYGON((0 0,1 0,1 1,0 0))), \
             POLYGON((2 2,3 2,3 3,2 2)))",
        )
        .unwrap();
        assert_eq!(mp.len(), 2);
    }

    #[test]
    fn excessive_nesting_drops_the_deep_member() {
        let depth = MAX_NESTING_DEPTH + 8;
        let mut wkt = "POLYGON((0 0,1 0,1 1,0 0))".to_string();
        for _ in 0..depth {
            wkt = format!("GEOMETRYCOLLECTION({wkt})");
        }
        let mp = parse_wkt(&format!("GEOMETRYCOLLECTION({wkt}, POLYGON((2 2,3 2,3 3,2 2)))"))
            .unwrap();
        assert_eq!(mp.len(), 1);
        assert_eq!(exterior(&mp, 0).coords()[0], Coordinate::new(2.0, 2.0));
    }

    #[test]
    fn unsupported_types() {
        for wkt in [
            "POINT(1 2)",
            "LINESTRING(0 0, 1 1)",
            "CURVEPOLYGON((0 0, 1 0, 1 1, 0 0))",
            "TIN(((0 0 0, 0 1 0, 1 0 0, 0 0 0)))",
            "((0 0, 1 0, 1 1, 0 0))",
        ] {
            assert!(
                matches!(
                    parse_wkt(wkt),
                    Err(WktError::UnsupportedGeometryType { .. })
                ),
                "expected unsupported type for {wkt}"
            );
        }

        assert_eq!(
            parse_wkt("point(1 2)"),
            Err(WktError::UnsupportedGeometryType {
                keyword: "POINT".to_string()
            })
        );
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(
            parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0)"),
            Err(WktError::UnbalancedParentheses)
        );
        assert_eq!(
            parse_wkt("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0))"),
            Err(WktError::UnbalancedParentheses)
        );
    }

    #[test]
    fn malformed_coordinates() {
        for wkt in [
            "POLYGON((0 0, 1, 1 1, 0 0))",
            "POLYGON((0 0, a 0, 1 1, 0 0))",
            "POLYGON((0 0, NaN 0, 1 1, 0 0))",
            "POLYGON((0 0, inf 0, 1 1, 0 0))",
            "POLYGON((0 0, , 1 1, 0 0))",
        ] {
            assert!(
                matches!(parse_wkt(wkt), Err(WktError::MalformedCoordinate { .. })),
                "expected malformed coordinate for {wkt}"
            );
        }
    }

    #[test]
    fn missing_open_parenthesis() {
        assert!(matches!(
            parse_wkt("POLYGON 0 0, 1 1"),
            Err(WktError::ExpectedOpenParenthesis { .. })
        ));
        assert!(matches!(
            parse_wkt("POLYGON"),
            Err(WktError::ExpectedOpenParenthesis { .. })
        ));
        assert!(matches!(
            parse_wkt("POLYGON(0 0, 1 0, 1 1, 0 0)"),
            Err(WktError::ExpectedOpenParenthesis { .. })
        ));
    }

    #[test]
    fn trailing_input_is_rejected() {
        assert!(matches!(
            parse_wkt("POLYGON((0 0, 1 0, 1 1, 0 0)) garbage"),
            Err(WktError::UnexpectedInput { .. })
        ));
    }

    #[test]
    fn scientific_and_negative_ordinates() {
        let mp = parse_wkt("POLYGON((-1.5e2 2E1, 1 -0.5, +3 4, -1.5e2 2E1))").unwrap();
        assert_eq!(exterior(&mp, 0).coords()[0], Coordinate::new(-150.0, 20.0));
        assert_eq!(exterior(&mp, 0).coords()[1], Coordinate::new(1.0, -0.5));
    }

    #[test]
    fn empty_ring_body_is_an_empty_ring() {
        let mp = parse_wkt("POLYGON(())").unwrap();
        assert_eq!(mp.polygons()[0].rings.len(), 1);
        assert!(exterior(&mp, 0).is_empty());
    }
}
