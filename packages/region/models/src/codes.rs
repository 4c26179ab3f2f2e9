//! District code rules for the Portuguese administrative hierarchy.
//!
//! The archipelagos are split into several raw district codes (one per
//! island group) but are shown as a single district. Madeira owns codes
//! `30..40` and is shown under `30`; the Azores own `40..50` and are shown
//! under `40`. Every other code is a continental district and maps to
//! itself.

use std::ops::Range;

use crate::RegionTag;

/// Logical district code of the Madeira archipelago.
pub const MADEIRA_CODE: u32 = 30;

/// Logical district code of the Azores archipelago.
pub const AZORES_CODE: u32 = 40;

/// Raw district codes belonging to Madeira.
pub const MADEIRA_RANGE: Range<u32> = 30..40;

/// Raw district codes belonging to the Azores.
pub const AZORES_RANGE: Range<u32> = 40..50;

/// Municipality codes are `DDMM`: district followed by a two-digit index.
const MUNICIPALITY_DISTRICT_DIVISOR: u32 = 100;

/// Classifies a raw (or logical) district code into its region.
#[must_use]
pub const fn classify(district_code: u32) -> RegionTag {
    if district_code >= MADEIRA_RANGE.start && district_code < MADEIRA_RANGE.end {
        RegionTag::Madeira
    } else if district_code >= AZORES_RANGE.start && district_code < AZORES_RANGE.end {
        RegionTag::Azores
    } else {
        RegionTag::Continental
    }
}

/// Maps a raw district code to the code it is displayed under.
///
/// Applying it twice gives the same result as applying it once.
#[must_use]
pub const fn logical_code(district_code: u32) -> u32 {
    match classify(district_code).nominal_code() {
        Some(code) => code,
        None => district_code,
    }
}

/// The raw district codes shown under `code`'s logical district.
///
/// For an archipelago (any code in its range) this is the whole range;
/// for a continental district it is the single code.
#[must_use]
pub const fn district_code_range(code: u32) -> Range<u32> {
    match classify(code) {
        RegionTag::Madeira => MADEIRA_RANGE,
        RegionTag::Azores => AZORES_RANGE,
        RegionTag::Continental => code..code.saturating_add(1),
    }
}

/// The raw district code a municipality belongs to.
#[must_use]
pub const fn municipality_district(municipality_code: u32) -> u32 {
    municipality_code / MUNICIPALITY_DISTRICT_DIVISOR
}
