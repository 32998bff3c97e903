//! # Band Dictionary
//!
//! Static channel-number → band tables for LTE (EARFCN) and NR (NR-ARFCN),
//! plus the formulas that turn a channel number into a carrier frequency.
//!
//! | Technology | Channel   | Source                          |
//! |------------|-----------|---------------------------------|
//! | LTE        | EARFCN    | 3GPP TS 36.101 Table 5.7.3-1    |
//! | NR FR1     | NR-ARFCN  | 3GPP TS 38.101-1 Table 5.4.2.3-1 |
//! | NR FR2     | NR-ARFCN  | 3GPP TS 38.101-2 Table 5.4.2.3-1 |
//!
//! LTE ranges never overlap. NR ranges frequently do (n78 sits inside n77,
//! n28 and n20 share part of the 700/800 MHz raster), so the NR table is
//! ordered and callers that need every candidate use
//! [`table::lookup_all_nr_bands`].
//!
//! Lookups never fail: an unmatched channel yields [`UNKNOWN_BAND`] and
//! [`UNKNOWN_FREQUENCY_MHZ`].

pub mod frequency;
pub mod table;

use std::fmt;

pub use frequency::{is_reused_lte_spectrum, lte_frequency_mhz, nr_frequency_mhz};
pub use table::{
    is_millimeter_wave, lookup_all_nr_bands, lookup_lte_band, lookup_nr_band, LTE_BANDS, NR_BANDS,
};

/// Band label returned when a channel number matches no table row.
pub const UNKNOWN_BAND: &str = "unknown";

/// Frequency returned when a channel number cannot be converted.
pub const UNKNOWN_FREQUENCY_MHZ: f64 = -1.0;

/// One row of a band table: an inclusive channel range and its band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    /// Band label, `"3"` for LTE or `"n78"` for NR.
    pub label: &'static str,
    /// Lowest downlink channel number of the band (inclusive).
    pub channel_min: u32,
    /// Highest downlink channel number of the band (inclusive).
    pub channel_max: u32,
    /// Technology-specific payload.
    pub kind: BandKind,
}

/// What differs between LTE and NR rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandKind {
    /// LTE row. `f_dl_low_mhz` is the downlink frequency at `channel_min`
    /// (F_DL_low in TS 36.101).
    Lte { f_dl_low_mhz: f64 },
    /// NR row. FR2 bands are millimetre-wave.
    Nr { mmwave: bool },
}

impl BandRange {
    pub const fn lte(
        label: &'static str,
        channel_min: u32,
        channel_max: u32,
        f_dl_low_mhz: f64,
    ) -> Self {
        BandRange {
            label,
            channel_min,
            channel_max,
            kind: BandKind::Lte { f_dl_low_mhz },
        }
    }

    pub const fn nr(label: &'static str, channel_min: u32, channel_max: u32, mmwave: bool) -> Self {
        BandRange {
            label,
            channel_min,
            channel_max,
            kind: BandKind::Nr { mmwave },
        }
    }

    /// Whether `channel` lies in `channel_min..=channel_max`.
    pub const fn contains(&self, channel: u32) -> bool {
        self.channel_min <= channel && channel <= self.channel_max
    }

    pub fn is_nr(&self) -> bool {
        matches!(self.kind, BandKind::Nr { .. })
    }

    pub fn is_mmwave(&self) -> bool {
        matches!(self.kind, BandKind::Nr { mmwave: true })
    }

    /// Number of channels covered by the row.
    pub fn width(&self) -> u32 {
        self.channel_max - self.channel_min + 1
    }
}

impl fmt::Display for BandRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BandKind::Lte { f_dl_low_mhz } => write!(
                f,
                "B{} ({}..={}, {}MHz)",
                self.label, self.channel_min, self.channel_max, f_dl_low_mhz
            ),
            BandKind::Nr { mmwave } => write!(
                f,
                "{} ({}..={}{})",
                self.label,
                self.channel_min,
                self.channel_max,
                if mmwave { ", mmWave" } else { "" }
            ),
        }
    }
}

/// Whether a label is a real band rather than [`UNKNOWN_BAND`].
pub fn is_known_band(label: &str) -> bool {
    label != UNKNOWN_BAND
}

/// Round to two decimals, halves away from zero.
pub(crate) fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
