//! # Channel → Frequency
//!
//! LTE (TS 36.101 §5.7.3):
//!
//! $$F_{DL} = F_{DL\_low} + 0.1 \cdot (N_{DL} - N_{Offs\text{-}DL})$$
//!
//! NR (TS 38.104 §5.4.2.1), piecewise over the global frequency raster:
//!
//! $$F_{REF} = F_{REF\text{-}Offs} + \Delta F_{Global} \cdot (N_{REF} - N_{REF\text{-}Offs})$$
//!
//! | NR-ARFCN range        | ΔF_Global | F_REF-Offs    | N_REF-Offs |
//! |-----------------------|-----------|---------------|------------|
//! | 0 – 599 999           | 5 kHz     | 0 MHz         | 0          |
//! | 600 000 – 2 016 666   | 15 kHz    | 3 000 MHz     | 600 000    |
//! | 2 016 667 – 3 279 165 | 60 kHz    | 24 250.08 MHz | 2 016 667  |
//!
//! Results are rounded to two decimals. Unconvertible channels yield
//! [`UNKNOWN_FREQUENCY_MHZ`].

use super::table::lte_band_range;
use super::{round_2dp, BandKind, UNKNOWN_FREQUENCY_MHZ};

/// Lowest frequency of "new" Sub-6 NR spectrum. NR carriers below it run in
/// spectrum originally allocated to LTE.
pub const REUSED_LTE_SPECTRUM_CEILING_MHZ: f64 = 3600.0;

/// One linear segment of the NR global frequency raster.
#[derive(Debug, Clone, Copy)]
struct RasterSegment {
    /// Last NR-ARFCN of the segment (inclusive).
    last_channel: u32,
    step_mhz: f64,
    offset_mhz: f64,
    reference_channel: u32,
}

const NR_RASTER: [RasterSegment; 3] = [
    // 0 – 3 GHz
    RasterSegment {
        last_channel: 599_999,
        step_mhz: 0.005,
        offset_mhz: 0.0,
        reference_channel: 0,
    },
    // 3 – 24.25 GHz
    RasterSegment {
        last_channel: 2_016_666,
        step_mhz: 0.015,
        offset_mhz: 3000.0,
        reference_channel: 600_000,
    },
    // 24.25 – 100 GHz
    RasterSegment {
        last_channel: 3_279_165,
        step_mhz: 0.06,
        offset_mhz: 24_250.08,
        reference_channel: 2_016_667,
    },
];

/// Downlink carrier frequency in MHz for an LTE EARFCN. `1850` → `1870.0`.
pub fn lte_frequency_mhz(earfcn: u32) -> f64 {
    match lte_band_range(earfcn) {
        Some(row) => match row.kind {
            BandKind::Lte { f_dl_low_mhz } => {
                round_2dp(f_dl_low_mhz + 0.1 * f64::from(earfcn - row.channel_min))
            }
            BandKind::Nr { .. } => UNKNOWN_FREQUENCY_MHZ,
        },
        None => UNKNOWN_FREQUENCY_MHZ,
    }
}

/// Carrier frequency in MHz for an NR-ARFCN. `643334` → `3650.01`.
pub fn nr_frequency_mhz(nrarfcn: u32) -> f64 {
    NR_RASTER
        .iter()
        .find(|segment| nrarfcn <= segment.last_channel)
        .map_or(UNKNOWN_FREQUENCY_MHZ, |segment| {
            round_2dp(
                segment.offset_mhz
                    + segment.step_mhz * f64::from(nrarfcn - segment.reference_channel),
            )
        })
}

/// Whether an NR carrier sits in spectrum originally allocated to LTE
/// ("reused" or "repurposed" 5G), i.e. below 3600 MHz.
///
/// A channel past the end of the raster has the unknown frequency `-1.0`,
/// which is below the ceiling, so it counts as reused.
pub fn is_reused_lte_spectrum(nrarfcn: u32) -> bool {
    nr_frequency_mhz(nrarfcn) < REUSED_LTE_SPECTRUM_CEILING_MHZ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lte_frequency_from_earfcn() {
        assert_eq!(lte_frequency_mhz(1850), 1870.0);
        assert_eq!(lte_frequency_mhz(1500), 1835.0);
        assert_eq!(lte_frequency_mhz(43291), 3570.1);
        assert_eq!(lte_frequency_mhz(6525), 1503.4);
        assert_eq!(lte_frequency_mhz(276), 2137.6);
        assert_eq!(lte_frequency_mhz(0), 2110.0);
    }

    #[test]
    fn lte_frequency_unknown_channel() {
        assert_eq!(lte_frequency_mhz(4980), UNKNOWN_FREQUENCY_MHZ);
    }

    #[test]
    fn nr_frequency_from_arfcn() {
        assert_eq!(nr_frequency_mhz(159_600), 798.0);
        assert_eq!(nr_frequency_mhz(635_424), 3531.36);
        assert_eq!(nr_frequency_mhz(643_334), 3650.01);
        assert_eq!(nr_frequency_mhz(2_070_015), 27450.96);
    }

    #[test]
    fn nr_raster_boundaries_belong_to_the_lower_segment() {
        assert_eq!(nr_frequency_mhz(599_998), 2999.99);
        assert_eq!(nr_frequency_mhz(600_000), 3000.0);
        assert_eq!(nr_frequency_mhz(2_016_666), 24249.99);
        assert_eq!(nr_frequency_mhz(2_016_667), 24250.08);
        assert_eq!(nr_frequency_mhz(3_279_165), 99_999.96);
        assert_eq!(nr_frequency_mhz(3_279_166), UNKNOWN_FREQUENCY_MHZ);
    }

    #[test]
    fn reused_lte_spectrum() {
        assert!(is_reused_lte_spectrum(157_690));
        assert!(is_reused_lte_spectrum(159_600));
        assert!(is_reused_lte_spectrum(635_424));
        assert!(!is_reused_lte_spectrum(643_334));
        assert!(!is_reused_lte_spectrum(2_070_015));
    }

    #[test]
    fn channel_past_the_raster_counts_as_reused() {
        assert_eq!(nr_frequency_mhz(3_300_000), UNKNOWN_FREQUENCY_MHZ);
        assert!(is_reused_lte_spectrum(3_300_000));
        assert!(is_reused_lte_spectrum(3_279_166));
        assert!(!is_reused_lte_spectrum(3_279_165));
    }

    #[test]
    fn reused_threshold_is_exclusive() {
        // 3600 MHz exactly: 600000 + 600 / 0.015 = 640000.
        assert_eq!(nr_frequency_mhz(640_000), 3600.0);
        assert!(!is_reused_lte_spectrum(640_000));
        assert!(is_reused_lte_spectrum(639_999));
    }
}
