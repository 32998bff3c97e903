//! Channel-number → band lookup tables.

use super::{BandRange, UNKNOWN_BAND};

// ─── LTE ────────────────────────────────────────────────────────────────────

/// LTE downlink EARFCN ranges (TS 36.101 Table 5.7.3-1).
///
/// `channel_min` is N_Offs-DL, so the frequency formula can use it directly.
pub const LTE_BANDS: &[BandRange] = &[
    // ─── FDD ───────────────────────────────────────────────────────
    BandRange::lte("1", 0, 599, 2110.0),
    BandRange::lte("2", 600, 1199, 1930.0),
    BandRange::lte("3", 1200, 1949, 1805.0),
    BandRange::lte("4", 1950, 2399, 2110.0),
    BandRange::lte("5", 2400, 2649, 869.0),
    BandRange::lte("6", 2650, 2749, 875.0),
    BandRange::lte("7", 2750, 3449, 2620.0),
    BandRange::lte("8", 3450, 3799, 925.0),
    BandRange::lte("9", 3800, 4149, 1844.9),
    BandRange::lte("10", 4150, 4749, 2110.0),
    BandRange::lte("11", 4750, 4949, 1475.9),
    BandRange::lte("12", 5010, 5179, 729.0),
    BandRange::lte("13", 5180, 5279, 746.0),
    BandRange::lte("14", 5280, 5379, 758.0),
    BandRange::lte("17", 5730, 5849, 734.0),
    BandRange::lte("18", 5850, 5999, 860.0),
    BandRange::lte("19", 6000, 6149, 875.0),
    BandRange::lte("20", 6150, 6449, 791.0),
    BandRange::lte("21", 6450, 6599, 1495.9),
    BandRange::lte("22", 6600, 7399, 3510.0),
    BandRange::lte("23", 7500, 7699, 2180.0),
    BandRange::lte("24", 7700, 8039, 1525.0),
    BandRange::lte("25", 8040, 8689, 1930.0),
    BandRange::lte("26", 8690, 9039, 859.0),
    BandRange::lte("27", 9040, 9209, 852.0),
    BandRange::lte("28", 9210, 9659, 758.0),
    BandRange::lte("29", 9660, 9769, 717.0),
    BandRange::lte("30", 9770, 9869, 2350.0),
    BandRange::lte("31", 9870, 9919, 462.5),
    BandRange::lte("32", 9920, 10359, 1452.0),
    // ─── TDD ───────────────────────────────────────────────────────
    BandRange::lte("33", 36000, 36199, 1900.0),
    BandRange::lte("34", 36200, 36349, 2010.0),
    BandRange::lte("35", 36350, 36949, 1850.0),
    BandRange::lte("36", 36950, 37549, 1930.0),
    BandRange::lte("37", 37550, 37749, 1910.0),
    BandRange::lte("38", 37750, 38249, 2570.0),
    BandRange::lte("39", 38250, 38649, 1880.0),
    BandRange::lte("40", 38650, 39649, 2300.0),
    BandRange::lte("41", 39650, 41589, 2496.0),
    BandRange::lte("42", 41590, 43589, 3400.0),
    BandRange::lte("43", 43590, 45589, 3600.0),
    BandRange::lte("44", 45590, 46589, 703.0),
    BandRange::lte("45", 46590, 46789, 1447.0),
    BandRange::lte("46", 46790, 54539, 5150.0),
    BandRange::lte("47", 54540, 55239, 5855.0),
    BandRange::lte("48", 55240, 56739, 3550.0),
    BandRange::lte("49", 56740, 58239, 3550.0),
    BandRange::lte("50", 58240, 59089, 1432.0),
    BandRange::lte("51", 59090, 59139, 1427.0),
    BandRange::lte("52", 59140, 60139, 3300.0),
    BandRange::lte("53", 60140, 60254, 2483.5),
    // ─── Extended EARFCN range ─────────────────────────────────────
    BandRange::lte("65", 65536, 66435, 2110.0),
    BandRange::lte("66", 66436, 67335, 2110.0),
    BandRange::lte("67", 67336, 67535, 738.0),
    BandRange::lte("68", 67536, 67835, 753.0),
    BandRange::lte("69", 67836, 68335, 2570.0),
    BandRange::lte("70", 68336, 68585, 1995.0),
    BandRange::lte("71", 68586, 68935, 617.0),
    BandRange::lte("72", 68936, 68985, 461.0),
    BandRange::lte("73", 68986, 69035, 460.0),
    BandRange::lte("74", 69036, 69465, 1475.0),
    BandRange::lte("75", 69466, 70315, 1432.0),
    BandRange::lte("76", 70316, 70365, 1427.0),
    BandRange::lte("85", 70366, 70545, 728.0),
    BandRange::lte("87", 70546, 70595, 420.0),
    BandRange::lte("88", 70596, 70645, 422.0),
    // LAA / LTE-U
    BandRange::lte("252", 255144, 256143, 5150.0),
    BandRange::lte("255", 260894, 262143, 5725.0),
];

// ─── NR ─────────────────────────────────────────────────────────────────────

/// NR downlink NR-ARFCN ranges (TS 38.101-1 / 38.101-2).
///
/// Listed by band number, except that a band whose range lies strictly
/// inside another band's range is declared before it (n78 before n77, n38
/// before n41 and n90, n261 before n257). The first match for a channel is
/// therefore never a strict superset of a later match. Bands with partially
/// overlapping ranges keep band-number order, so 159630 yields n20 then n28.
pub const NR_BANDS: &[BandRange] = &[
    // ─── FR1 ───────────────────────────────────────────────────────
    BandRange::nr("n1", 422_000, 434_000, false),
    BandRange::nr("n2", 386_000, 398_000, false),
    BandRange::nr("n3", 361_000, 376_000, false),
    BandRange::nr("n5", 173_800, 178_800, false),
    BandRange::nr("n7", 524_000, 538_000, false),
    BandRange::nr("n8", 185_000, 192_000, false),
    BandRange::nr("n12", 145_800, 149_200, false),
    BandRange::nr("n13", 149_200, 151_200, false),
    BandRange::nr("n14", 151_600, 153_600, false),
    BandRange::nr("n18", 172_000, 175_000, false),
    BandRange::nr("n20", 158_200, 164_200, false),
    BandRange::nr("n24", 305_000, 311_800, false),
    BandRange::nr("n25", 386_000, 399_000, false),
    BandRange::nr("n26", 171_800, 178_800, false),
    BandRange::nr("n28", 151_600, 160_600, false),
    BandRange::nr("n29", 143_400, 145_600, false),
    BandRange::nr("n30", 470_000, 472_000, false),
    BandRange::nr("n34", 402_000, 405_000, false),
    BandRange::nr("n38", 514_000, 524_000, false),
    BandRange::nr("n39", 376_000, 384_000, false),
    BandRange::nr("n40", 460_000, 480_000, false),
    BandRange::nr("n41", 499_200, 537_999, false),
    BandRange::nr("n46", 743_334, 795_000, false),
    BandRange::nr("n50", 286_400, 303_400, false),
    BandRange::nr("n51", 285_400, 286_400, false),
    BandRange::nr("n53", 496_700, 499_000, false),
    BandRange::nr("n66", 422_000, 440_000, false),
    BandRange::nr("n67", 147_600, 151_600, false),
    BandRange::nr("n70", 399_000, 404_000, false),
    BandRange::nr("n71", 123_400, 130_400, false),
    BandRange::nr("n74", 295_000, 303_600, false),
    BandRange::nr("n75", 286_400, 303_400, false),
    BandRange::nr("n76", 285_400, 286_400, false),
    BandRange::nr("n78", 620_000, 653_333, false),
    BandRange::nr("n77", 620_000, 680_000, false),
    BandRange::nr("n79", 693_334, 733_333, false),
    BandRange::nr("n85", 145_600, 149_200, false),
    BandRange::nr("n90", 499_200, 538_000, false),
    BandRange::nr("n104", 828_334, 875_000, false),
    BandRange::nr("n96", 795_000, 875_000, false),
    // ─── FR2 (mmWave) ──────────────────────────────────────────────
    BandRange::nr("n261", 2_070_833, 2_084_999, true),
    BandRange::nr("n257", 2_054_166, 2_104_165, true),
    BandRange::nr("n258", 2_016_667, 2_070_832, true),
    BandRange::nr("n259", 2_270_833, 2_337_499, true),
    BandRange::nr("n260", 2_229_166, 2_279_165, true),
    BandRange::nr("n262", 2_399_166, 2_415_832, true),
];

// ─── Lookups ────────────────────────────────────────────────────────────────

/// The LTE row containing `earfcn`, if any.
pub fn lte_band_range(earfcn: u32) -> Option<&'static BandRange> {
    LTE_BANDS.iter().find(|row| row.contains(earfcn))
}

/// Every NR row containing `nrarfcn`, in declared order.
pub fn nr_band_ranges(nrarfcn: u32) -> impl Iterator<Item = &'static BandRange> {
    NR_BANDS.iter().filter(move |row| row.contains(nrarfcn))
}

/// The NR row with the given label (`"n78"`).
pub fn nr_band_by_label(label: &str) -> Option<&'static BandRange> {
    NR_BANDS.iter().find(|row| row.label == label)
}

/// LTE band label for an EARFCN. `1850` → `"3"`.
pub fn lookup_lte_band(earfcn: u32) -> &'static str {
    lte_band_range(earfcn).map_or(UNKNOWN_BAND, |row| row.label)
}

/// First NR band label for an NR-ARFCN. `643334` → `"n78"`.
pub fn lookup_nr_band(nrarfcn: u32) -> &'static str {
    nr_band_ranges(nrarfcn)
        .next()
        .map_or(UNKNOWN_BAND, |row| row.label)
}

/// All NR band labels valid for an NR-ARFCN, in declared order.
///
/// One channel number is often valid in several bands (n78 / n77 at
/// 3.65 GHz); the resolver uses the whole list for carrier correction.
pub fn lookup_all_nr_bands(nrarfcn: u32) -> Vec<&'static str> {
    nr_band_ranges(nrarfcn).map(|row| row.label).collect()
}

/// Whether an NR-ARFCN is in millimetre-wave spectrum, i.e. at or above the
/// lowest channel of any mmWave row.
pub fn is_millimeter_wave(nrarfcn: u32) -> bool {
    NR_BANDS
        .iter()
        .filter(|row| row.is_mmwave())
        .map(|row| row.channel_min)
        .min()
        .is_some_and(|floor| nrarfcn >= floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lte_earfcn_to_band() {
        assert_eq!(lookup_lte_band(1850), "3");
        assert_eq!(lookup_lte_band(100), "1");
        assert_eq!(lookup_lte_band(276), "1");
        assert_eq!(lookup_lte_band(6100), "19");
        assert_eq!(lookup_lte_band(6525), "21");
        assert_eq!(lookup_lte_band(40340), "41");
        assert_eq!(lookup_lte_band(66786), "66");
    }

    #[test]
    fn lte_gaps_are_unknown() {
        // Between band 11 and band 12.
        assert_eq!(lookup_lte_band(4980), UNKNOWN_BAND);
        // Between the FDD and TDD blocks.
        assert_eq!(lookup_lte_band(20000), UNKNOWN_BAND);
        assert_eq!(lookup_lte_band(u32::MAX), UNKNOWN_BAND);
    }

    #[test]
    fn nr_arfcn_to_band() {
        assert_eq!(lookup_nr_band(643_334), "n78");
        assert_eq!(lookup_nr_band(643_296), "n78");
        assert_eq!(lookup_nr_band(703_392), "n79");
        assert_eq!(lookup_nr_band(157_690), "n28");
        assert_eq!(lookup_nr_band(155_600), "n28");
        assert_eq!(lookup_nr_band(159_630), "n20");
        assert_eq!(lookup_nr_band(520_000), "n38");
        assert_eq!(lookup_nr_band(670_000), "n77");
    }

    #[test]
    fn nr_overlaps_are_listed_in_declared_order() {
        assert_eq!(lookup_all_nr_bands(159_630), vec!["n20", "n28"]);
        assert_eq!(lookup_all_nr_bands(643_334), vec!["n78", "n77"]);
        assert_eq!(lookup_all_nr_bands(520_000), vec!["n38", "n41", "n90"]);
        assert_eq!(lookup_all_nr_bands(2_075_000), vec!["n261", "n257"]);
        assert_eq!(lookup_all_nr_bands(2_070_015), vec!["n257", "n258"]);
        assert!(lookup_all_nr_bands(10).is_empty());
        assert_eq!(lookup_nr_band(10), UNKNOWN_BAND);
    }

    #[test]
    fn mmwave_threshold() {
        assert!(is_millimeter_wave(2_070_015));
        assert!(is_millimeter_wave(2_016_667));
        assert!(!is_millimeter_wave(2_016_666));
        assert!(!is_millimeter_wave(643_334));
    }

    #[test]
    fn rows_are_well_formed() {
        for row in LTE_BANDS.iter().chain(NR_BANDS) {
            assert!(
                row.channel_min <= row.channel_max,
                "{row} has an inverted range"
            );
        }
        assert!(LTE_BANDS.iter().all(|row| !row.is_nr()));
        assert!(NR_BANDS.iter().all(|row| row.is_nr()));
        assert!(NR_BANDS.iter().all(|row| row.label.starts_with('n')));
    }

    #[test]
    fn lte_rows_do_not_overlap() {
        for pair in LTE_BANDS.windows(2) {
            assert!(
                pair[0].channel_max < pair[1].channel_min,
                "{} overlaps {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn nr_strict_subsets_are_declared_first() {
        for (i, earlier) in NR_BANDS.iter().enumerate() {
            for later in &NR_BANDS[i + 1..] {
                let strict_subset = later.channel_min >= earlier.channel_min
                    && later.channel_max <= earlier.channel_max
                    && later.width() < earlier.width();
                assert!(!strict_subset, "{later} must be declared before {earlier}");
            }
        }
    }

    #[test]
    fn label_lookup() {
        let n77 = nr_band_by_label("n77").unwrap();
        assert_eq!(n77.channel_max, 680_000);
        assert!(nr_band_by_label("n999").is_none());
    }
}
