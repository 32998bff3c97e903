//! # Carrier Band Registry
//!
//! Which NR bands each known operator actually deploys, keyed by PLMN
//! (MCC + MNC). The resolver uses it to break ties between overlapping NR
//! bands: a channel valid for both n77 and n78 can only be one of them on a
//! network that deploys just one.
//!
//! Sources: band lists from each operator's coverage pages; MCC/MNC
//! assignments from the Japanese numbering plan.
//!
//! Some listed bands are announced rather than confirmed on air. Those are
//! kept in [`CarrierProfile::unverified_bands`] so that corrections landing
//! on them are visible in the logs and can be reviewed.

/// NR deployment of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierProfile {
    /// Human-readable operator name.
    pub name: &'static str,
    /// Mobile Country Code, three digits.
    pub mcc: &'static str,
    /// Mobile Network Codes, two digits each. One operator (or its
    /// sub-brands) may hold several.
    pub mnc: &'static [&'static str],
    /// NR band labels the operator deploys.
    pub provided_nr_bands: &'static [&'static str],
    /// Subset of `provided_nr_bands` whose deployment is not confirmed.
    pub unverified_bands: &'static [&'static str],
}

impl CarrierProfile {
    /// Whether this profile covers the given PLMN.
    pub fn matches(&self, mcc: &str, mnc: &str) -> bool {
        self.mcc == mcc && self.mnc.contains(&mnc)
    }

    /// Whether the operator deploys `label`.
    pub fn provides(&self, label: &str) -> bool {
        self.provided_nr_bands.contains(&label)
    }

    /// Whether a correction onto `label` should be flagged for review.
    pub fn needs_review(&self, label: &str) -> bool {
        self.unverified_bands.contains(&label)
    }
}

/// Known operators.
pub const CARRIERS: &[CarrierProfile] = &[
    CarrierProfile {
        name: "NTT docomo",
        mcc: "440",
        mnc: &["10"],
        provided_nr_bands: &["n1", "n28", "n78", "n79", "n257"],
        unverified_bands: &[],
    },
    CarrierProfile {
        name: "au",
        mcc: "440",
        mnc: &["01", "50", "51", "52", "53", "54", "55"],
        provided_nr_bands: &["n28", "n3", "n40", "n41", "n77", "n78", "n257"],
        unverified_bands: &[],
    },
    // Includes Y!mobile.
    CarrierProfile {
        name: "SoftBank",
        mcc: "440",
        mnc: &["00", "20", "21"],
        provided_nr_bands: &["n3", "n28", "n77", "n257"],
        unverified_bands: &[],
    },
    CarrierProfile {
        name: "Rakuten Mobile",
        mcc: "440",
        mnc: &["11"],
        provided_nr_bands: &["n3", "n28", "n77", "n257"],
        // Reuse of the 1.7 GHz LTE block for NR has not been confirmed.
        unverified_bands: &["n3"],
    },
];

/// The profile for a PLMN, if the operator is known.
pub fn find_carrier(mcc: &str, mnc: &str) -> Option<&'static CarrierProfile> {
    CARRIERS.iter().find(|carrier| carrier.matches(mcc, mnc))
}

/// NR bands deployed by the operator, or `None` when the operator is
/// unknown. An empty slice is a valid answer distinct from `None`.
pub fn find_provided_bands(mcc: &str, mnc: &str) -> Option<&'static [&'static str]> {
    find_carrier(mcc, mnc).map(|carrier| carrier.provided_nr_bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_carriers_are_found() {
        for (mcc, mnc) in [("440", "10"), ("440", "51"), ("440", "20"), ("440", "11")] {
            assert!(
                find_provided_bands(mcc, mnc).is_some(),
                "{mcc}-{mnc} should be known"
            );
        }
    }

    #[test]
    fn unknown_carrier_is_none() {
        assert!(find_provided_bands("999", "99").is_none());
        assert!(find_carrier("310", "260").is_none());
    }

    #[test]
    fn mnc_membership_selects_the_right_operator() {
        assert_eq!(find_carrier("440", "10").unwrap().name, "NTT docomo");
        assert_eq!(find_carrier("440", "55").unwrap().name, "au");
        assert_eq!(find_carrier("440", "21").unwrap().name, "SoftBank");
        assert_eq!(find_carrier("440", "11").unwrap().name, "Rakuten Mobile");
    }

    #[test]
    fn no_input_normalisation() {
        assert!(find_carrier("440", "1").is_none());
        assert!(find_carrier(" 440", "10").is_none());
    }

    #[test]
    fn unverified_bands_are_also_provided() {
        for carrier in CARRIERS {
            for band in carrier.unverified_bands {
                assert!(
                    carrier.provides(band),
                    "{} flags {band} but does not list it",
                    carrier.name
                );
            }
        }
        assert!(find_carrier("440", "11").unwrap().needs_review("n3"));
        assert!(!find_carrier("440", "10").unwrap().needs_review("n78"));
    }

    #[test]
    fn provided_labels_exist_in_the_nr_table() {
        for carrier in CARRIERS {
            for band in carrier.provided_nr_bands {
                assert!(
                    crate::band::table::nr_band_by_label(band).is_some(),
                    "{} lists unknown band {band}",
                    carrier.name
                );
            }
        }
    }
}
