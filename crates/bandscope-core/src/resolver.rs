//! # Band Resolver
//!
//! Produces one authoritative band answer per serving cell. Three sources
//! are combined, each trusted for what it is good at:
//!
//! 1. **Channel number**: ground truth for which bands are *possible*.
//! 2. **Modem band hint**: accepted only when the channel number allows it.
//!    Some vendors report a fixed band regardless of the actual carrier.
//! 3. **Carrier deployment**: when the operator is known and the tentative
//!    band is one it does not deploy, switch to the first candidate it does.
//!
//! No step fails. The worst case is [`UNKNOWN_BAND`](crate::band::UNKNOWN_BAND).

use serde::{Deserialize, Serialize};

use crate::band::{self, table};
use crate::carrier;
use crate::cell::{CellIdentity, OperatorInfo};

/// Band / frequency answer for one serving cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBand {
    /// Whether the cell is NR (5G).
    pub is_nr: bool,
    /// Band label, `"3"` or `"n78"`.
    pub band_label: String,
    /// EARFCN for LTE, NR-ARFCN for NR.
    pub channel_number: u32,
    /// Downlink carrier frequency in MHz, two decimals. Negative when the
    /// channel number is outside the tables.
    pub frequency_mhz: f64,
    /// Operator name as shown by the platform.
    pub carrier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_cell_id: Option<u32>,
}

impl ResolvedBand {
    /// Resolve an LTE serving cell.
    pub fn lte(earfcn: u32, carrier_name: &str, physical_cell_id: Option<u32>) -> Self {
        ResolvedBand {
            is_nr: false,
            band_label: resolve_lte_band(earfcn).to_string(),
            channel_number: earfcn,
            frequency_mhz: band::lte_frequency_mhz(earfcn),
            carrier_name: carrier_name.to_string(),
            physical_cell_id,
        }
    }

    /// Resolve an NR serving cell, applying modem-hint and carrier correction.
    pub fn nr(
        operator: &OperatorInfo,
        nrarfcn: u32,
        modem_hint: Option<&str>,
        physical_cell_id: Option<u32>,
    ) -> Self {
        ResolvedBand {
            is_nr: true,
            band_label: resolve_nr_band(&operator.mcc, &operator.mnc, nrarfcn, modem_hint)
                .to_string(),
            channel_number: nrarfcn,
            frequency_mhz: band::nr_frequency_mhz(nrarfcn),
            carrier_name: operator.name.clone(),
            physical_cell_id,
        }
    }

    /// Whether the channel number matched a table row.
    pub fn is_known(&self) -> bool {
        band::is_known_band(&self.band_label)
    }
}

/// LTE band for an EARFCN. LTE ranges never overlap, so there is nothing to
/// correct.
pub fn resolve_lte_band(earfcn: u32) -> &'static str {
    table::lookup_lte_band(earfcn)
}

/// NR band for an NR-ARFCN, corrected with the modem hint and the
/// operator's known deployment.
pub fn resolve_nr_band(
    mcc: &str,
    mnc: &str,
    nrarfcn: u32,
    modem_hint: Option<&str>,
) -> &'static str {
    let candidates = table::lookup_all_nr_bands(nrarfcn);

    let hinted = modem_hint.and_then(|hint| candidates.iter().copied().find(|c| *c == hint));
    if let (Some(hint), None) = (modem_hint, hinted) {
        tracing::trace!(nrarfcn, hint, ?candidates, "modem band hint rejected");
    }
    let tentative = hinted.unwrap_or_else(|| table::lookup_nr_band(nrarfcn));

    let Some(profile) = carrier::find_carrier(mcc, mnc) else {
        return tentative;
    };
    if profile.provides(tentative) {
        return tentative;
    }

    match candidates.iter().copied().find(|c| profile.provides(c)) {
        Some(corrected) => {
            tracing::debug!(
                nrarfcn,
                carrier = profile.name,
                from = tentative,
                to = corrected,
                needs_review = profile.needs_review(corrected),
                "band corrected from carrier deployment"
            );
            corrected
        }
        None => tentative,
    }
}

/// Build the [`ResolvedBand`] for a platform cell. Cells of other radio
/// technologies have no band.
pub fn resolve_cell(cell: &CellIdentity, operator: &OperatorInfo) -> Option<ResolvedBand> {
    let pci = cell.pci();
    match cell {
        CellIdentity::Lte { earfcn, .. } => Some(ResolvedBand::lte(*earfcn, &operator.name, pci)),
        CellIdentity::Nr { nrarfcn, bands, .. } => {
            let hint = bands.first().map(|band| format!("n{band}"));
            Some(ResolvedBand::nr(operator, *nrarfcn, hint.as_deref(), pci))
        }
        CellIdentity::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::UNKNOWN_BAND;

    const DOCOMO: (&str, &str) = ("440", "10");
    const SOFTBANK: (&str, &str) = ("440", "20");
    const UNKNOWN: (&str, &str) = ("999", "99");

    fn operator(mcc: &str, mnc: &str) -> OperatorInfo {
        OperatorInfo {
            mcc: mcc.into(),
            mnc: mnc.into(),
            name: "test".into(),
        }
    }

    #[test]
    fn unknown_carrier_without_hint_matches_table() {
        for nrarfcn in [643_334, 703_392, 157_690, 159_630, 520_000, 2_070_015] {
            assert_eq!(
                resolve_nr_band(UNKNOWN.0, UNKNOWN.1, nrarfcn, None),
                table::lookup_nr_band(nrarfcn)
            );
        }
    }

    #[test]
    fn unknown_carrier_gets_most_specific_band() {
        // n38 lies inside both n41 and n90.
        assert_eq!(resolve_nr_band(UNKNOWN.0, UNKNOWN.1, 520_000, None), "n38");
        // n20 and n28 overlap only partly.
        assert_eq!(resolve_nr_band(UNKNOWN.0, UNKNOWN.1, 159_630, None), "n20");
    }

    #[test]
    fn consistent_hint_is_accepted() {
        assert_eq!(
            resolve_nr_band(UNKNOWN.0, UNKNOWN.1, 643_334, Some("n77")),
            "n77"
        );
    }

    #[test]
    fn inconsistent_hint_is_ignored() {
        // n79 cannot carry NR-ARFCN 643334.
        assert_eq!(
            resolve_nr_band(UNKNOWN.0, UNKNOWN.1, 643_334, Some("n79")),
            "n78"
        );
    }

    #[test]
    fn carrier_overrides_band_it_does_not_deploy() {
        // SoftBank has n77 but not n78: the hint n78 is plausible yet wrong.
        assert_eq!(
            resolve_nr_band(SOFTBANK.0, SOFTBANK.1, 643_334, Some("n78")),
            "n77"
        );
        // n20 comes first for 159630, but docomo only deploys n28.
        assert_eq!(resolve_nr_band(DOCOMO.0, DOCOMO.1, 159_630, None), "n28");
        // docomo deploys n257 but not n258.
        assert_eq!(
            resolve_nr_band(DOCOMO.0, DOCOMO.1, 2_070_015, None),
            "n257"
        );
    }

    #[test]
    fn carrier_keeps_deployed_band() {
        assert_eq!(resolve_nr_band(DOCOMO.0, DOCOMO.1, 643_334, None), "n78");
        assert_eq!(resolve_nr_band(DOCOMO.0, DOCOMO.1, 157_690, None), "n28");
    }

    #[test]
    fn no_deployed_candidate_keeps_tentative() {
        // n79 is the only candidate; SoftBank does not deploy it.
        assert_eq!(
            resolve_nr_band(SOFTBANK.0, SOFTBANK.1, 703_392, None),
            "n79"
        );
    }

    #[test]
    fn out_of_table_channel_is_unknown() {
        assert_eq!(resolve_nr_band(DOCOMO.0, DOCOMO.1, 10, None), UNKNOWN_BAND);
        assert_eq!(resolve_nr_band(DOCOMO.0, DOCOMO.1, 10, Some("n78")), UNKNOWN_BAND);
    }

    #[test]
    fn resolves_lte_cell() {
        let band = resolve_cell(
            &CellIdentity::Lte {
                earfcn: 1850,
                pci: Some(101),
            },
            &operator("440", "10"),
        )
        .unwrap();
        assert!(!band.is_nr);
        assert_eq!(band.band_label, "3");
        assert_eq!(band.frequency_mhz, 1870.0);
        assert_eq!(band.physical_cell_id, Some(101));
        assert!(band.is_known());
    }

    #[test]
    fn resolves_nr_cell_with_modem_bands() {
        let band = resolve_cell(
            &CellIdentity::Nr {
                nrarfcn: 643_334,
                pci: Some(42),
                bands: vec![78],
            },
            &operator(SOFTBANK.0, SOFTBANK.1),
        )
        .unwrap();
        assert!(band.is_nr);
        assert_eq!(band.band_label, "n77");
        assert_eq!(band.frequency_mhz, 3650.01);
        assert_eq!(band.physical_cell_id, Some(42));
    }

    #[test]
    fn other_rat_has_no_band() {
        assert!(resolve_cell(&CellIdentity::Other, &operator("440", "10")).is_none());
    }

    #[test]
    fn unknown_channel_is_data_not_a_fault() {
        let band = ResolvedBand::lte(4980, "test", None);
        assert!(!band.is_known());
        assert!(band.frequency_mhz < 0.0);
    }
}
