//! # Network Status Classification
//!
//! Turns one telemetry snapshot into the connection state a user cares
//! about. Pure function of its inputs; nothing is remembered between calls.
//!
//! ## Final type (first matching rule wins)
//!
//! | Serving cell | Condition                        | Result                   |
//! |--------------|----------------------------------|--------------------------|
//! | none         | any                              | `ERROR`                  |
//! | LTE          | NR signal strength without cell  | `MAYBE_NR`               |
//! | LTE          | display override is NR-NSA       | `ANCHOR_BAND`            |
//! | LTE          | otherwise                        | `LTE`                    |
//! | NR           | carrier below 3600 MHz           | `NR_REUSED_LTE_SPECTRUM` |
//! | NR           | FR2 channel                      | `NR_MMW`                 |
//! | NR           | otherwise                        | `NR_SUB6`                |
//!
//! ## Standalone
//!
//! Data network NR → `STANDALONE`. Data network LTE while the display
//! override says NR (NSA or Advanced) → `NON_STANDALONE`. Anything else →
//! `NOT_APPLICABLE`.
//!
//! Missing or contradictory inputs never raise: they land on `ERROR` or
//! `NOT_APPLICABLE`. Radio telemetry is routinely incomplete between
//! callbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::band::{is_millimeter_wave, is_reused_lte_spectrum};
use crate::resolver::ResolvedBand;

// ─── Inputs ─────────────────────────────────────────────────────────────────

/// Coarse network type the platform shows next to the signal icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideNetworkType {
    #[default]
    None,
    LteCa,
    LteAdvancedPro,
    /// 5G NSA, or just in coverage of an anchor cell.
    NrNsa,
    /// mmWave or another "faster than NSA" 5G offering.
    NrAdvanced,
}

impl OverrideNetworkType {
    /// Whether the platform is advertising 5G of any kind.
    pub fn indicates_nr(self) -> bool {
        matches!(self, OverrideNetworkType::NrNsa | OverrideNetworkType::NrAdvanced)
    }
}

impl fmt::Display for OverrideNetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideNetworkType::None => write!(f, "none"),
            OverrideNetworkType::LteCa => write!(f, "lte_ca"),
            OverrideNetworkType::LteAdvancedPro => write!(f, "lte_advanced_pro"),
            OverrideNetworkType::NrNsa => write!(f, "nr_nsa"),
            OverrideNetworkType::NrAdvanced => write!(f, "nr_advanced"),
        }
    }
}

impl FromStr for OverrideNetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "none" => Ok(OverrideNetworkType::None),
            "lte_ca" => Ok(OverrideNetworkType::LteCa),
            "lte_advanced_pro" => Ok(OverrideNetworkType::LteAdvancedPro),
            "nr_nsa" => Ok(OverrideNetworkType::NrNsa),
            "nr_advanced" => Ok(OverrideNetworkType::NrAdvanced),
            other => Err(format!("unknown override network type: {other}")),
        }
    }
}

/// Radio technology of the active data session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataNetworkType {
    Lte,
    Nr,
    Other,
}

impl fmt::Display for DataNetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataNetworkType::Lte => write!(f, "lte"),
            DataNetworkType::Nr => write!(f, "nr"),
            DataNetworkType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for DataNetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lte" => Ok(DataNetworkType::Lte),
            "nr" => Ok(DataNetworkType::Nr),
            "other" => Ok(DataNetworkType::Other),
            other => Err(format!("unknown data network type: {other}")),
        }
    }
}

/// Everything the classifier looks at for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Serving cell. `None` while no cell data has arrived.
    pub resolved_band: Option<ResolvedBand>,
    pub override_network_type: Option<OverrideNetworkType>,
    /// The modem reports NR signal strength but no decodable NR cell.
    pub has_nr_signal_strength_only: bool,
    pub data_network_type: Option<DataNetworkType>,
}

// ─── Outputs ────────────────────────────────────────────────────────────────

/// User-facing connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalNrType {
    /// Connected to a millimetre-wave NR cell.
    NrMmw,
    /// Connected to an NR cell in new Sub-6 spectrum.
    NrSub6,
    /// Connected to an NR cell running in former LTE spectrum.
    NrReusedLteSpectrum,
    /// NR signal strength is visible but no NR cell could be read.
    MaybeNr,
    /// The icon may say 5G, but only the LTE anchor is in use.
    AnchorBand,
    /// Plain LTE, not even anchor coverage.
    Lte,
    /// No data yet. Not a user-facing failure.
    Error,
}

impl FinalNrType {
    /// True for the three variants with an actual NR connection.
    pub fn is_nr(self) -> bool {
        matches!(
            self,
            FinalNrType::NrMmw | FinalNrType::NrSub6 | FinalNrType::NrReusedLteSpectrum
        )
    }
}

impl fmt::Display for FinalNrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FinalNrType::NrMmw => "5G mmWave",
            FinalNrType::NrSub6 => "5G Sub-6",
            FinalNrType::NrReusedLteSpectrum => "5G (reused LTE spectrum)",
            FinalNrType::MaybeNr => "maybe 5G",
            FinalNrType::AnchorBand => "anchor band",
            FinalNrType::Lte => "4G",
            FinalNrType::Error => "no data",
        };
        f.write_str(s)
    }
}

/// Whether NR runs on its own core (SA) or rides an LTE anchor (NSA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StandAloneType {
    Standalone,
    NonStandalone,
    NotApplicable,
}

impl fmt::Display for StandAloneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandAloneType::Standalone => write!(f, "SA"),
            StandAloneType::NonStandalone => write!(f, "NSA"),
            StandAloneType::NotApplicable => write!(f, "-"),
        }
    }
}

/// Result of one classification cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub final_type: FinalNrType,
    pub stand_alone_type: StandAloneType,
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Classify one snapshot.
pub fn classify(snapshot: &TelemetrySnapshot) -> ClassificationResult {
    ClassificationResult {
        final_type: classify_final_type(
            snapshot.resolved_band.as_ref(),
            snapshot.override_network_type,
            snapshot.has_nr_signal_strength_only,
        ),
        stand_alone_type: classify_stand_alone(
            snapshot.data_network_type,
            snapshot.override_network_type,
        ),
    }
}

/// The final-type axis on its own.
pub fn classify_final_type(
    band: Option<&ResolvedBand>,
    override_network_type: Option<OverrideNetworkType>,
    has_nr_signal_strength_only: bool,
) -> FinalNrType {
    let Some(band) = band else {
        return FinalNrType::Error;
    };

    if !band.is_nr {
        return if has_nr_signal_strength_only {
            FinalNrType::MaybeNr
        } else if override_network_type == Some(OverrideNetworkType::NrNsa) {
            FinalNrType::AnchorBand
        } else {
            FinalNrType::Lte
        };
    }

    if is_reused_lte_spectrum(band.channel_number) {
        FinalNrType::NrReusedLteSpectrum
    } else if is_millimeter_wave(band.channel_number) {
        FinalNrType::NrMmw
    } else {
        FinalNrType::NrSub6
    }
}

/// The standalone axis on its own.
pub fn classify_stand_alone(
    data_network_type: Option<DataNetworkType>,
    override_network_type: Option<OverrideNetworkType>,
) -> StandAloneType {
    match data_network_type {
        Some(DataNetworkType::Nr) => StandAloneType::Standalone,
        Some(DataNetworkType::Lte)
            if override_network_type.is_some_and(OverrideNetworkType::indicates_nr) =>
        {
            StandAloneType::NonStandalone
        }
        _ => StandAloneType::NotApplicable,
    }
}
