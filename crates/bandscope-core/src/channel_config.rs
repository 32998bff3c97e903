//! # Physical Channel Configuration Log
//!
//! The telephony framework logs every physical channel configuration change
//! on the radio log buffer, one line per update:
//!
//! ```text
//! [0] Physical channel configs updated: anchorNrCell=-1, nrBandwidths=[], nrBands=[], configs=[{mConnectionStatus=PrimaryServing,...,mUplinkFrequency=1775000}]
//! ```
//!
//! The configuration API itself is reserved for privileged apps, but the log
//! line carries the same records. They reveal the secondary cells in use,
//! which the cell list does not: an LTE primary with an NR secondary is
//! EN-DC, several secondaries is carrier aggregation.
//!
//! Parsing is positional over the framework's `toString()` output and is
//! known to match Android 15 and 16.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::band::{lte_frequency_mhz, nr_frequency_mhz, round_2dp};
use crate::resolver::ResolvedBand;

const UPDATE_MARKER: &str = "] Physical channel configs updated: ";
const RECORD_OPEN: &str = "{mConnectionStatus=";

/// Keys of one `{...}` record, in print order.
const RECORD_KEYS: [&str; 12] = [
    "mConnectionStatus",
    "mCellBandwidthDownlinkKhz",
    "mCellBandwidthUplinkKhz",
    "mNetworkType",
    "mFrequencyRange",
    "mDownlinkChannelNumber",
    "mUplinkChannelNumber",
    "mContextIds",
    "mPhysicalCellId",
    "mBand",
    "mDownlinkFrequency",
    "mUplinkFrequency",
];

/// Framework placeholder for an unknown channel number (`Integer.MAX_VALUE`).
const CHANNEL_NUMBER_UNKNOWN: u32 = i32::MAX as u32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("not a physical channel config update")]
    NotAnUpdate,
    #[error("invalid phone id: {0:?}")]
    InvalidPhoneId(String),
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("unterminated config record")]
    UnterminatedRecord,
}

// ─── Log line ───────────────────────────────────────────────────────────────

/// One line of `logcat -v threadtime` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogcatLine<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub message: &'a str,
}

impl<'a> LogcatLine<'a> {
    /// Split off the six header fields (date, time, pid, tid, level, tag).
    /// Returns `None` for lines too short to carry a message, which some
    /// vendor logs emit with garbled encodings.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut rest = line;
        let mut header = [""; 6];
        for field in &mut header {
            rest = rest.trim_start();
            let end = rest.find(char::is_whitespace)?;
            *field = &rest[..end];
            rest = &rest[end..];
        }
        Some(LogcatLine {
            date: header[0],
            time: header[1],
            message: rest.trim_start(),
        })
    }
}

// ─── Records ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    PrimaryServing,
    SecondaryServing,
    Other,
}

impl ConnectionStatus {
    fn from_log(value: &str) -> Self {
        match value {
            "PrimaryServing" => ConnectionStatus::PrimaryServing,
            "SecondaryServing" => ConnectionStatus::SecondaryServing,
            _ => ConnectionStatus::Other,
        }
    }
}

/// One `{mConnectionStatus=...}` record. Unknown numeric values (the
/// framework prints `-1`, `0` or `Integer.MAX_VALUE`) become `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalChannelConfig {
    pub connection_status: ConnectionStatus,
    pub cell_bandwidth_downlink_khz: Option<u32>,
    pub cell_bandwidth_uplink_khz: Option<u32>,
    /// `"LTE"` or `"NR"`.
    pub network_type: String,
    pub frequency_range: String,
    pub downlink_channel_number: Option<u32>,
    pub uplink_channel_number: Option<u32>,
    pub physical_cell_id: Option<u32>,
    pub band: Option<u32>,
    pub downlink_frequency_khz: Option<u32>,
    pub uplink_frequency_khz: Option<u32>,
}

impl PhysicalChannelConfig {
    fn parse(body: &str) -> Result<Self, ParseError> {
        let mut values = [""; RECORD_KEYS.len()];
        let mut rest = body;
        for (i, key) in RECORD_KEYS.iter().enumerate() {
            rest = rest
                .strip_prefix(key)
                .and_then(|r| r.strip_prefix('='))
                .ok_or(ParseError::MissingField(*key))?;
            match RECORD_KEYS.get(i + 1) {
                Some(next) => {
                    let separator = format!(",{next}=");
                    let end = rest
                        .find(&separator)
                        .ok_or(ParseError::MissingField(*next))?;
                    values[i] = &rest[..end];
                    rest = &rest[end + 1..];
                }
                None => values[i] = rest,
            }
        }

        let channel = |v: &str| number(v).filter(|n| *n != CHANNEL_NUMBER_UNKNOWN);
        Ok(PhysicalChannelConfig {
            connection_status: ConnectionStatus::from_log(values[0].trim()),
            cell_bandwidth_downlink_khz: number(values[1]),
            cell_bandwidth_uplink_khz: number(values[2]),
            network_type: values[3].trim().to_string(),
            frequency_range: values[4].trim().to_string(),
            downlink_channel_number: channel(values[5]),
            uplink_channel_number: channel(values[6]),
            physical_cell_id: number(values[8]),
            band: number(values[9]).filter(|b| *b != 0),
            downlink_frequency_khz: number(values[10]),
            uplink_frequency_khz: number(values[11]),
        })
    }

    pub fn is_nr(&self) -> bool {
        self.network_type == "NR"
    }

    /// Band answer for this record. A cell from the cell list with the same
    /// PCI wins, since several modems log records without a band. Records
    /// missing a band or a channel number otherwise yield `None`.
    pub fn to_resolved_band(&self, known_cells: &[ResolvedBand]) -> Option<ResolvedBand> {
        if let Some(pci) = self.physical_cell_id {
            if let Some(known) = known_cells
                .iter()
                .find(|cell| cell.physical_cell_id == Some(pci))
            {
                return Some(known.clone());
            }
        }

        let band = self.band?;
        let channel_number = self.downlink_channel_number?;
        let is_nr = self.is_nr();
        let frequency_mhz = match self.downlink_frequency_khz {
            Some(khz) => round_2dp(f64::from(khz) / 1000.0),
            None if is_nr => nr_frequency_mhz(channel_number),
            None => lte_frequency_mhz(channel_number),
        };
        Some(ResolvedBand {
            is_nr,
            band_label: if is_nr {
                format!("n{band}")
            } else {
                band.to_string()
            },
            channel_number,
            frequency_mhz,
            carrier_name: String::new(),
            physical_cell_id: self.physical_cell_id,
        })
    }
}

fn number(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

// ─── Update message ─────────────────────────────────────────────────────────

/// A parsed "Physical channel configs updated" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfigUpdate {
    /// SIM slot index the update belongs to.
    pub phone_id: u32,
    pub anchor_nr_cell: String,
    pub nr_bandwidths: String,
    pub nr_bands: String,
    pub configs: Vec<PhysicalChannelConfig>,
}

impl ChannelConfigUpdate {
    pub fn parse(message: &str) -> Result<Self, ParseError> {
        let marker = message.find(UPDATE_MARKER).ok_or(ParseError::NotAnUpdate)?;
        let open = message[..marker].rfind('[').ok_or(ParseError::NotAnUpdate)?;
        let raw_phone_id = &message[open + 1..marker];
        let phone_id = raw_phone_id
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidPhoneId(raw_phone_id.to_string()))?;

        let rest = &message[marker + UPDATE_MARKER.len()..];
        let rest = rest
            .strip_prefix("anchorNrCell=")
            .ok_or(ParseError::MissingField("anchorNrCell"))?;
        let (anchor_nr_cell, rest) = rest
            .split_once(", nrBandwidths=")
            .ok_or(ParseError::MissingField("nrBandwidths"))?;
        let (nr_bandwidths, rest) = rest
            .split_once(", nrBands=")
            .ok_or(ParseError::MissingField("nrBands"))?;
        let (nr_bands, mut rest) = rest
            .split_once(", configs=")
            .ok_or(ParseError::MissingField("configs"))?;

        let mut configs = Vec::new();
        while let Some(start) = rest.find(RECORD_OPEN) {
            let record = &rest[start + 1..];
            let end = record.find('}').ok_or(ParseError::UnterminatedRecord)?;
            configs.push(PhysicalChannelConfig::parse(&record[..end])?);
            rest = &record[end + 1..];
        }

        Ok(ChannelConfigUpdate {
            phone_id,
            anchor_nr_cell: anchor_nr_cell.to_string(),
            nr_bandwidths: nr_bandwidths.to_string(),
            nr_bands: nr_bands.to_string(),
            configs,
        })
    }
}

// ─── Summary ────────────────────────────────────────────────────────────────

/// What the secondary cells say about the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelConfigSummary {
    /// LTE primary (the anchor band) with an NR secondary.
    Endc {
        primary: ResolvedBand,
        secondary: ResolvedBand,
    },
    /// Two or more secondary cells.
    CarrierAggregation {
        primary: ResolvedBand,
        secondaries: Vec<ResolvedBand>,
    },
}

/// Summarise the records of one update. `known_cells` are the resolved
/// cells from the cell list of the same slot, used to fill in records the
/// modem logged without a band.
pub fn summarize(
    configs: &[PhysicalChannelConfig],
    known_cells: &[ResolvedBand],
) -> Option<ChannelConfigSummary> {
    let primary = configs
        .iter()
        .filter(|c| c.connection_status == ConnectionStatus::PrimaryServing)
        .find_map(|c| c.to_resolved_band(known_cells))?;
    let secondaries: Vec<ResolvedBand> = configs
        .iter()
        .filter(|c| c.connection_status == ConnectionStatus::SecondaryServing)
        .filter_map(|c| c.to_resolved_band(known_cells))
        .collect();

    if secondaries.len() >= 2 {
        return Some(ChannelConfigSummary::CarrierAggregation {
            primary,
            secondaries,
        });
    }

    if !primary.is_nr && secondaries.iter().any(|s| s.is_nr) {
        // The cell list usually describes the NR leg better than the log.
        let secondary = known_cells
            .iter()
            .find(|cell| cell.is_nr)
            .or_else(|| secondaries.first())?
            .clone();
        return Some(ChannelConfigSummary::Endc { primary, secondary });
    }

    None
}
