//! Telemetry events, one JSON object per line.
//!
//! ```json
//! {"kind":"cell_info","slot":0,"at":"2026-10-19T08:00:00Z","operator":{"mcc":"440","mnc":"20","name":"SoftBank"},"cells":[{"rat":"nr","nrarfcn":643334,"bands":[78]}]}
//! {"kind":"display_info","slot":0,"at":"2026-10-19T08:00:01Z","override_network_type":"nr_nsa","data_network_type":"lte"}
//! {"kind":"signal_strength","slot":0,"at":"2026-10-19T08:00:02Z","has_nr_signal_strength":true}
//! {"kind":"data_subscription","slot":1,"at":"2026-10-19T08:00:03Z"}
//! ```

use bandscope_core::{CellIdentity, DataNetworkType, OperatorInfo, OverrideNetworkType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sample from one of the platform's telemetry streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// The cell list was refreshed.
    CellInfo {
        slot: u32,
        at: DateTime<Utc>,
        operator: OperatorInfo,
        cells: Vec<CellIdentity>,
    },
    /// The status-bar network type changed.
    DisplayInfo {
        slot: u32,
        at: DateTime<Utc>,
        override_network_type: OverrideNetworkType,
        data_network_type: DataNetworkType,
    },
    /// Signal strengths were refreshed. `has_nr_signal_strength` is true
    /// when any NR entry was reported.
    SignalStrength {
        slot: u32,
        at: DateTime<Utc>,
        has_nr_signal_strength: bool,
    },
    /// Mobile data moved to `slot`.
    DataSubscription { slot: u32, at: DateTime<Utc> },
}

impl TelemetryEvent {
    pub fn slot(&self) -> u32 {
        match self {
            TelemetryEvent::CellInfo { slot, .. }
            | TelemetryEvent::DisplayInfo { slot, .. }
            | TelemetryEvent::SignalStrength { slot, .. }
            | TelemetryEvent::DataSubscription { slot, .. } => *slot,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            TelemetryEvent::CellInfo { at, .. }
            | TelemetryEvent::DisplayInfo { at, .. }
            | TelemetryEvent::SignalStrength { at, .. }
            | TelemetryEvent::DataSubscription { at, .. } => *at,
        }
    }
}
