//! # bandscope-core
//!
//! Works out which radio band and generation a cellular modem is really
//! using, and what that means for the user:
//!
//! - **Band dictionary** ([`band`]): EARFCN / NR-ARFCN → band label and
//!   carrier frequency, per the 3GPP frequency plans.
//! - **Carrier registry** ([`carrier`]): which NR bands each known operator
//!   actually deploys.
//! - **Resolver** ([`resolver`]): one authoritative band answer from the
//!   channel number, the modem's band hint and the operator.
//! - **Classifier** ([`classify`]): 5G Sub-6 / mmWave / reused LTE
//!   spectrum / anchor band / maybe 5G / LTE, plus SA vs NSA.
//! - **Cells** ([`cell`]) and **channel configs** ([`channel_config`]):
//!   platform-facing inputs, i.e. cell lists and the physical channel
//!   configuration log.
//!
//! Everything here is a pure function over its arguments and `'static`
//! tables. No I/O, no shared state.

pub mod band;
pub mod carrier;
pub mod cell;
pub mod channel_config;
pub mod classify;
pub mod resolver;

pub use band::{BandKind, BandRange, UNKNOWN_BAND, UNKNOWN_FREQUENCY_MHZ};
pub use cell::{select_serving_cell, CellIdentity, OperatorInfo};
pub use channel_config::{ChannelConfigSummary, ChannelConfigUpdate, LogcatLine};
pub use classify::{
    classify, ClassificationResult, DataNetworkType, FinalNrType, OverrideNetworkType,
    StandAloneType, TelemetrySnapshot,
};
pub use resolver::{resolve_cell, resolve_nr_band, ResolvedBand};
