//! Rendering of statuses and channel-config summaries for stdout.

use std::fmt::Write as _;

use bandscope_core::{ChannelConfigSummary, ResolvedBand};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::state::NetworkStatus;

#[derive(Serialize)]
struct SummaryLine<'a> {
    phone_id: u32,
    #[serde(flatten)]
    summary: &'a ChannelConfigSummary,
}

pub fn render_status(status: &NetworkStatus, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(status),
        OutputFormat::Text => {
            let c = &status.classification;
            let mut line = format!("slot {}  {}  {}", status.slot, c.final_type, c.stand_alone_type);
            if let Some(band) = &status.band {
                let _ = write!(line, "  {}", describe_band(band));
                if !band.carrier_name.is_empty() {
                    let _ = write!(line, "  {}", band.carrier_name);
                }
            }
            if status.data_slot == Some(status.slot) {
                line.push_str("  [data]");
            }
            Ok(line)
        }
    }
}

pub fn render_summary(
    phone_id: u32,
    summary: &ChannelConfigSummary,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(&SummaryLine { phone_id, summary }),
        OutputFormat::Text => Ok(match summary {
            ChannelConfigSummary::Endc { primary, secondary } => format!(
                "phone {phone_id}  EN-DC  {} + {}",
                describe_band(primary),
                describe_band(secondary)
            ),
            ChannelConfigSummary::CarrierAggregation {
                primary,
                secondaries,
            } => {
                let secondaries: Vec<String> = secondaries.iter().map(describe_band).collect();
                format!(
                    "phone {phone_id}  CA  {} + {}",
                    describe_band(primary),
                    secondaries.join(", ")
                )
            }
        }),
    }
}

/// `n77 @ 643334 (3650.01 MHz)`; LTE labels get a `B` prefix.
fn describe_band(band: &ResolvedBand) -> String {
    let label = if band.is_nr || !band.is_known() {
        band.band_label.clone()
    } else {
        format!("B{}", band.band_label)
    };
    if band.frequency_mhz < 0.0 {
        format!("{label} @ {}", band.channel_number)
    } else {
        format!(
            "{label} @ {} ({} MHz)",
            band.channel_number, band.frequency_mhz
        )
    }
}
