//! # Telemetry Tracker
//!
//! The platform delivers cell lists, display overrides and signal strengths
//! on separate streams, at different rates, for every SIM slot. The tracker
//! keeps the latest sample of each stream per slot with its timestamp,
//! turns them into one [`TelemetrySnapshot`] whenever something changes or
//! the poll timer fires, and reports a [`NetworkStatus`] only when it
//! differs from the last one reported for that slot.
//!
//! Display info has no polling API on the platform, so the last override is
//! kept until replaced. Cell lists go stale after `stale_after`. Which slot
//! carries mobile data is device-wide and is stamped on every slot's status.

use std::collections::BTreeMap;
use std::time::Duration;

use bandscope_core::resolver::resolve_cell;
use bandscope_core::{
    classify, select_serving_cell, CellIdentity, ClassificationResult, DataNetworkType,
    OperatorInfo, OverrideNetworkType, ResolvedBand, TelemetrySnapshot,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::events::TelemetryEvent;

/// A stream value and when it was sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamped<T> {
    pub value: T,
    pub at: DateTime<Utc>,
}

/// Latest cell list together with the operator it was reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSample {
    pub operator: OperatorInfo,
    pub cells: Vec<CellIdentity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySample {
    pub override_network_type: OverrideNetworkType,
    pub data_network_type: DataNetworkType,
}

/// Per-slot stream state.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub cell_info: Option<Timestamped<CellSample>>,
    pub display_info: Option<Timestamped<DisplaySample>>,
    pub nr_signal: Option<Timestamped<bool>>,
}

impl SlotState {
    /// Store an event. Returns false when the event is older than the
    /// sample already held for its stream.
    pub fn apply(&mut self, event: &TelemetryEvent) -> bool {
        let at = event.at();
        match event {
            TelemetryEvent::CellInfo {
                operator, cells, ..
            } => store(
                &mut self.cell_info,
                at,
                CellSample {
                    operator: operator.clone(),
                    cells: cells.clone(),
                },
            ),
            TelemetryEvent::DisplayInfo {
                override_network_type,
                data_network_type,
                ..
            } => store(
                &mut self.display_info,
                at,
                DisplaySample {
                    override_network_type: *override_network_type,
                    data_network_type: *data_network_type,
                },
            ),
            TelemetryEvent::SignalStrength {
                has_nr_signal_strength,
                ..
            } => store(&mut self.nr_signal, at, *has_nr_signal_strength),
            // Device-wide, held by the tracker.
            TelemetryEvent::DataSubscription { .. } => false,
        }
    }

    /// Serving cell resolved from the current cell list, unless it is stale.
    pub fn serving_band(&self, now: DateTime<Utc>, stale_after: Duration) -> Option<ResolvedBand> {
        let sample = self.cell_info.as_ref()?;
        if is_stale(sample.at, now, stale_after) {
            return None;
        }
        select_serving_cell(&sample.value.cells)
            .and_then(|cell| resolve_cell(cell, &sample.value.operator))
    }

    pub fn snapshot(&self, now: DateTime<Utc>, stale_after: Duration) -> TelemetrySnapshot {
        TelemetrySnapshot {
            resolved_band: self.serving_band(now, stale_after),
            override_network_type: self.display_info.as_ref().map(|d| d.value.override_network_type),
            has_nr_signal_strength_only: self.nr_signal.as_ref().is_some_and(|s| s.value),
            data_network_type: self.display_info.as_ref().map(|d| d.value.data_network_type),
        }
    }
}

fn store<T>(slot: &mut Option<Timestamped<T>>, at: DateTime<Utc>, value: T) -> bool {
    if slot.as_ref().is_some_and(|current| current.at > at) {
        return false;
    }
    *slot = Some(Timestamped { value, at });
    true
}

fn is_stale(sampled: DateTime<Utc>, now: DateTime<Utc>, stale_after: Duration) -> bool {
    // A clock step backwards yields a negative age, which counts as fresh.
    (now - sampled)
        .to_std()
        .is_ok_and(|age| age > stale_after)
}

/// Connection state of one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStatus {
    pub slot: u32,
    pub band: Option<ResolvedBand>,
    /// Slot currently carrying mobile data, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_slot: Option<u32>,
    #[serde(flatten)]
    pub classification: ClassificationResult,
}

/// The last status reported for a slot and when it was reported.
#[derive(Debug, Clone, PartialEq)]
pub struct LastKnownReading {
    pub status: NetworkStatus,
    pub at: DateTime<Utc>,
}

/// Merges telemetry streams for every SIM slot.
pub struct TelemetryTracker {
    stale_after: Duration,
    slots: BTreeMap<u32, SlotState>,
    data_slot: Option<Timestamped<u32>>,
    last_known: BTreeMap<u32, LastKnownReading>,
}

impl TelemetryTracker {
    pub fn new(stale_after: Duration) -> Self {
        TelemetryTracker {
            stale_after,
            slots: BTreeMap::new(),
            data_slot: None,
            last_known: BTreeMap::new(),
        }
    }

    /// Number of slots seen so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Last reported status of every slot, in slot order.
    pub fn last_known(&self) -> impl Iterator<Item = (u32, &LastKnownReading)> {
        self.last_known.iter().map(|(slot, reading)| (*slot, reading))
    }

    /// Apply one event and re-evaluate as of the event time. Returns the
    /// statuses that changed: the event's slot, or every slot when the data
    /// subscription moved.
    pub fn apply(&mut self, event: &TelemetryEvent) -> Vec<NetworkStatus> {
        let slot = event.slot();
        let at = event.at();
        if let TelemetryEvent::DataSubscription { .. } = event {
            if !store(&mut self.data_slot, at, slot) {
                tracing::debug!(slot, %at, "out-of-order data subscription dropped");
                return Vec::new();
            }
            return self.tick(at);
        }

        let state = self.slots.entry(slot).or_default();
        if !state.apply(event) {
            tracing::debug!(slot, %at, "out-of-order event dropped");
            return Vec::new();
        }
        self.evaluate(slot, at).into_iter().collect()
    }

    /// Re-evaluate every slot as of `now`. Used by the poll timer, which is
    /// what notices cell info going stale.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<NetworkStatus> {
        let slots: Vec<u32> = self.slots.keys().copied().collect();
        slots
            .into_iter()
            .filter_map(|slot| self.evaluate(slot, now))
            .collect()
    }

    /// Current status of a slot as of `now`, without change detection.
    pub fn status(&self, slot: u32, now: DateTime<Utc>) -> Option<NetworkStatus> {
        let state = self.slots.get(&slot)?;
        let snapshot = state.snapshot(now, self.stale_after);
        Some(NetworkStatus {
            slot,
            classification: classify(&snapshot),
            band: snapshot.resolved_band,
            data_slot: self.data_slot.as_ref().map(|d| d.value),
        })
    }

    fn evaluate(&mut self, slot: u32, now: DateTime<Utc>) -> Option<NetworkStatus> {
        let status = self.status(slot, now)?;
        if self
            .last_known
            .get(&slot)
            .is_some_and(|last| last.status == status)
        {
            return None;
        }

        tracing::debug!(
            slot,
            final_type = ?status.classification.final_type,
            band = status.band.as_ref().map_or("-", |b| b.band_label.as_str()),
            "status changed"
        );
        self.last_known.insert(
            slot,
            LastKnownReading {
                status: status.clone(),
                at: now,
            },
        );
        Some(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandscope_core::{FinalNrType, StandAloneType};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_800_000_000 + secs, 0).unwrap()
    }

    fn softbank() -> OperatorInfo {
        OperatorInfo {
            mcc: "440".into(),
            mnc: "20".into(),
            name: "SoftBank".into(),
        }
    }

    fn cell_info(slot: u32, secs: i64, cells: Vec<CellIdentity>) -> TelemetryEvent {
        TelemetryEvent::CellInfo {
            slot,
            at: at(secs),
            operator: softbank(),
            cells,
        }
    }

    fn display(slot: u32, secs: i64, ov: OverrideNetworkType, data: DataNetworkType) -> TelemetryEvent {
        TelemetryEvent::DisplayInfo {
            slot,
            at: at(secs),
            override_network_type: ov,
            data_network_type: data,
        }
    }

    fn lte_cells() -> Vec<CellIdentity> {
        vec![CellIdentity::Lte {
            earfcn: 1850,
            pci: None,
        }]
    }

    fn nr_cells() -> Vec<CellIdentity> {
        vec![
            CellIdentity::Lte {
                earfcn: 1850,
                pci: None,
            },
            CellIdentity::Nr {
                nrarfcn: 643_334,
                pci: None,
                bands: vec![78],
            },
        ]
    }

    #[test]
    fn first_event_reports_a_status() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        let status = tracker.apply(&cell_info(0, 0, lte_cells())).pop().unwrap();
        assert_eq!(status.slot, 0);
        assert_eq!(status.classification.final_type, FinalNrType::Lte);
        assert_eq!(status.band.unwrap().band_label, "3");
        assert_eq!(tracker.slot_count(), 1);
    }

    #[test]
    fn identical_status_is_not_repeated() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        assert_eq!(tracker.apply(&cell_info(0, 0, lte_cells())).len(), 1);
        assert!(tracker.apply(&cell_info(0, 1, lte_cells())).is_empty());
        assert_eq!(tracker.last_known[&0].at, at(0));
    }

    #[test]
    fn display_info_merges_into_the_cell_state() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 0, lte_cells()));
        let status = tracker
            .apply(&display(0, 1, OverrideNetworkType::NrNsa, DataNetworkType::Lte))
            .pop()
            .unwrap();
        assert_eq!(status.classification.final_type, FinalNrType::AnchorBand);
        assert_eq!(
            status.classification.stand_alone_type,
            StandAloneType::NonStandalone
        );

        let status = tracker.apply(&cell_info(0, 2, nr_cells())).pop().unwrap();
        assert_eq!(status.classification.final_type, FinalNrType::NrSub6);
        assert_eq!(status.band.unwrap().band_label, "n77");
    }

    #[test]
    fn nr_signal_without_nr_cell_is_maybe_nr() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 0, lte_cells()));
        let status = tracker
            .apply(&TelemetryEvent::SignalStrength {
                slot: 0,
                at: at(1),
                has_nr_signal_strength: true,
            })
            .pop()
            .unwrap();
        assert_eq!(status.classification.final_type, FinalNrType::MaybeNr);
    }

    #[test]
    fn slots_are_independent() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 0, lte_cells()));
        let status = tracker.apply(&cell_info(1, 0, nr_cells())).pop().unwrap();
        assert_eq!(status.slot, 1);
        let finals: Vec<_> = tracker
            .last_known()
            .map(|(slot, r)| (slot, r.status.classification.final_type))
            .collect();
        assert_eq!(finals, [(0, FinalNrType::Lte), (1, FinalNrType::NrSub6)]);
        assert_eq!(tracker.slot_count(), 2);
    }

    #[test]
    fn stale_cell_info_becomes_error_on_tick() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 0, nr_cells()));
        assert!(tracker.tick(at(10)).is_empty());

        let changed = tracker.tick(at(11));
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].classification.final_type, FinalNrType::Error);
        assert!(changed[0].band.is_none());
        assert!(tracker.tick(at(12)).is_empty());
    }

    #[test]
    fn out_of_order_events_are_dropped() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 5, nr_cells()));
        assert!(tracker.apply(&cell_info(0, 3, lte_cells())).is_empty());
        let held = tracker.slots[&0].cell_info.as_ref().unwrap();
        assert_eq!(held.at, at(5));
        assert_eq!(held.value.cells.len(), 2);
    }

    #[test]
    fn status_serialises_flat() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        let status = tracker.apply(&cell_info(0, 0, nr_cells())).pop().unwrap();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["slot"], 0);
        assert_eq!(json["final_type"], "NR_SUB6");
        assert_eq!(json["stand_alone_type"], "NOT_APPLICABLE");
        assert_eq!(json["band"]["band_label"], "n77");
    }

    #[test]
    fn data_subscription_is_stamped_on_every_slot() {
        let mut tracker = TelemetryTracker::new(Duration::from_secs(10));
        tracker.apply(&cell_info(0, 0, lte_cells()));
        tracker.apply(&cell_info(1, 0, nr_cells()));
        assert_eq!(tracker.status(0, at(0)).unwrap().data_slot, None);

        let changed = tracker.apply(&TelemetryEvent::DataSubscription { slot: 1, at: at(1) });
        let stamped: Vec<_> = changed.iter().map(|s| (s.slot, s.data_slot)).collect();
        assert_eq!(stamped, [(0, Some(1)), (1, Some(1))]);

        // Repeating it changes nothing; an older one is dropped.
        assert!(tracker
            .apply(&TelemetryEvent::DataSubscription { slot: 1, at: at(2) })
            .is_empty());
        assert!(tracker
            .apply(&TelemetryEvent::DataSubscription { slot: 0, at: at(1) })
            .is_empty());

        let json = serde_json::to_value(tracker.status(0, at(3)).unwrap()).unwrap();
        assert_eq!(json["data_slot"], 1);
    }
}
