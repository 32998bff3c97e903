//! Platform cell descriptors and serving-cell selection.

use serde::{Deserialize, Serialize};

/// One entry of the platform's cell list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rat", rename_all = "snake_case")]
pub enum CellIdentity {
    Lte {
        earfcn: u32,
        #[serde(default)]
        pci: Option<u32>,
    },
    Nr {
        nrarfcn: u32,
        #[serde(default)]
        pci: Option<u32>,
        /// Band numbers reported by the modem (without the `n` prefix).
        /// Often empty, sometimes wrong.
        #[serde(default)]
        bands: Vec<u16>,
    },
    /// GSM, WCDMA, CDMA, TD-SCDMA: no band information used here.
    #[serde(other)]
    Other,
}

impl CellIdentity {
    pub fn is_nr(&self) -> bool {
        matches!(self, CellIdentity::Nr { .. })
    }

    pub fn pci(&self) -> Option<u32> {
        match self {
            CellIdentity::Lte { pci, .. } | CellIdentity::Nr { pci, .. } => *pci,
            CellIdentity::Other => None,
        }
    }
}

/// Registered operator of a SIM slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub mcc: String,
    pub mnc: String,
    /// Display name (`networkOperatorName`).
    #[serde(default)]
    pub name: String,
}

impl OperatorInfo {
    /// Split a PLMN string (`"44010"`) into MCC and MNC. The MNC is the last
    /// two digits.
    pub fn from_plmn(plmn: &str, name: &str) -> Option<Self> {
        if plmn.len() < 5 || !plmn.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(OperatorInfo {
            mcc: plmn[..3].to_string(),
            mnc: plmn[plmn.len() - 2..].to_string(),
            name: name.to_string(),
        })
    }
}

/// Pick the serving cell from a cell list.
///
/// Modems disagree on where the NR cell goes: some put it first, others
/// anywhere in the list. Any NR cell wins; otherwise the first cell is the
/// serving one.
pub fn select_serving_cell(cells: &[CellIdentity]) -> Option<&CellIdentity> {
    cells
        .iter()
        .find(|cell| cell.is_nr())
        .or_else(|| cells.first())
}
