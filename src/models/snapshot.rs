use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use crate::models::ClientRecord;

/// Slot index of a client on the board
pub type SlotId = u32;

/// Number of slots on a freshly initialized board
pub const DEFAULT_SLOT_COUNT: SlotId = 24;

/// The persisted board document.
///
/// Slot keys serialize as decimal strings (`"0"`, `"1"`, ...). Progress
/// values are kept as raw integers here; range checking happens when the
/// board adopts a snapshot. A null map or null entry reads as its default,
/// so one bad value never discards the rest of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub progress: BTreeMap<SlotId, i64>,
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub clients: BTreeMap<SlotId, ClientRecord>,
}

fn null_entries_as_default<'de, D, T>(deserializer: D) -> Result<BTreeMap<SlotId, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let raw: Option<BTreeMap<SlotId, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(slot, value)| (slot, value.unwrap_or_default()))
        .collect())
}

impl Snapshot {
    /// A board of `slots` empty clients, all at the first stage
    pub fn with_defaults(slots: SlotId) -> Self {
        Snapshot {
            progress: (0..slots).map(|slot| (slot, 0)).collect(),
            clients: (0..slots).map(|slot| (slot, ClientRecord::default())).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
