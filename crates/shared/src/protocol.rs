use serde::{Deserialize, Serialize};

use crate::domain::{FoodId, MarkCounts, Participant};

/// Tolerant wire form of the checklist state. Accepts both the canonical
/// shape and older persisted snapshots (single shared `count`, missing
/// `group`, log entries without `by`). `migrate::normalize` maps this to
/// the canonical [`crate::domain::ChecklistState`] at every load boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawState {
    #[serde(default)]
    pub foods: Vec<RawFood>,
    #[serde(default)]
    pub log: Vec<RawLogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFood {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    /// Legacy shared counter, superseded by `counts`.
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub counts: Option<MarkCounts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLogEntry {
    #[serde(rename = "foodId")]
    pub food_id: String,
    #[serde(rename = "foodName", default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(rename = "tsISO", default)]
    pub ts_iso: Option<String>,
}

/// Body of `POST /mark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkRequest {
    #[serde(rename = "foodId")]
    pub food_id: FoodId,
    pub by: Participant,
}

/// Envelope returned by every mutating endpoint: the complete resulting
/// state, never a delta.
#[derive(Debug, Clone, Deserialize)]
pub struct StateEnvelope {
    pub state: RawState,
}

/// Optional error payload carried by non-2xx responses. An unparseable
/// body deserializes as the empty default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Text to surface to the user, if the service provided any.
    pub fn into_message(self) -> Option<String> {
        self.message
            .into_iter()
            .chain(self.error)
            .find(|text| !text.trim().is_empty())
    }
}
