//! Audit record for one item moved between bars. Never edited once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub source_bar_id: String,
    pub target_bar_id: String,
    pub quantity: u32,
    pub unit: String,
    pub transferred_by: String,
    pub date: DateTime<Utc>,
}
