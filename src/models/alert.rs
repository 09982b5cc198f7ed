//! Dashboard alert entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    ExpiringSoon,
}

/// One alert per (item, condition) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub bar_id: String,
    pub bar_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
