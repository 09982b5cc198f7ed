//! Transfer engine - Moves stock between bars and keeps the audit trail.
//!
//! A transfer is all-or-nothing across its batch: every line is validated
//! against the current collection before any quantity changes, and the
//! inventory is only written once the whole batch has been applied in memory.
//! The inventory write and the transfer-record append are two separate store
//! writes; nothing ties them together.

use crate::{
    core::session::Session,
    errors::{Error, Result},
    models::{BarDirectory, InventoryItem, TransferRecord, new_id},
    store::{
        INVENTORY_KEY, KvStore, TRANSFERS_KEY, clear_collection, load_collection, save_collection,
    },
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::info;

/// One selected source item and the amount to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLine {
    pub item_id: String,
    pub quantity: u32,
}

impl TransferLine {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// A batch of lines moving from one source bar to one target bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    /// `None` when no target has been selected yet
    pub target_bar_id: Option<String>,
    pub lines: Vec<TransferLine>,
}

impl TransferRequest {
    pub fn new(target_bar_id: impl Into<String>, lines: Vec<TransferLine>) -> Self {
        Self {
            target_bar_id: Some(target_bar_id.into()),
            lines,
        }
    }

    /// Convenience for the common single-item transfer.
    pub fn single(item_id: impl Into<String>, target_bar_id: impl Into<String>, quantity: u32) -> Self {
        Self::new(target_bar_id, vec![TransferLine::new(item_id, quantity)])
    }
}

/// Result of a successful transfer: one record per moved item.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub target_bar_id: String,
    pub records: Vec<TransferRecord>,
}

impl TransferOutcome {
    /// Human-readable confirmation for the notification surface.
    #[must_use]
    pub fn message(&self, bars: &BarDirectory) -> String {
        let target = bars.name_of(&self.target_bar_id);
        match self.records.as_slice() {
            [record] => format!(
                "Transferred {} {}(s) of {} to {}",
                record.quantity, record.unit, record.item_name, target
            ),
            records => format!(
                "Successfully transferred {} items to {}",
                records.len(),
                target
            ),
        }
    }
}

/// Validates every line of the request against the current items and returns
/// the `(source, target)` bar ids. Nothing is mutated.
fn validate_request(
    request: &TransferRequest,
    items: &[InventoryItem],
    bars: &BarDirectory,
) -> Result<(String, String)> {
    if request.lines.is_empty() {
        return Err(Error::validation(
            "items",
            "Please select at least one item to transfer",
        ));
    }
    let target_bar_id = request
        .target_bar_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::validation("targetBarId", "Please select a target bar"))?;
    bars.require(target_bar_id)?;

    let mut source_bar_id: Option<&str> = None;
    let mut seen = HashSet::new();

    for line in &request.lines {
        let item = items
            .iter()
            .find(|item| item.id == line.item_id)
            .ok_or_else(|| Error::ItemNotFound {
                id: line.item_id.clone(),
            })?;

        if !seen.insert(item.id.as_str()) {
            return Err(Error::validation(
                "items",
                format!("{} is selected more than once", item.name),
            ));
        }

        match source_bar_id {
            None => source_bar_id = Some(item.bar_id.as_str()),
            Some(bar) if bar != item.bar_id => {
                return Err(Error::validation(
                    "items",
                    "All selected items must come from the same bar",
                ));
            }
            Some(_) => {}
        }

        if line.quantity == 0 {
            return Err(Error::validation(
                "quantity",
                format!("Quantity for {} must be greater than 0", item.name),
            ));
        }
        if line.quantity > item.quantity {
            return Err(Error::InsufficientStock {
                item: item.name.clone(),
                available: item.quantity,
                requested: line.quantity,
            });
        }
    }

    let source_bar_id = source_bar_id.unwrap_or_default();
    if source_bar_id == target_bar_id {
        return Err(Error::validation(
            "targetBarId",
            "Target bar must differ from the source bar",
        ));
    }

    Ok((source_bar_id.to_string(), target_bar_id.to_string()))
}

/// Applies a validated batch to `items` in memory and builds the audit records.
fn apply_transfer(
    items: &mut Vec<InventoryItem>,
    lines: &[TransferLine],
    source_bar_id: &str,
    target_bar_id: &str,
    actor: &str,
    timestamp: DateTime<Utc>,
) -> Result<Vec<TransferRecord>> {
    let mut records = Vec::with_capacity(lines.len());

    for line in lines {
        let source_index = items
            .iter()
            .position(|item| item.id == line.item_id)
            .ok_or_else(|| Error::ItemNotFound {
                id: line.item_id.clone(),
            })?;

        let source = items[source_index].clone();
        items[source_index].quantity = source.quantity.checked_sub(line.quantity).ok_or_else(|| {
            Error::InsufficientStock {
                item: source.name.clone(),
                available: source.quantity,
                requested: line.quantity,
            }
        })?;

        let target = items
            .iter_mut()
            .find(|item| item.bar_id == target_bar_id && item.same_product(&source));
        if let Some(target) = target {
            target.quantity = target
                .quantity
                .checked_add(line.quantity)
                .ok_or_else(|| Error::validation("quantity", "Quantity is too large"))?;
        } else {
            items.push(InventoryItem {
                id: new_id("item"),
                bar_id: target_bar_id.to_string(),
                quantity: line.quantity,
                ..source.clone()
            });
        }

        records.push(TransferRecord {
            id: new_id("transfer"),
            item_id: source.id,
            item_name: source.name,
            source_bar_id: source_bar_id.to_string(),
            target_bar_id: target_bar_id.to_string(),
            quantity: line.quantity,
            unit: source.unit,
            transferred_by: actor.to_string(),
            date: timestamp,
        });
    }

    Ok(records)
}

/// Moves the requested quantities from the source bar to the target bar.
///
/// Source records are decremented. At the target, an item with the same name,
/// category and unit (exact match) is incremented; otherwise a new record is
/// created carrying over the source metadata. One [`TransferRecord`] per line
/// is appended, all sharing one timestamp.
///
/// # Errors
/// Returns an error if:
/// - The session user is not a manager (checked first)
/// - No items are selected, or no target bar is selected
/// - The target bar is unknown or equals the source bar
/// - A selected item is missing, selected twice, or from a different bar
/// - A requested quantity is zero or exceeds the item's stock
///
/// Any failure leaves both collections untouched.
pub async fn transfer_items<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    request: &TransferRequest,
) -> Result<TransferOutcome> {
    let actor = session.require_manager("transfer inventory items")?;

    let mut items: Vec<InventoryItem> = load_collection(store, INVENTORY_KEY).await?;
    let (source_bar_id, target_bar_id) = validate_request(request, &items, bars)?;

    let records = apply_transfer(
        &mut items,
        &request.lines,
        &source_bar_id,
        &target_bar_id,
        &actor.name,
        Utc::now(),
    )?;

    save_collection(store, INVENTORY_KEY, &items).await?;

    let mut history: Vec<TransferRecord> = load_collection(store, TRANSFERS_KEY).await?;
    history.extend(records.iter().cloned());
    save_collection(store, TRANSFERS_KEY, &history).await?;

    let outcome = TransferOutcome {
        target_bar_id,
        records,
    };
    info!("{} (by {})", outcome.message(bars), actor.name);
    Ok(outcome)
}

/// Which side of a transfer a bar filter matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferDirection {
    /// Bar is the source or the target
    #[default]
    All,
    /// Bar is the target
    Incoming,
    /// Bar is the source
    Outgoing,
}

#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    pub bar_id: Option<String>,
    pub direction: TransferDirection,
    pub limit: Option<usize>,
}

/// Filters transfer history, newest first.
#[must_use]
pub fn filter_transfers(records: &[TransferRecord], filter: &TransferFilter) -> Vec<TransferRecord> {
    let mut matches: Vec<TransferRecord> = records
        .iter()
        .filter(|record| {
            filter.bar_id.as_deref().is_none_or(|bar| match filter.direction {
                TransferDirection::All => record.source_bar_id == bar || record.target_bar_id == bar,
                TransferDirection::Incoming => record.target_bar_id == bar,
                TransferDirection::Outgoing => record.source_bar_id == bar,
            })
        })
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = filter.limit.filter(|&n| n > 0) {
        matches.truncate(limit);
    }
    matches
}

/// Loads and filters transfer history, newest first.
pub async fn list_transfers<S: KvStore>(
    store: &S,
    filter: &TransferFilter,
) -> Result<Vec<TransferRecord>> {
    let records: Vec<TransferRecord> = load_collection(store, TRANSFERS_KEY).await?;
    Ok(filter_transfers(&records, filter))
}

/// Groups records written by the same transfer action (same timestamp and actor),
/// preserving input order.
#[must_use]
pub fn group_batches(records: &[TransferRecord]) -> Vec<Vec<TransferRecord>> {
    let mut batches: Vec<Vec<TransferRecord>> = Vec::new();
    for record in records {
        match batches.last_mut() {
            Some(batch)
                if batch[0].date == record.date
                    && batch[0].transferred_by == record.transferred_by =>
            {
                batch.push(record.clone());
            }
            _ => batches.push(vec![record.clone()]),
        }
    }
    batches
}

/// Clears the whole transfer history.
pub async fn reset_transfers<S: KvStore>(store: &S, session: &Session) -> Result<()> {
    let actor = session.require_manager("reset transfer history")?;
    clear_collection(store, TRANSFERS_KEY).await?;
    info!("Transfer history cleared by {}", actor.name);
    Ok(())
}
