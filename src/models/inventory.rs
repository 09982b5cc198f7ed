//! Inventory item record and its derived predicates.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Tax rate (percent) applied when an item is created without one.
pub const DEFAULT_TAX_RATE: f64 = 19.0;

/// Window used by the inventory table for its "expiring soon" badge.
pub const EXPIRING_SOON_MONTHS: u32 = 3;

/// A stock record for one product at one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    /// Unit label, e.g. `"bottle"`
    pub unit: String,
    pub unit_price: f64,
    pub bar_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    /// Date string as entered in the form (`YYYY-MM-DD` or RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub minimum_level: u32,
    /// Percentage; `None` means the default policy applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl InventoryItem {
    #[must_use]
    pub fn effective_tax_rate(&self) -> f64 {
        self.tax_rate.unwrap_or(DEFAULT_TAX_RATE)
    }

    /// `1 + taxRate/100`
    #[must_use]
    pub fn tax_multiplier(&self) -> f64 {
        1.0 + self.effective_tax_rate() / 100.0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity < self.minimum_level
    }

    /// Parses the stored expiration date. Unparseable strings count as unset.
    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let raw = self.expiration_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    /// True when an expiration date is set and lies before `deadline`.
    /// Already-expired items qualify.
    #[must_use]
    pub fn expires_before(&self, deadline: DateTime<Utc>) -> bool {
        self.expiration().is_some_and(|exp| exp < deadline)
    }

    /// Table badge predicate: expires within [`EXPIRING_SOON_MONTHS`] of `now`.
    #[must_use]
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        let deadline = now
            .checked_add_months(Months::new(EXPIRING_SOON_MONTHS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.expires_before(deadline)
    }

    /// Stock value including tax: `quantity × unitPrice × (1 + taxRate/100)`.
    #[must_use]
    pub fn valuation(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price * self.tax_multiplier()
    }

    /// Whether `other` is the same logical product (exact name, category and unit).
    #[must_use]
    pub fn same_product(&self, other: &Self) -> bool {
        self.name == other.name && self.category == other.category && self.unit == other.unit
    }
}

/// Form input for a new inventory item; the ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: f64,
    pub bar_id: String,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    pub minimum_level: u32,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewInventoryItem {
    /// Builds the stored record, filling in the default tax rate when unset.
    #[must_use]
    pub fn into_item(self, id: String) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
            unit_price: self.unit_price,
            bar_id: self.bar_id,
            supplier_id: self.supplier_id,
            expiration_date: self.expiration_date,
            minimum_level: self.minimum_level,
            tax_rate: Some(self.tax_rate.unwrap_or(DEFAULT_TAX_RATE)),
            image: self.image,
        }
    }
}
