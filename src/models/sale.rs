//! Point-of-sale record.
//!
//! `bar_name` and `product_name` are snapshots taken when the sale is recorded,
//! not joins: renaming a bar later leaves historical sales untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub bar_id: String,
    pub bar_name: String,
    pub product_name: String,
    /// Unit price charged
    pub amount: f64,
    pub quantity: u32,
    /// Always derived from `amount`, `quantity` and the matched tax rate
    pub total: f64,
    pub date: DateTime<Utc>,
    pub staff_name: String,
}

impl Sale {
    /// `amount × quantity × (1 + tax_rate/100)`
    #[must_use]
    pub fn compute_total(amount: f64, quantity: u32, tax_rate: f64) -> f64 {
        amount * f64::from(quantity) * (1.0 + tax_rate / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_total_applies_tax_multiplier() {
        let total = Sale::compute_total(10.0, 3, 19.0);
        assert!((total - 35.70).abs() < 1e-9);
        assert!((Sale::compute_total(12.5, 2, 0.0) - 25.0).abs() < 1e-9);
    }
}
