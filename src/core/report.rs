//! Sales report generation.
//!
//! This module aggregates the sales ledger into revenue summaries and provides
//! small formatting helpers for log lines and summaries. All functions are pure
//! apart from [`generate_sales_report`], which reads the store.

use crate::{
    core::sales::get_all_sales,
    errors::Result,
    models::Sale,
    store::KvStore,
};
use serde::Serialize;

/// Number of products listed in [`SalesStats::top_products`].
pub const TOP_PRODUCTS: usize = 5;

/// Revenue attributed to one bar name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRevenue {
    pub bar_name: String,
    pub revenue: f64,
}

/// Revenue and units for one product name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_name: String,
    pub revenue: f64,
    pub units: u64,
}

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    /// Sum of sale totals
    pub total_revenue: f64,
    /// Sum of sale quantities
    pub items_sold: u64,
    /// Per-bar revenue rounded to cents, in first-seen order
    pub revenue_by_bar: Vec<BarRevenue>,
    /// Best sellers by revenue, at most [`TOP_PRODUCTS`]
    pub top_products: Vec<ProductSales>,
}

/// Report over the sales of one bar, or all bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub bar_id: Option<String>,
    pub stats: SalesStats,
    /// Most recent sales, newest first
    pub recent_sales: Vec<Sale>,
}

/// Rounds a currency amount to cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Aggregates revenue, units, per-bar revenue and top products.
///
/// Sales with a blank bar name are counted in the totals but left out of the
/// per-bar breakdown.
#[must_use]
pub fn sales_stats(sales: &[Sale]) -> SalesStats {
    let mut revenue_by_bar: Vec<BarRevenue> = Vec::new();
    let mut products: Vec<ProductSales> = Vec::new();

    for sale in sales {
        if !sale.bar_name.trim().is_empty() {
            match revenue_by_bar.iter_mut().find(|bar| bar.bar_name == sale.bar_name) {
                Some(bar) => bar.revenue += sale.total,
                None => revenue_by_bar.push(BarRevenue {
                    bar_name: sale.bar_name.clone(),
                    revenue: sale.total,
                }),
            }
        }

        match products
            .iter_mut()
            .find(|product| product.product_name == sale.product_name)
        {
            Some(product) => {
                product.revenue += sale.total;
                product.units += u64::from(sale.quantity);
            }
            None => products.push(ProductSales {
                product_name: sale.product_name.clone(),
                revenue: sale.total,
                units: u64::from(sale.quantity),
            }),
        }
    }

    for bar in &mut revenue_by_bar {
        bar.revenue = round_cents(bar.revenue);
    }
    // Stable sort keeps first-seen order among ties
    products.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    products.truncate(TOP_PRODUCTS);

    SalesStats {
        total_revenue: sales.iter().map(|sale| sale.total).sum(),
        items_sold: sales.iter().map(|sale| u64::from(sale.quantity)).sum(),
        revenue_by_bar,
        top_products: products,
    }
}

/// Generates a sales report, optionally limited to one bar.
///
/// # Arguments
/// * `store` - Key-value store holding the sales collection
/// * `bar_id` - Bar to report on, or `None` for every bar
/// * `recent_limit` - Maximum number of recent sales to include (default 10)
pub async fn generate_sales_report<S: KvStore>(
    store: &S,
    bar_id: Option<&str>,
    recent_limit: Option<usize>,
) -> Result<SalesReport> {
    let sales: Vec<Sale> = get_all_sales(store)
        .await?
        .into_iter()
        .filter(|sale| bar_id.is_none_or(|bar| sale.bar_id == bar))
        .collect();

    let limit = recent_limit.unwrap_or(10);
    let mut recent_sales = sales.clone();
    recent_sales.sort_by(|a, b| b.date.cmp(&a.date));
    recent_sales.truncate(limit);

    Ok(SalesReport {
        bar_id: bar_id.map(str::to_string),
        stats: sales_stats(&sales),
        recent_sales,
    })
}

/// Formats an amount as dollars with thousands separators, e.g. `$24,590.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let cents = format!("{:.2}", amount.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// Generates a summary line for a sale.
///
/// # Returns
/// Formatted summary like `3 x Mojito | Main Bar | $35.70 | Jane Smith`
#[must_use]
pub fn format_sale_summary(sale: &Sale) -> String {
    format!(
        "{} x {} | {} | {} | {}",
        sale.quantity,
        sale.product_name,
        sale.bar_name,
        format_currency(sale.total),
        sale.staff_name
    )
}
