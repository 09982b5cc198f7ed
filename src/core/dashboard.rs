//! Dashboard aggregator - Read-side projections over inventory and sales.
//!
//! Nothing here is cached. Every figure is recomputed from whatever the store
//! holds at call time, so an emptied collection immediately reports zeros.

use crate::{
    core::{inventory::get_all_items, sales::get_all_sales},
    errors::Result,
    models::{AlertKind, BarDirectory, InventoryAlert, InventoryItem, Sale},
    store::KvStore,
};
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::Serialize;
use tracing::debug;

/// Window used by dashboard expiry alerts and the `expiringSoon` counter.
pub const ALERT_EXPIRY_DAYS: i64 = 3;

/// Number of calendar days (today included) shown on the weekly sales chart.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sales: f64,
    pub orders_completed: usize,
    pub low_stock_items: usize,
    pub expiring_soon: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTotal {
    pub series: String,
    pub total: f64,
}

/// One weekday column of the weekly sales chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySales {
    pub day: String,
    pub totals: Vec<SeriesTotal>,
}

impl WeekdaySales {
    /// Total for one chart series, zero when absent.
    #[must_use]
    pub fn total_for(&self, series: &str) -> f64 {
        self.totals
            .iter()
            .find(|entry| entry.series == series)
            .map_or(0.0, |entry| entry.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarValuation {
    pub bar_id: String,
    pub bar_name: String,
    pub valuation: f64,
}

/// Row of the inventory-levels chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryLevel {
    pub name: String,
    pub current: u32,
    pub minimum: u32,
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub alerts: Vec<InventoryAlert>,
    pub weekly_sales: Vec<WeekdaySales>,
    pub valuations: Vec<BarValuation>,
    pub inventory_levels: Vec<InventoryLevel>,
}

fn alert_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(ALERT_EXPIRY_DAYS)
}

/// Summary counters. Already-expired items count as expiring soon.
#[must_use]
pub fn compute_stats(items: &[InventoryItem], sales: &[Sale], now: DateTime<Utc>) -> DashboardStats {
    let deadline = alert_deadline(now);
    DashboardStats {
        total_sales: sales.iter().map(|sale| sale.total).sum(),
        orders_completed: sales.len(),
        low_stock_items: items.iter().filter(|item| item.is_low_stock()).count(),
        expiring_soon: items
            .iter()
            .filter(|item| item.expires_before(deadline))
            .count(),
    }
}

fn expiry_message(name: &str, expiration: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (expiration.date_naive() - now.date_naive()).num_days();
    match days {
        d if d < 0 => format!("{name} has expired"),
        0 => format!("{name} expires today"),
        1 => format!("{name} expiring in 1 day"),
        d => format!("{name} expiring in {d} days"),
    }
}

/// Builds at most one alert per (item, condition) pair: low stock first,
/// then expiry, in inventory order.
#[must_use]
pub fn alerts(items: &[InventoryItem], bars: &BarDirectory, now: DateTime<Utc>) -> Vec<InventoryAlert> {
    let deadline = alert_deadline(now);
    let alert = |item: &InventoryItem, kind: AlertKind, message: String| {
        let tag = match kind {
            AlertKind::LowStock => "low_stock",
            AlertKind::ExpiringSoon => "expiring_soon",
        };
        InventoryAlert {
            id: format!("{tag}-{}", item.id),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            kind,
            bar_id: item.bar_id.clone(),
            bar_name: bars.name_of(&item.bar_id).to_string(),
            message,
            created_at: now,
        }
    };

    let low_stock = items.iter().filter(|item| item.is_low_stock()).map(|item| {
        alert(
            item,
            AlertKind::LowStock,
            format!(
                "{} is below minimum stock level ({} of {})",
                item.name, item.quantity, item.minimum_level
            ),
        )
    });
    let expiring = items.iter().filter_map(|item| {
        let expiration = item.expiration().filter(|exp| *exp < deadline)?;
        Some(alert(
            item,
            AlertKind::ExpiringSoon,
            expiry_message(&item.name, expiration, now),
        ))
    });
    low_stock.chain(expiring).collect()
}

/// Valuation of one bar's stock including tax.
#[must_use]
pub fn bar_valuation(items: &[InventoryItem], bar_id: &str) -> f64 {
    items
        .iter()
        .filter(|item| item.bar_id == bar_id)
        .map(InventoryItem::valuation)
        .sum()
}

/// Valuation for every configured bar, in directory order.
#[must_use]
pub fn valuation_by_bar(items: &[InventoryItem], bars: &BarDirectory) -> Vec<BarValuation> {
    bars.iter()
        .map(|bar| BarValuation {
            bar_id: bar.id.clone(),
            bar_name: bar.name.clone(),
            valuation: bar_valuation(items, &bar.id),
        })
        .collect()
}

/// Sales totals per weekday (Mon..Sun) and chart series.
///
/// Only sales dated within the last [`WEEKLY_WINDOW_DAYS`] calendar days
/// (today included) are counted. Sales whose stored bar name maps to no chart
/// series are skipped.
#[must_use]
pub fn weekly_sales(sales: &[Sale], bars: &BarDirectory, now: DateTime<Utc>) -> Vec<WeekdaySales> {
    let series = bars.series();
    let mut chart: Vec<WeekdaySales> = WEEKDAYS
        .iter()
        .map(|day| WeekdaySales {
            day: day.to_string(),
            totals: series
                .iter()
                .map(|label| SeriesTotal {
                    series: (*label).to_string(),
                    total: 0.0,
                })
                .collect(),
        })
        .collect();

    let today = now.date_naive();
    let first_day = today - Duration::days(WEEKLY_WINDOW_DAYS - 1);
    for sale in sales {
        let day = sale.date.date_naive();
        if day < first_day || day > today {
            continue;
        }
        let Some(label) = bars.series_for_name(&sale.bar_name) else {
            debug!("Sale {} at unmapped bar {:?} left off the chart", sale.id, sale.bar_name);
            continue;
        };
        let column = &mut chart[day.weekday().num_days_from_monday() as usize];
        if let Some(entry) = column.totals.iter_mut().find(|entry| entry.series == label) {
            entry.total += sale.total;
        }
    }
    chart
}

/// Current vs. minimum levels, optionally for one bar.
#[must_use]
pub fn inventory_levels(items: &[InventoryItem], bar_id: Option<&str>) -> Vec<InventoryLevel> {
    items
        .iter()
        .filter(|item| bar_id.is_none_or(|bar| item.bar_id == bar))
        .map(|item| InventoryLevel {
            name: item.name.clone(),
            current: item.quantity,
            minimum: item.minimum_level,
        })
        .collect()
}

/// Reads both collections and projects the full dashboard.
pub async fn build_dashboard<S: KvStore>(
    store: &S,
    bars: &BarDirectory,
    now: DateTime<Utc>,
) -> Result<Dashboard> {
    let items = get_all_items(store).await?;
    let sales = get_all_sales(store).await?;

    Ok(Dashboard {
        stats: compute_stats(&items, &sales, now),
        alerts: alerts(&items, bars, now),
        weekly_sales: weekly_sales(&sales, bars, now),
        valuations: valuation_by_bar(&items, bars),
        inventory_levels: inventory_levels(&items, None),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::inventory::reset_inventory;
    use crate::store::{MemoryStore, SALES_KEY, save_collection};
    use crate::test_utils::*;
    use chrono::TimeZone;

    // A Wednesday
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    fn sale(id: &str, bar_name: &str, total: f64, date: DateTime<Utc>) -> Sale {
        Sale {
            id: id.to_string(),
            bar_id: "1".to_string(),
            bar_name: bar_name.to_string(),
            product_name: "Mojito".to_string(),
            amount: total,
            quantity: 1,
            total,
            date,
            staff_name: "Jane Smith".to_string(),
        }
    }

    fn expiring(name: &str, date: &str) -> InventoryItem {
        let mut item = sample_item(name, "1", 10, 2);
        item.expiration_date = Some(date.to_string());
        item
    }

    #[test]
    fn test_stats_count_sales_low_stock_and_expiry() {
        let now = fixed_now();
        let items = vec![
            sample_item("Tequila", "1", 9, 10),
            sample_item("Wine", "2", 10, 10),
            expiring("Lime Juice", "2024-05-17"),
            expiring("Cream", "2024-05-01"),
            expiring("Syrup", "2024-07-01"),
        ];
        let sales = vec![
            sale("a", "Main Bar", 35.70, now),
            sale("b", "Economa", 10.0, now),
        ];

        let stats = compute_stats(&items, &sales, now);
        assert!(approx_eq(stats.total_sales, 45.70));
        assert_eq!(stats.orders_completed, 2);
        assert_eq!(stats.low_stock_items, 1);
        // Lime Juice (2 days) and the already-expired Cream
        assert_eq!(stats.expiring_soon, 2);
        // The table badge uses the wider window
        assert!(items[4].is_expiring_soon(now));
    }

    #[test]
    fn test_alert_messages() {
        let now = fixed_now();
        let mut lime = expiring("Fresh Lime Juice", "2024-05-17");
        lime.quantity = 1;
        let items = vec![sample_item("Tequila", "1", 9, 10), lime];

        let alerts = alerts(&items, &BarDirectory::default(), now);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].kind, AlertKind::LowStock);
        assert_eq!(
            alerts[0].message,
            "Tequila is below minimum stock level (9 of 10)"
        );
        assert_eq!(alerts[0].bar_name, "Main Bar");
        assert_eq!(alerts[1].item_name, "Fresh Lime Juice");
        assert_eq!(alerts[1].kind, AlertKind::LowStock);
        assert_eq!(alerts[2].kind, AlertKind::ExpiringSoon);
        assert_eq!(alerts[2].message, "Fresh Lime Juice expiring in 2 days");

        let mut ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_expiry_message_edges() {
        let now = fixed_now();
        let at = |d: u32| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap();
        assert_eq!(expiry_message("Milk", at(15), now), "Milk expires today");
        assert_eq!(expiry_message("Milk", at(16), now), "Milk expiring in 1 day");
        assert_eq!(expiry_message("Milk", at(10), now), "Milk has expired");
    }

    #[test]
    fn test_bar_valuation_includes_tax() {
        let mut untaxed = sample_item("Water", "1", 10, 0);
        untaxed.unit_price = 2.0;
        untaxed.tax_rate = Some(0.0);
        // 5 × 20 × 1.19 = 119
        let items = vec![
            sample_item("Vodka", "1", 5, 0),
            untaxed,
            sample_item("Gin", "2", 100, 0),
        ];

        assert!(approx_eq(bar_valuation(&items, "1"), 119.0 + 20.0));
        assert!(approx_eq(bar_valuation(&items, "3"), 0.0));

        let by_bar = valuation_by_bar(&items, &BarDirectory::default());
        assert_eq!(by_bar.len(), 3);
        assert_eq!(by_bar[1].bar_name, "Economa");
        assert!(approx_eq(by_bar[1].valuation, 100.0 * 20.0 * 1.19));
    }

    #[test]
    fn test_weekly_sales_buckets_last_seven_days() {
        let now = fixed_now();
        let bars = BarDirectory::default();
        let sales = vec![
            sale("today", "Main Bar", 10.0, now),
            sale("monday", "Economa", 5.0, now - Duration::days(2)),
            sale("last-thursday", "Main Bar", 7.0, now - Duration::days(6)),
            // Eight days back falls outside the window
            sale("stale", "Main Bar", 100.0, now - Duration::days(8)),
            sale("pool", "Pool Bar", 50.0, now),
        ];

        let chart = weekly_sales(&sales, &bars, now);
        assert_eq!(chart.len(), 7);
        assert_eq!(chart[0].day, "Mon");
        assert!(approx_eq(chart[0].total_for("Economa"), 5.0));
        assert!(approx_eq(chart[2].total_for("Main"), 10.0));
        assert!(approx_eq(chart[3].total_for("Main"), 7.0));
        assert!(approx_eq(chart[1].total_for("Main"), 0.0));

        let charted: f64 = chart
            .iter()
            .flat_map(|day| day.totals.iter())
            .map(|entry| entry.total)
            .sum();
        assert!(approx_eq(charted, 22.0));
    }

    #[test]
    fn test_inventory_levels() {
        let items = vec![
            sample_item("Vodka", "1", 5, 10),
            sample_item("Gin", "2", 8, 3),
        ];
        let levels = inventory_levels(&items, Some("2"));
        assert_eq!(
            levels,
            vec![InventoryLevel {
                name: "Gin".to_string(),
                current: 8,
                minimum: 3,
            }]
        );
        assert_eq!(inventory_levels(&items, None).len(), 2);
    }

    #[tokio::test]
    async fn test_build_dashboard_after_reset_reports_zero() -> Result<()> {
        let now = fixed_now();
        let bars = BarDirectory::default();
        let store = setup_with_items(&[
            sample_item("Vodka", "1", 2, 10),
            sample_item("Gin", "1", 1, 10),
        ])
        .await?;
        save_collection(&store, SALES_KEY, &[sale("a", "Main Bar", 12.0, now)]).await?;

        let dashboard = build_dashboard(&store, &bars, now).await?;
        assert_eq!(dashboard.stats.low_stock_items, 2);
        assert_eq!(dashboard.alerts.len(), 2);
        assert!(approx_eq(dashboard.stats.total_sales, 12.0));

        reset_inventory(&store, &manager_session()).await?;
        let dashboard = build_dashboard(&store, &bars, now).await?;
        assert_eq!(dashboard.stats.low_stock_items, 0);
        assert_eq!(dashboard.stats.expiring_soon, 0);
        assert!(dashboard.alerts.is_empty());
        assert!(dashboard.inventory_levels.is_empty());
        assert!(approx_eq(dashboard.valuations[0].valuation, 0.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_build_dashboard_on_empty_store() -> Result<()> {
        let dashboard = build_dashboard(&MemoryStore::new(), &BarDirectory::default(), fixed_now()).await?;
        assert_eq!(dashboard.stats, DashboardStats::default());
        assert_eq!(dashboard.weekly_sales.len(), 7);
        Ok(())
    }
}
