/// Dashboard statistics, alerts and chart projections
pub mod dashboard;
/// Inventory item reads, mutations and table queries
pub mod inventory;
/// Menu item ledger
pub mod menu;
/// Sales revenue summaries and formatting helpers
pub mod report;
/// Sales ledger with tax-aware totals
pub mod sales;
/// Current user, role checks, login and logout
pub mod session;
/// Stock transfers between bars and their audit trail
pub mod transfer;
