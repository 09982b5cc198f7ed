use barkeep::{
    config::{database, settings},
    core::{dashboard, report::format_currency, session},
    errors::Result,
    store::SeaOrmStore,
};
use chrono::Utc;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load bars and accounts
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let bars = config.bar_directory();
    info!("Configured {} bars", bars.iter().count());

    // 4. Open the store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    let store = SeaOrmStore::new(db);

    // 5. Restore the session, or log in from the environment
    let mut current = session::restore_session(&store).await?;
    if !current.is_authenticated()
        && let (Ok(email), Ok(password)) = (
            std::env::var("BARKEEP_EMAIL"),
            std::env::var("BARKEEP_PASSWORD"),
        )
    {
        match session::login(&store, &config.accounts, &email, &password).await {
            Ok(signed_in) => current = signed_in,
            Err(e) => warn!("Login from environment failed: {}", e),
        }
    }
    match current.current_user() {
        Some(user) => info!("Signed in as {} ({})", user.name, user.role),
        None => info!("No active session"),
    }

    // 6. Print the dashboard summary
    let view = dashboard::build_dashboard(&store, &bars, Utc::now()).await?;
    info!(
        "Sales: {} over {} orders | low stock: {} | expiring soon: {}",
        format_currency(view.stats.total_sales),
        view.stats.orders_completed,
        view.stats.low_stock_items,
        view.stats.expiring_soon
    );
    for valuation in &view.valuations {
        info!(
            "{} inventory value: {}",
            valuation.bar_name,
            format_currency(valuation.valuation)
        );
    }
    for alert in &view.alerts {
        warn!("[{}] {}", alert.bar_name, alert.message);
    }

    Ok(())
}
