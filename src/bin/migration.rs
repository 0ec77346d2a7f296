//! Operational entry point that applies the embedded migrations against
//! the configured database and exits.

use tracing::{error, info};

use medequip_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::logging::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = api::db::establish_connection_from_app_config(&cfg).await?;

    if let Err(e) = api::db::run_migrations(&pool).await {
        error!("Migration run failed: {}", e);
        return Err(e.into());
    }

    info!("Migrations applied");
    Ok(())
}
