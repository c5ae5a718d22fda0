use std::sync::Arc;

use wbp_catalog::HttpCatalog;
use wbp_core::{catalog::CatalogPort, config::Config};

#[tokio::main]
async fn main() -> Result<(), wbp_core::Error> {
    wbp_core::logging::init("wbp")?;

    let cfg = Arc::new(Config::load()?);
    let catalog: Arc<dyn CatalogPort> = Arc::new(HttpCatalog::from_config(&cfg.catalog)?);

    wbp_telegram::router::run_polling(cfg, catalog)
        .await
        .map_err(|e| wbp_core::Error::External(format!("telegram bot failed: {e}")))?;

    tracing::info!("bot stopped");
    Ok(())
}
