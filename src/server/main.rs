use std::sync::Arc;
use clap::Parser;
use crate::cache::FileStore;
use crate::server::{config, router, Args};
use crate::server::service::StatusService;
use crate::upstream::UptimeRobotClient;
use crate::utils;

pub async fn run_server() {
    let args = Args::parse();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let mut cfg = match config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load config {}: {:#}", args.config, e);
            return;
        }
    };
    args.apply(&mut cfg);
    if let Err(e) = cfg.validate() {
        tracing::error!("Invalid configuration: {:#}", e);
        return;
    }
    tracing::debug!("endpoints: {:?}, cache: {:?}", cfg.endpoints, cfg.cache);

    let store = Arc::new(FileStore::new(cfg.cache.file.clone()));
    let fetcher = Arc::new(UptimeRobotClient::new(&cfg.upstream));
    let service = match StatusService::new(&cfg, store, fetcher) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!("Failed to set up status service: {}", e);
            return;
        }
    };

    tracing::info!("Upstream: {}", cfg.upstream.api_url);
    tracing::info!(
        "Cache file: {} (ttl {}s, stale after {}s)",
        cfg.cache.file.display(),
        cfg.cache.ttl_secs,
        cfg.cache.stale_threshold_secs
    );

    let app = router::build(&cfg, service);
    if let Err(e) = serve(&cfg.server.listen_addr, app).await {
        tracing::error!("Server error: {}", e);
    }
}

async fn serve(addr: &str, app: axum::Router) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Status proxy listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}
