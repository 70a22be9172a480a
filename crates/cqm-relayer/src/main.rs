use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cqm_relayer::config::RelayerConfig;
use cqm_relayer::cors::relay_cors;
use cqm_relayer::routes;
use cqm_relayer::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match RelayerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid relayer configuration: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to set up relayer: {e}");
            std::process::exit(1);
        }
    };

    if config.metrics_token.is_none() && !config.public_metrics {
        tracing::warn!("METRICS_TOKEN not set; /metrics will answer 403");
    }
    if !config.watch_receipts {
        tracing::warn!("RELAY_WATCH_RECEIPTS=false; reverted metaTransfers will not be logged");
    }

    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_minute(config.rate_limit_rpm)
        .finish()
    {
        Some(conf) => conf,
        None => {
            tracing::error!("RATE_LIMIT_RPM must be greater than zero");
            std::process::exit(1);
        }
    };

    let port = config.port;
    tracing::info!("CQM relayer listening on {}:{port}", config.bind_addr);
    tracing::info!("Relayer address: {}", config.relayer_address);
    tracing::info!("Token contract: {} (chain {})", config.chain.contract, config.chain.chain_id);
    tracing::info!("Rate limit: {} req/min per IP", config.rate_limit_rpm);
    tracing::info!("  POST http://localhost:{port}/backend.php");
    tracing::info!("  GET  http://localhost:{port}/health");

    HttpServer::new(move || {
        App::new()
            .wrap(relay_cors())
            .wrap(Governor::new(&governor_conf))
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(65_536))
            .service(routes::relay)
            .service(routes::relay_options)
            .service(routes::health)
            .service(routes::metrics_endpoint)
    })
    .bind((config.bind_addr.as_str(), port))?
    .run()
    .await
}
