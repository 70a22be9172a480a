use actix_web::{get, options, post, web, HttpRequest, HttpResponse};
use cqm::{RelayFields, RelayResponse};

use crate::metrics;
use crate::relayer::spawn_relay;
use crate::state::AppState;

/// Relay endpoint. The `.php` path is what deployed pay-back pages already
/// post to.
///
/// Only presence of the six fields is checked before answering; typing,
/// the owner lookup and submission happen after the response is sent.
#[post("/backend.php")]
pub async fn relay(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let fields = match RelayFields::from_json(&body) {
        Ok(fields) => fields,
        Err(e) => {
            metrics::RELAY_REQUESTS
                .with_label_values(&["rejected"])
                .inc();
            tracing::warn!(error = %e, "relay request rejected");
            return HttpResponse::BadRequest().json(RelayResponse::invalid_parameters());
        }
    };

    metrics::RELAY_REQUESTS
        .with_label_values(&["accepted"])
        .inc();
    tracing::info!(from = %fields.from, amount = %fields.amount, "relay request accepted");

    spawn_relay(state.relayer.clone(), fields);

    HttpResponse::Ok().json(RelayResponse::ok())
}

/// Bare `OPTIONS` on the relay path. Browser preflights are answered by the
/// CORS middleware before reaching here.
#[options("/backend.php")]
pub async fn relay_options() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .finish()
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let relayer = format!("{}", state.relayer.relayer_address());
    match state.relayer.health_check().await {
        Ok(block) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "cqm-relayer",
            "relayer": relayer,
            "latestBlock": block.to_string(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "service": "cqm-relayer",
                "relayer": relayer,
                "error": "RPC unreachable",
            }))
        }
    }
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match &state.metrics_token {
        Some(token) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| metrics::token_matches(t.as_bytes(), token))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None if !state.public_metrics => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "Set METRICS_TOKEN or CQM_PUBLIC_METRICS=true to access /metrics"
            }));
        }
        None => {}
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}
