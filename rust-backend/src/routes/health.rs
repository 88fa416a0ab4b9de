use actix_web::{get, web, HttpResponse};

use crate::routes::{metrics, Blueprint};
use crate::utils::types::StatusPayload;

pub const HEALTH_MESSAGE: &str = "TradeSense API is running";

pub fn health_payload() -> StatusPayload {
    StatusPayload::success(HEALTH_MESSAGE)
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(health_payload())
}

/// `/` in API-only deployments, where no frontend bundle is served.
#[get("/")]
pub async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(health_payload())
}

fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(metrics::render_metrics);
}

/// The core `/api` blueprint: health check and metrics.
pub fn api_blueprint() -> Blueprint {
    Blueprint::new("api", "api").with_routes(api_routes)
}
