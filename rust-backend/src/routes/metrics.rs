use actix_web::{get, web, HttpResponse};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::utils::errors::AppError;

/// Prometheus text exposition. 404 when no recorder was installed.
#[get("/metrics")]
pub async fn render_metrics(
    handle: Option<web::Data<PrometheusHandle>>,
) -> Result<HttpResponse, AppError> {
    let handle = handle.ok_or(AppError::RouteNotFound)?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(handle.render()))
}
