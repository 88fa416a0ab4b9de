// src/routes/frontend.rs

use actix_files::NamedFile;
use actix_web::{http::Method, web, HttpRequest, HttpResponse};

use crate::app::AppState;
use crate::routes::health::health_payload;
use crate::services::asset_resolver::Resolution;
use crate::utils::errors::AppError;
use crate::utils::types::StatusPayload;

/// Catch-all for everything no blueprint handled: bundle files, the SPA
/// entry document, or a 404 for unmatched API routes.
pub async fn serve_frontend(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if state.settings.api_only {
        return Err(AppError::RouteNotFound);
    }

    // Full decoded path; scopes that matched a prefix have advanced
    // `unprocessed()` past it.
    let path = req.match_info().as_str();
    let resolution = state.resolver.resolve(path);
    log::debug!("{} {} -> {}", req.method(), req.path(), resolution.kind());

    if resolution == Resolution::ApiNotFound {
        return Err(AppError::RouteNotFound);
    }
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        return Ok(HttpResponse::MethodNotAllowed()
            .insert_header(("Allow", "GET, HEAD"))
            .json(StatusPayload::error("Method not allowed")));
    }

    match resolution {
        Resolution::Health => Ok(HttpResponse::Ok().json(health_payload())),
        Resolution::ApiNotFound => Err(AppError::RouteNotFound),
        Resolution::AssetNotFound => Err(AppError::FileNotFound),
        Resolution::StaticFile(file) | Resolution::SpaFallback(file) => {
            let named = NamedFile::open_async(&file).await.map_err(|e| {
                log::warn!("cannot open {}: {e}", file.display());
                match e.kind() {
                    std::io::ErrorKind::NotFound => AppError::FileNotFound,
                    _ => AppError::Io(e),
                }
            })?;
            Ok(named.into_response(&req))
        }
    }
}
