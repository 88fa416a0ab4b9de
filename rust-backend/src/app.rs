// src/app.rs

use actix_cors::Cors;
use actix_web::web;

use crate::config::settings::{CorsOrigins, Settings};
use crate::routes::{frontend, health, Blueprints};
use crate::services::asset_resolver::AssetResolver;

const CORS_MAX_AGE_SECS: usize = 3600;

/// Built once in `main` and shared with every worker.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub resolver: AssetResolver,
}

impl AppState {
    /// The resolver's reserved prefixes are taken from `blueprints`, so the
    /// fallback can never disagree with what is actually mounted.
    pub fn new(settings: Settings, blueprints: &Blueprints) -> Self {
        let resolver = AssetResolver::new(
            settings.frontend_dir.clone(),
            blueprints.prefixes(),
            settings.static_miss_policy,
        );
        Self { settings, resolver }
    }
}

pub fn cors(origins: &CorsOrigins) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(CORS_MAX_AGE_SECS);

    match origins {
        CorsOrigins::Any => cors.allow_any_origin(),
        CorsOrigins::List(list) => list
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

/// Mounts blueprints, the API-only root, and the frontend catch-all.
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>, blueprints: &Blueprints) {
    let api_only = state.settings.api_only;
    cfg.app_data(state);

    if api_only {
        cfg.service(health::api_root);
    }
    blueprints.configure(cfg);
    cfg.default_service(web::to(frontend::serve_frontend));
}
