use actix_web::{middleware::Logger, web, App, HttpServer};
use metrics_exporter_prometheus::PrometheusBuilder;

use tradesense_backend::{
    app::{configure, cors, AppState},
    config::settings::Settings,
    db::Database,
    middleware::metrics::Metrics,
    routes::default_blueprints,
};


fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    log::info!("Starting TradeSense backend…");

    let settings = Settings::new().unwrap_or_else(|e| {
        log::error!("Failed to load settings: {e}");
        std::process::exit(1);
    });

    if settings.uses_default_secret() {
        log::warn!("SECRET_KEY not set, using the development default");
    }
    log::info!(
        "frontend bundle: {} (api_only: {}, serverless: {}, static miss: {:?})",
        settings.frontend_dir.display(),
        settings.api_only,
        settings.serverless,
        settings.static_miss_policy,
    );

    let blueprints = default_blueprints();

    let db = Database::connect(&settings).unwrap_or_else(|e| {
        log::error!("Failed to set up database: {e}");
        std::process::exit(1);
    });

    db.init_schema(&settings, &blueprints.schema()).await;

    let metrics_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(web::Data::new(handle)),
        Err(e) => {
            log::warn!("metrics recorder not installed: {e}");
            None
        }
    };

    let port = settings.port;
    let cors_origins = settings.cors_origins.clone();
    let state = web::Data::new(AppState::new(settings, &blueprints));
    let db = web::Data::new(db);

    log::info!("listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        let mut app = App::new().app_data(db.clone());
        if let Some(handle) = &metrics_handle {
            app = app.app_data(handle.clone());
        }

        app
            .wrap(Metrics)
            .wrap(cors(&cors_origins))
            .wrap(Logger::default())
            .configure(|cfg| configure(cfg, state.clone(), &blueprints))
    })
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
