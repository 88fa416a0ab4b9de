use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::utils::errors::ConfigError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here";
const DEFAULT_FRONTEND_DIR: &str = "frontend/build";
const SERVERLESS_INSTANCE_PATH: &str = "/tmp";
const LOCAL_INSTANCE_PATH: &str = "instance";
const SQLITE_FILE: &str = "tradesense.db";

/// Which origins the CORS layer accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_owned)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// What to do with a `static/...` request whose file is not in the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaticMissPolicy {
    /// Answer 404.
    #[default]
    NotFound,
    /// Serve `index.html` like any other client-side route.
    SpaFallback,
}

impl StaticMissPolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "not_found" | "404" => Ok(StaticMissPolicy::NotFound),
            "spa_fallback" | "index" => Ok(StaticMissPolicy::SpaFallback),
            other => Err(ConfigError::Invalid {
                var: "STATIC_MISS_POLICY",
                reason: format!("expected `not_found` or `spa_fallback`, got `{other}`"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub secret_key: String,
    pub cors_origins: CorsOrigins,
    pub serverless: bool,
    pub instance_path: PathBuf,
    pub frontend_dir: PathBuf,
    pub api_only: bool,
    pub static_miss_policy: StaticMissPolicy,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok(); // loads `.env` file automatically

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup instead of the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: format!("must be a valid u16 ({e})"),
            })?,
            None => DEFAULT_PORT,
        };

        let serverless = var("SERVERLESS_ENV").is_some_and(|v| is_truthy(&v));
        let api_only = var("API_ONLY").is_some_and(|v| is_truthy(&v));

        let instance_path = var("INSTANCE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(if serverless {
                    SERVERLESS_INSTANCE_PATH
                } else {
                    LOCAL_INSTANCE_PATH
                })
            });

        let database_url = match var("DATABASE_URL") {
            Some(url) => normalize_database_url(url.trim()),
            None => format!(
                "sqlite://{}?mode=rwc",
                instance_path.join(SQLITE_FILE).display()
            ),
        };

        let secret_key = var("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());
        let cors_origins = CorsOrigins::parse(&var("CORS_ORIGINS").unwrap_or_else(|| "*".into()));
        let frontend_dir = PathBuf::from(
            var("FRONTEND_BUILD_DIR").unwrap_or_else(|| DEFAULT_FRONTEND_DIR.into()),
        );
        let static_miss_policy = match var("STATIC_MISS_POLICY") {
            Some(raw) => StaticMissPolicy::parse(&raw)?,
            None => StaticMissPolicy::default(),
        };

        Ok(Self {
            port,
            database_url,
            secret_key,
            cors_origins,
            serverless,
            instance_path,
            frontend_dir,
            api_only,
            static_miss_policy,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn is_sqlite(&self) -> bool {
        self.database_url.starts_with("sqlite:")
    }
}

/// Heroku-style `postgres://` URLs get the `postgresql://` scheme.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{rest}"),
        None => url.to_string(),
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
