//  src/db/mod.rs

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

use crate::config::settings::Settings;
use crate::utils::errors::AppError;

const MAX_CONNECTIONS: u32 = 5;

/// What startup schema initialisation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaInit {
    /// Serverless deployment; nothing was run.
    Skipped,
    Created(usize),
    /// Logged and ignored; the server starts anyway.
    Failed,
}

/// Cheap-to-clone pool handle shared with every blueprint through `web::Data`.
#[derive(Clone, Debug)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect(settings: &Settings) -> Result<Self, AppError> {
        install_default_drivers();

        // SQLite creates its file but not the directory holding it.
        if settings.is_sqlite() && !settings.serverless {
            std::fs::create_dir_all(&settings.instance_path)?;
        }

        let pool = AnyPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(&settings.database_url)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Checks the connection, then runs every schema statement in order.
    /// Returns how many statements were executed.
    pub async fn create_all(&self, statements: &[&str]) -> Result<usize, AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;

        for stmt in statements {
            log::debug!("schema: {stmt}");
            sqlx::query(stmt).execute(&mut *conn).await?;
        }
        Ok(statements.len())
    }

    /// Best-effort `create_all` at startup. Serverless filesystems are
    /// read-only, so nothing runs there.
    pub async fn init_schema(&self, settings: &Settings, statements: &[&str]) -> SchemaInit {
        if settings.serverless {
            log::info!("serverless mode: skipping schema creation");
            return SchemaInit::Skipped;
        }

        match self.create_all(statements).await {
            Ok(n) => {
                log::info!("database ready ({n} schema statements)");
                SchemaInit::Created(n)
            }
            Err(e) => {
                log::error!("schema creation failed, continuing: {e}");
                SchemaInit::Failed
            }
        }
    }
}
