pub mod app;
pub mod config;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod services {
    pub mod asset_resolver;
}

pub mod utils;
