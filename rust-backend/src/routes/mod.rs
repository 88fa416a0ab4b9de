// src/routes/mod.rs

use std::collections::BTreeSet;

use actix_web::{web, Scope};

pub mod frontend;
pub mod health;
pub mod metrics;

/// Adds a blueprint's handlers to its scope.
pub type Registrar = fn(&mut web::ServiceConfig);

fn no_routes(_: &mut web::ServiceConfig) {}

/// A named group of handlers mounted under a single URL prefix segment.
#[derive(Clone, Copy)]
pub struct Blueprint {
    pub name: &'static str,
    pub url_prefix: &'static str,
    routes: Registrar,
    schema: &'static [&'static str],
}

impl Blueprint {
    /// A mount point with no handlers and no tables.
    pub fn new(name: &'static str, url_prefix: &'static str) -> Self {
        Self {
            name,
            url_prefix: url_prefix.trim_matches('/'),
            routes: no_routes,
            schema: &[],
        }
    }

    pub fn with_routes(self, routes: Registrar) -> Self {
        Self { routes, ..self }
    }

    pub fn with_schema(self, schema: &'static [&'static str]) -> Self {
        Self { schema, ..self }
    }

    pub fn scope(&self) -> Scope {
        web::scope(&format!("/{}", self.url_prefix)).configure(self.routes)
    }
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("url_prefix", &self.url_prefix)
            .field("schema", &self.schema)
            .finish()
    }
}

/// First path segments owned by registered blueprints. A request under one
/// of them that reaches the frontend fallback matched no handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPrefixes(BTreeSet<&'static str>);

impl ApiPrefixes {
    /// `true` when `path` (no leading `/`) starts with `<prefix>/`.
    pub fn matches(&self, path: &str) -> bool {
        path.split_once('/')
            .is_some_and(|(first, _)| self.0.contains(first))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

/// Ordered set of blueprints; the single source for both route mounting
/// and the reserved-prefix check.
#[derive(Debug, Clone, Default)]
pub struct Blueprints {
    items: Vec<Blueprint>,
}

impl Blueprints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, blueprint: Blueprint) -> Self {
        log::debug!(
            "registering blueprint `{}` at /{}",
            blueprint.name,
            blueprint.url_prefix
        );
        self.items.push(blueprint);
        self
    }

    pub fn prefixes(&self) -> ApiPrefixes {
        ApiPrefixes(self.items.iter().map(|bp| bp.url_prefix).collect())
    }

    /// Schema statements of every blueprint, in registration order.
    pub fn schema(&self) -> Vec<&'static str> {
        self.items
            .iter()
            .flat_map(|bp| bp.schema.iter().copied())
            .collect()
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for bp in &self.items {
            cfg.service(bp.scope());
        }
    }
}

/// The blueprints the TradeSense backend mounts. Business handlers live
/// outside this crate; their mount points still claim their prefixes.
pub fn default_blueprints() -> Blueprints {
    Blueprints::new()
        .register(health::api_blueprint())
        .register(Blueprint::new("users", "users"))
        .register(Blueprint::new("challenges", "challenges"))
        .register(Blueprint::new("trades", "trades"))
        .register(Blueprint::new("real_time_data", "real_time_data"))
        .register(Blueprint::new("ai_signals", "ai_signals"))
        .register(Blueprint::new("auth", "auth"))
}
