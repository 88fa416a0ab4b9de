//! Decides what a request path means for the frontend bundle: the health
//! check, an unmatched API route, a file on disk, or the SPA entry document.
//!
//! Resolution is read-only; the only side effects are `stat` calls under
//! the bundle root, and none at all for reserved API prefixes.

use std::path::{Component, Path, PathBuf};

use crate::config::settings::StaticMissPolicy;
use crate::routes::ApiPrefixes;

pub const INDEX_FILE: &str = "index.html";
const HEALTH_PATH: &str = "api/health";
const STATIC_PREFIX: &str = "static/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Health,
    /// Under a blueprint prefix but no handler matched.
    ApiNotFound,
    StaticFile(PathBuf),
    /// Client-side route; serve the entry document.
    SpaFallback(PathBuf),
    /// Missing `static/` asset, or a path escaping the bundle root.
    AssetNotFound,
}

impl Resolution {
    pub fn resolved_path(&self) -> Option<&Path> {
        match self {
            Resolution::StaticFile(p) | Resolution::SpaFallback(p) => Some(p),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Health => "health",
            Resolution::ApiNotFound => "api_not_found",
            Resolution::StaticFile(_) => "static_file",
            Resolution::SpaFallback(_) => "spa_fallback",
            Resolution::AssetNotFound => "asset_not_found",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    prefixes: ApiPrefixes,
    static_miss: StaticMissPolicy,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>, prefixes: ApiPrefixes, static_miss: StaticMissPolicy) -> Self {
        Self {
            root: root.into(),
            prefixes,
            static_miss,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Classifies `path`, the request path with or without its leading `/`.
    /// Every prefix check runs on the dot-segment-free form of the path.
    pub fn resolve(&self, path: &str) -> Resolution {
        let Some(path) = normalize(path) else {
            log::warn!("rejected path outside bundle root: {path}");
            return Resolution::AssetNotFound;
        };

        if path == HEALTH_PATH {
            return Resolution::Health;
        }
        if path.is_empty() {
            return Resolution::SpaFallback(self.index());
        }
        if self.prefixes.matches(&path) {
            return Resolution::ApiNotFound;
        }

        let candidate = self.root.join(&path);
        if candidate.is_file() {
            return Resolution::StaticFile(candidate);
        }

        match (path.starts_with(STATIC_PREFIX), self.static_miss) {
            (true, StaticMissPolicy::NotFound) => Resolution::AssetNotFound,
            _ => Resolution::SpaFallback(self.index()),
        }
    }
}

/// Joins the normal components with `/`, dropping `.` and empty segments
/// and keeping a trailing `/`. `None` for `..`, roots and drive prefixes.
fn normalize(path: &str) -> Option<String> {
    let trimmed = path.trim_start_matches('/');
    let mut segments = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(seg) => segments.push(seg.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let mut out = segments.join("/");
    if trimmed.ends_with('/') && !out.is_empty() {
        out.push('/');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::default_blueprints;
    use std::fs;

    fn bundle() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("static/js")).unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("manifest.json"), "{}").unwrap();
        fs::write(root.join("favicon.ico"), [0u8; 4]).unwrap();
        fs::write(root.join("static/js/main.abc123.js"), "console.log(1)").unwrap();
        fs::create_dir_all(root.join("dashboard")).unwrap();
        dir
    }

    fn resolver(root: &Path, policy: StaticMissPolicy) -> AssetResolver {
        AssetResolver::new(root, default_blueprints().prefixes(), policy)
    }

    #[test]
    fn empty_path_serves_entry_document() {
        let dir = bundle();
        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        assert_eq!(r.resolve(""), Resolution::SpaFallback(dir.path().join("index.html")));
        assert_eq!(r.resolve("/"), Resolution::SpaFallback(dir.path().join("index.html")));
    }

    #[test]
    fn health_short_circuits() {
        let dir = bundle();
        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        assert_eq!(r.resolve("/api/health"), Resolution::Health);
        assert_eq!(r.resolve("api/health").kind(), "health");
    }

    #[test]
    fn reserved_prefixes_never_touch_the_filesystem() {
        let dir = bundle();
        // A real file under a reserved prefix is still not served.
        fs::create_dir_all(dir.path().join("users")).unwrap();
        fs::write(dir.path().join("users/123"), "leak").unwrap();

        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        for path in [
            "users/123",
            "api/unknown",
            "challenges/7/trades",
            "trades/x",
            "real_time_data/AAPL",
            "ai_signals/popular",
            "auth/login",
        ] {
            assert_eq!(r.resolve(path), Resolution::ApiNotFound, "{path}");
        }

        // Holds even when the bundle root does not exist.
        let missing = resolver(&dir.path().join("nope"), StaticMissPolicy::SpaFallback);
        assert_eq!(missing.resolve("/users/123"), Resolution::ApiNotFound);
    }

    #[test]
    fn existing_files_are_served_directly() {
        let dir = bundle();
        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        assert_eq!(
            r.resolve("/static/js/main.abc123.js"),
            Resolution::StaticFile(dir.path().join("static/js/main.abc123.js"))
        );
        assert_eq!(
            r.resolve("manifest.json"),
            Resolution::StaticFile(dir.path().join("manifest.json"))
        );
        assert_eq!(
            r.resolve("favicon.ico").resolved_path(),
            Some(dir.path().join("favicon.ico").as_path())
        );
    }

    #[test]
    fn client_routes_fall_back_to_index() {
        let dir = bundle();
        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        let index = Resolution::SpaFallback(dir.path().join("index.html"));

        assert_eq!(r.resolve("/dashboard/settings"), index);
        assert_eq!(r.resolve("/dashboard/42"), index);
        // Directories are not files.
        assert_eq!(r.resolve("/dashboard"), index);
        // Bare prefix without a trailing segment is a client route.
        assert_eq!(r.resolve("/users"), index);
        // Idempotent.
        assert_eq!(r.resolve("/dashboard/settings"), r.resolve("/dashboard/settings"));
    }

    #[test]
    fn missing_static_asset_follows_policy() {
        let dir = bundle();

        let strict = resolver(dir.path(), StaticMissPolicy::NotFound);
        assert_eq!(strict.resolve("/static/js/missing.js"), Resolution::AssetNotFound);
        assert_eq!(strict.resolve("/static/js/"), Resolution::AssetNotFound);

        let lenient = resolver(dir.path(), StaticMissPolicy::SpaFallback);
        assert_eq!(
            lenient.resolve("/static/js/missing.js"),
            Resolution::SpaFallback(dir.path().join("index.html"))
        );
    }

    #[test]
    fn traversal_is_rejected() {
        let dir = bundle();
        let r = resolver(dir.path(), StaticMissPolicy::SpaFallback);
        assert_eq!(r.resolve("/../outside.txt"), Resolution::AssetNotFound);
        assert_eq!(r.resolve("/static/../../etc/passwd"), Resolution::AssetNotFound);
        assert_eq!(r.resolve("//etc/passwd"), Resolution::SpaFallback(r.index()));
        assert_eq!(
            r.resolve("./manifest.json"),
            Resolution::StaticFile(dir.path().join("manifest.json"))
        );
    }

    #[test]
    fn dot_segments_do_not_bypass_prefix_rules() {
        let dir = bundle();
        fs::create_dir_all(dir.path().join("users")).unwrap();
        fs::write(dir.path().join("users/123"), "leak").unwrap();

        let r = resolver(dir.path(), StaticMissPolicy::NotFound);
        assert_eq!(r.resolve("/./users/123"), Resolution::ApiNotFound);
        assert_eq!(r.resolve("./users/123"), Resolution::ApiNotFound);
        assert_eq!(r.resolve("/users/./123"), Resolution::ApiNotFound);
        assert_eq!(r.resolve("/./static/js/missing.js"), Resolution::AssetNotFound);
        assert_eq!(r.resolve("/static/./js/missing.js"), Resolution::AssetNotFound);
        assert_eq!(r.resolve("/./api/health"), Resolution::Health);
        assert_eq!(r.resolve("/./"), Resolution::SpaFallback(r.index()));
        assert_eq!(r.resolve("/auth/"), Resolution::ApiNotFound);
    }

    #[test]
    fn missing_bundle_still_points_at_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("build");
        let r = resolver(&root, StaticMissPolicy::NotFound);
        assert_eq!(r.resolve("/anything"), Resolution::SpaFallback(root.join("index.html")));
        assert_eq!(r.root(), root.as_path());
    }
}
