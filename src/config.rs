use crate::error::{Result, ShelfmateError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure loaded from shelfmate.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
    /// Fallbacks taken while loading, logged once tracing is initialised
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

/// Where the precomputed matrices and catalog tables live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    pub dir: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./models"),
        }
    }
}

/// Cut-offs and thresholds used by the recommenders
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Number of similar books returned per query
    pub similar_items: usize,
    /// Nearest neighbours consulted for user recommendations
    pub neighbors: usize,
    /// A neighbour "likes" a book when its rating is strictly above this
    pub like_threshold: f32,
    pub max_user_recommendations: usize,
    pub popular_limit: usize,
    pub top_authors_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            similar_items: 5,
            neighbors: 10,
            like_threshold: 4.0,
            max_user_recommendations: 10,
            popular_limit: 20,
            top_authors_limit: 10,
        }
    }
}

impl RecommendConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("similar_items", self.similar_items),
            ("neighbors", self.neighbors),
            ("max_user_recommendations", self.max_user_recommendations),
            ("popular_limit", self.popular_limit),
            ("top_authors_limit", self.top_authors_limit),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ShelfmateError::Config {
                    message: format!("recommend.{name} must be at least 1"),
                });
            }
        }
        if !self.like_threshold.is_finite() {
            return Err(ShelfmateError::Config {
                message: "recommend.like_threshold must be a finite number".into(),
            });
        }
        Ok(())
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub http_bind: SocketAddr,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            log_level: "shelfmate=info,tower_http=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from `lookup` (the process environment in
    /// production). Unparseable values are skipped and reported in `warnings`.
    pub fn load_from_env(
        lookup: impl Fn(&str) -> Option<String>,
        warnings: &mut Vec<String>,
    ) -> Self {
        let mut cfg = Self::default();

        if let Some(bind) = parse_override(&lookup, "SHELFMATE_HTTP_BIND", warnings) {
            cfg.http_bind = bind;
        }
        if let Some(level) = lookup("RUST_LOG") {
            cfg.log_level = level;
        }

        cfg
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("Ignoring unparseable {} '{}'", key, raw));
            None
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses SHELFMATE_CONFIG environment variable or defaults to "shelfmate.toml"
    ///
    /// Problems that fall back to defaults are collected in `load_warnings`;
    /// log them with [`Config::log_load_warnings`] once tracing is up.
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("SHELFMATE_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path =
            std::env::var("SHELFMATE_CONFIG").unwrap_or_else(|_| "shelfmate.toml".to_string());

        let mut config = Self::from_file_or_default(Path::new(&config_path))?;
        config.apply_env_overrides(env_var);
        config.recommend.validate()?;

        Ok(config)
    }

    /// Parse the file-backed part of the configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read `path`, or fall back to defaults (with a load warning) when it
    /// does not exist
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.load_warnings.push(format!(
                    "Config file {} not found, using defaults",
                    path.display()
                ));
                Ok(config)
            }
            Err(e) => Err(ShelfmateError::Config {
                message: format!("cannot read {}: {}", path.display(), e),
            }),
        }
    }

    /// Layer environment overrides (and the env-only runtime section) on top
    /// of the file values
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let warnings = &mut self.load_warnings;

        if let Some(dir) = lookup("SHELFMATE_SNAPSHOT_DIR") {
            self.snapshot.dir = PathBuf::from(dir);
        }
        if let Some(n) = parse_override(&lookup, "SHELFMATE_SIMILAR_ITEMS", warnings) {
            self.recommend.similar_items = n;
        }
        if let Some(n) = parse_override(&lookup, "SHELFMATE_NEIGHBORS", warnings) {
            self.recommend.neighbors = n;
        }
        if let Some(t) = parse_override(&lookup, "SHELFMATE_LIKE_THRESHOLD", warnings) {
            self.recommend.like_threshold = t;
        }

        self.runtime = RuntimeConfig::load_from_env(&lookup, warnings);
    }

    pub fn log_load_warnings(&self) {
        for warning in &self.load_warnings {
            tracing::warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.recommend.similar_items, 5);
        assert_eq!(config.recommend.neighbors, 10);
        assert_eq!(config.recommend.like_threshold, 4.0);
        assert_eq!(config.recommend.max_user_recommendations, 10);
        assert_eq!(config.runtime.http_bind.port(), 5000);
        assert!(config.recommend.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [snapshot]
            dir = "/srv/models"

            [recommend]
            neighbors = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.snapshot.dir, PathBuf::from("/srv/models"));
        assert_eq!(config.recommend.neighbors, 25);
        assert_eq!(config.recommend.similar_items, 5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[recommend\nneighbors = ").unwrap_err();
        assert!(matches!(err, ShelfmateError::Config { .. }));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let recommend = RecommendConfig {
            similar_items: 0,
            ..RecommendConfig::default()
        };
        let err = recommend.validate().unwrap_err();
        assert!(err.to_string().contains("similar_items"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let recommend = RecommendConfig {
            like_threshold: f32::NAN,
            ..RecommendConfig::default()
        };
        assert!(recommend.validate().is_err());
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    const FILE: &str = r#"
        [snapshot]
        dir = "/srv/models"

        [recommend]
        neighbors = 25
    "#;

    #[test]
    fn test_snapshot_dir_env_beats_toml() {
        let mut config = Config::from_toml_str(FILE).unwrap();
        config.apply_env_overrides(env(&[("SHELFMATE_SNAPSHOT_DIR", "/data/snap")]));
        assert_eq!(config.snapshot.dir, PathBuf::from("/data/snap"));
        assert_eq!(config.recommend.neighbors, 25);
        assert!(config.load_warnings.is_empty());
    }

    #[test]
    fn test_http_bind_and_log_level_from_env() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("SHELFMATE_HTTP_BIND", "0.0.0.0:8080"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.runtime.http_bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.runtime.log_level, "debug");
    }

    #[test]
    fn test_bad_http_bind_keeps_default_and_warns() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("SHELFMATE_HTTP_BIND", "not-an-address")]));
        assert_eq!(config.runtime.http_bind, SocketAddr::from(([127, 0, 0, 1], 5000)));
        assert_eq!(config.load_warnings.len(), 1);
        assert!(config.load_warnings[0].contains("SHELFMATE_HTTP_BIND"));
    }

    #[test]
    fn test_bad_numeric_overrides_keep_file_values_and_warn() {
        let mut config = Config::from_toml_str(FILE).unwrap();
        config.apply_env_overrides(env(&[
            ("SHELFMATE_NEIGHBORS", "lots"),
            ("SHELFMATE_SIMILAR_ITEMS", "7"),
            ("SHELFMATE_LIKE_THRESHOLD", "high"),
        ]));
        assert_eq!(config.recommend.neighbors, 25);
        assert_eq!(config.recommend.similar_items, 7);
        assert_eq!(config.recommend.like_threshold, 4.0);
        assert_eq!(config.load_warnings.len(), 2);
        assert!(config.load_warnings[0].contains("SHELFMATE_NEIGHBORS"));
        assert!(config.load_warnings[1].contains("SHELFMATE_LIKE_THRESHOLD"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults_with_warning() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::from_file_or_default(&path).unwrap();
        assert_eq!(config.snapshot.dir, PathBuf::from("./models"));
        assert_eq!(config.recommend.neighbors, 10);
        assert_eq!(config.load_warnings.len(), 1);
        assert!(config.load_warnings[0].contains("not found"));
    }

    #[test]
    fn test_existing_file_is_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shelfmate.toml");
        std::fs::write(&path, FILE).unwrap();
        let config = Config::from_file_or_default(&path).unwrap();
        assert_eq!(config.recommend.neighbors, 25);
        assert!(config.load_warnings.is_empty());
    }
}
