//! Configuration for pairdeck.
//!
//! Loaded from `~/.pairdeck/config.toml`. Every section is optional and every
//! accessor falls back to a default, so a missing file behaves like an empty one.
//!
//! ```toml
//! [server]
//! base_url = "${MATCHER_URL}"
//! timeout_seconds = 10
//!
//! [review]
//! filter = "high"
//! source_id = "cam-3"
//!
//! [gesture]
//! pixels_per_column = 8.0
//!
//! [app]
//! reduced_motion = true
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

use pairdeck_types::ui::UiOptions;
use pairdeck_types::{ConfidenceFilter, SourceFilter};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const SERVER_URL_ENV: &str = "PAIRDECK_SERVER_URL";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PIXELS_PER_COLUMN: f32 = 8.0;

#[derive(Debug, Default, Deserialize)]
pub struct PairdeckConfig {
    pub server: Option<ServerConfig>,
    pub review: Option<ReviewConfig>,
    pub gesture: Option<GestureConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Collaborator endpoint settings.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the matcher API. Supports `${VAR}` expansion.
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Queue selection defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewConfig {
    /// Confidence filter: "all", "high" or "low".
    pub filter: Option<String>,
    pub source_id: Option<String>,
    pub entity_type: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GestureConfig {
    /// Device-independent pixels per terminal column for mouse drags.
    pub pixels_per_column: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable card tilt and exit motion.
    #[serde(default)]
    pub reduced_motion: bool,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl PairdeckConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Server URL: `PAIRDECK_SERVER_URL`, then `[server].base_url`, then the default.
    #[must_use]
    pub fn server_url(&self) -> String {
        self.resolve_server_url(env::var(SERVER_URL_ENV).ok().as_deref())
    }

    fn resolve_server_url(&self, env_override: Option<&str>) -> String {
        let configured = self
            .server
            .as_ref()
            .and_then(|s| s.base_url.as_deref())
            .map(expand_env_vars);
        env_override
            .map(str::to_string)
            .or(configured)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .server
            .as_ref()
            .and_then(|s| s.timeout_seconds)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    #[must_use]
    pub fn confidence_filter(&self) -> ConfidenceFilter {
        let Some(raw) = self.review.as_ref().and_then(|r| r.filter.as_deref()) else {
            return ConfidenceFilter::default();
        };
        raw.parse().unwrap_or_else(|err| {
            tracing::warn!("{err}; using `all`");
            ConfidenceFilter::default()
        })
    }

    #[must_use]
    pub fn source_filter(&self) -> SourceFilter {
        let Some(review) = self.review.as_ref() else {
            return SourceFilter::default();
        };
        SourceFilter {
            source_id: review.source_id.clone(),
            entity_type: review.entity_type.clone(),
            limit: review.limit,
        }
    }

    #[must_use]
    pub fn pixels_per_column(&self) -> f32 {
        self.gesture
            .as_ref()
            .and_then(|g| g.pixels_per_column)
            .filter(|px| px.is_finite() && *px > 0.0)
            .unwrap_or(DEFAULT_PIXELS_PER_COLUMN)
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            })
            .unwrap_or_default()
    }
}

/// Persist the confidence filter to the config file at `path`.
///
/// Uses `toml_edit` to preserve comments and formatting.
/// Creates the config file and parent directory if they don't exist.
pub fn persist_filter_at(path: &Path, filter: ConfidenceFilter) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if !doc.contains_key("review") {
        doc["review"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["review"]["filter"] = toml_edit::value(filter.as_str());

    // Write back atomically
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(doc.to_string().as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pairdeck").join("config.toml"))
}
