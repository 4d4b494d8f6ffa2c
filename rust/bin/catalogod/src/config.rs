//! Server-side configuration, read from a TOML file.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [storage]
//! data_dir = "/var/lib/catalogo"
//! # sqlite = "/var/lib/catalogo/catalogo.sqlite"
//!
//! [app]
//! name = "catalogoApp"
//!
//! [pagination]
//! default_size = 20
//! max_size = 2000
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory searched for bare context names.
const CONFIG_DIR: &str = "/etc/catalogo";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub pagination: PaginationSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSection {
    /// Directory holding the database file.
    #[serde(default)]
    pub data_dir: String,

    /// Explicit database path. Defaults to `{data_dir}/catalogo.sqlite`.
    #[serde(default)]
    pub sqlite: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Used in `X-{name}-alert` response headers.
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "catalogoApp".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSection {
    #[serde(default = "default_page_size")]
    pub default_size: u64,

    #[serde(default = "default_max_page_size")]
    pub max_size: u64,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    2000
}

impl ServerConfig {
    /// A value containing `/` or `.` is a path; anything else is a context
    /// name resolved to `/etc/catalogo/<name>.toml`.
    pub fn resolve_path(config: &str) -> PathBuf {
        if config.contains('/') || config.contains('.') {
            PathBuf::from(config)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", config))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        Ok(config)
    }
}
