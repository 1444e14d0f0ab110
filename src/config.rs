//! TOML configuration.
//!
//! ```toml
//! [guides]
//! guide = "guides/migration-guide.md"
//! data_guide = "guides/migration-guide-data.md"
//! # conversion_functions = "guides/convert-messages.ts"
//! preload = false
//!
//! [search]
//! default_limit = 3
//! max_limit = 5
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! # public_url = "https://migration.example.com"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use guide_search_core::GuideCorpus;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub guides: GuidesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GuidesConfig {
    /// Code migration guide (markdown).
    pub guide: PathBuf,
    /// Data migration guide (markdown).
    pub data_guide: PathBuf,
    /// File served by `GET /api/conversion-functions`. The route answers
    /// 404 when unset.
    #[serde(default)]
    pub conversion_functions: Option<PathBuf>,
    /// Load both guides before the server starts accepting requests.
    #[serde(default)]
    pub preload: bool,
}

impl GuidesConfig {
    pub fn path(&self, corpus: GuideCorpus) -> &Path {
        match corpus {
            GuideCorpus::Guide => &self.guide,
            GuideCorpus::DataGuide => &self.data_guide,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    3
}
fn default_max_limit() -> usize {
    5
}

impl SearchConfig {
    /// Clamp a caller-supplied limit into `[1, max_limit]`, falling back to
    /// `default_limit`.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Externally visible base URL used in generated links. Defaults to
    /// `http://{bind}`.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.bind),
        }
    }
}

impl Config {
    /// Defaults for commands that can run without a config file.
    pub fn minimal() -> Self {
        Self {
            guides: GuidesConfig {
                guide: PathBuf::from("guides/migration-guide.md"),
                data_guide: PathBuf::from("guides/migration-guide-data.md"),
                conversion_functions: None,
                preload: false,
            },
            search: SearchConfig::default(),
            server: ServerConfig {
                bind: "127.0.0.1:3000".to_string(),
                public_url: None,
            },
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.search.max_limit == 0 {
        anyhow::bail!("search.max_limit must be >= 1");
    }

    if config.search.default_limit == 0 || config.search.default_limit > config.search.max_limit {
        anyhow::bail!(
            "search.default_limit must be in [1, {}]",
            config.search.max_limit
        );
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if let Some(url) = &config.server.public_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("server.public_url must start with http:// or https://");
        }
    }

    Ok(())
}
