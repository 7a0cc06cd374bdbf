mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};

use crate::genome::Taxonomy;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";
pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_RECOMMEND_LIMIT: usize = 20;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub taxonomy: Option<String>,
    pub window_size: usize,
    pub recommend_limit: usize,
    pub api_base_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            taxonomy: None,
            window_size: DEFAULT_WINDOW_SIZE,
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
            api_base_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub taxonomy: Taxonomy,
    pub window_size: usize,
    pub recommend_limit: usize,
    pub api_base_url: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let taxonomy_str = file.taxonomy.or_else(|| cli.taxonomy.clone());
        let taxonomy = match taxonomy_str {
            Some(s) => match Taxonomy::from_config_str(&s) {
                Some(taxonomy) => taxonomy,
                None => bail!("Unknown taxonomy variant: '{}' (expected 'classic' or 'composite')", s),
            },
            None => Taxonomy::default(),
        };

        let window_size = file.window_size.unwrap_or(cli.window_size);
        if window_size == 0 {
            bail!("window_size must be greater than zero");
        }

        let recommend_limit = file.recommend_limit.unwrap_or(cli.recommend_limit);

        let api_base_url = file
            .api_base_url
            .or_else(|| cli.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            taxonomy,
            window_size,
            recommend_limit,
            api_base_url,
        })
    }
}
