use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. When unset, catalog and watch history
    /// are read from JSON files instead.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled PostgreSQL connections
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    /// JSON catalog file used when no database is configured
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// JSON watch history file used when no database is configured
    #[serde(default)]
    pub watch_history_path: Option<String>,

    /// Where the similarity index is persisted between restarts
    #[serde(default)]
    pub index_path: Option<String>,

    /// Number of recommendations returned when the caller does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Upper bound accepted for a caller-supplied `top_n`
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Vocabulary cap for tag vectorization
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

pub(crate) fn default_top_n() -> usize {
    3
}

pub(crate) fn default_max_top_n() -> usize {
    50
}

pub(crate) fn default_max_features() -> usize {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the recommender cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be at least 1");
        }
        if self.max_features == 0 {
            anyhow::bail!("MAX_FEATURES must be at least 1");
        }
        if self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N ({}) exceeds MAX_TOP_N ({})",
                self.default_top_n,
                self.max_top_n
            );
        }
        Ok(())
    }
}
