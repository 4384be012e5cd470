use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Persistence backend selection
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outbound HTTP behaviour of the scraper
    #[serde(default)]
    pub http: HttpConfig,
    /// Extraction heuristics
    #[serde(default)]
    pub scraper: ScraperConfig,
}

/// Which store implementation backs the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Flat JSON file holding the whole collection
    JsonFile,
    /// SQLite database storing one JSON document per recipe
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Path of the JSON file or SQLite database
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every outbound request. Some recipe sites
    /// answer 403 to anything that does not look like a browser.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Structured-data titles containing one of these substrings
    /// (case-insensitive) are discarded in favour of the page heading.
    #[serde(default = "default_title_blocklist")]
    pub title_blocklist: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            title_blocklist: default_title_blocklist(),
        }
    }
}

// Default value functions
fn default_backend() -> StorageBackend {
    StorageBackend::JsonFile
}

fn default_store_path() -> String {
    "recipes.json".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_title_blocklist() -> Vec<String> {
    vec!["swissmilk".to_string()]
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPEBOX__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPEBOX__STORAGE__BACKEND
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: RECIPEBOX__HTTP__TIMEOUT
            .add_source(
                Environment::with_prefix("RECIPEBOX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
