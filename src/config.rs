//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Store Connection ===
    /// Database user.
    #[serde(default = "default_db_user")]
    pub db_user: String,

    /// Database password.
    #[serde(default = "default_db_pass")]
    pub db_pass: String,

    /// Database host.
    #[serde(default = "default_db_host")]
    pub db_host: String,

    /// Database port.
    #[serde(default = "default_db_port")]
    pub db_port: u16,

    /// Database (schema) name.
    #[serde(default = "default_db_name")]
    pub db_name: String,

    // === Store Startup ===
    /// Connection attempts before giving up at startup.
    #[serde(default = "default_connect_attempts")]
    pub db_connect_attempts: u32,

    /// Seconds to wait between connection attempts.
    #[serde(default = "default_connect_retry_seconds")]
    pub db_connect_retry_seconds: u64,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    // === Server Configuration ===
    /// HTTP port the server binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the static frontend.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,

    /// Mount the legacy item controller under `/items`.
    #[serde(default)]
    pub enable_items: bool,
}

fn default_db_user() -> String {
    "usuario".to_string()
}

fn default_db_pass() -> String {
    "senha123".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_name() -> String {
    "database".to_string()
}

fn default_connect_attempts() -> u32 {
    10
}

fn default_connect_retry_seconds() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    5
}

fn default_port() -> u16 {
    8080
}

fn default_frontend_dir() -> String {
    "./frontend".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_user: default_db_user(),
            db_pass: default_db_pass(),
            db_host: default_db_host(),
            db_port: default_db_port(),
            db_name: default_db_name(),
            db_connect_attempts: default_connect_attempts(),
            db_connect_retry_seconds: default_connect_retry_seconds(),
            db_max_connections: default_max_connections(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
            enable_items: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from `(NAME, value)` pairs.
    ///
    /// Blank values (e.g. `DB_PORT=`) are treated as unset, so every setting
    /// falls back to its default.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars.into_iter().filter(|(_, value)| !value.trim().is_empty()))
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.db_host.trim().is_empty() {
            return Err("DB_HOST must not be empty".to_string());
        }

        if self.db_name.trim().is_empty() {
            return Err("DB_NAME must not be empty".to_string());
        }

        if self.db_connect_attempts == 0 {
            return Err("DB_CONNECT_ATTEMPTS must be at least 1".to_string());
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        Ok(())
    }

    /// MySQL connection URL with the password masked, for logs.
    pub fn redacted_database_url(&self) -> String {
        format!(
            "mysql://{}:****@{}:{}/{}",
            self.db_user, self.db_host, self.db_port, self.db_name
        )
    }
}
