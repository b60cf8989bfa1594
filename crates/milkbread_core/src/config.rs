use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};

/// Main configuration for the milkbread bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Discord credentials and target guild
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Liveness HTTP server
    #[serde(default)]
    pub http: HttpConfig,
    /// Self-ping loop
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
    /// Bundled data locations
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Discord bot token
    #[serde(default)]
    pub token: String,
    /// Discord application ID
    pub application_id: Option<u64>,
    /// Guild the slash commands are registered against
    pub guild_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port for the liveness endpoint
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 10000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    /// Target URL for the self-ping; defaults to the local liveness endpoint
    pub url: Option<String>,
    /// Seconds between pings
    pub interval_secs: u64,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the JSON reference tables
    pub dir: String,
    /// Directory holding the bundled command images
    pub assets: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            assets: "assets".to_string(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.is_empty() {
            return Err(ConfigError::Invalid {
                field: "discord.token".to_string(),
                reason: "Bot token cannot be empty".to_string(),
            }
            .into());
        }

        if !self.discord.application_id.is_some_and(|id| id != 0) {
            return Err(ConfigError::Invalid {
                field: "discord.application_id".to_string(),
                reason: "Application ID must be set and non-zero".to_string(),
            }
            .into());
        }

        if !self.discord.guild_id.is_some_and(|id| id != 0) {
            return Err(ConfigError::Invalid {
                field: "discord.guild_id".to_string(),
                reason: "Guild ID must be set and non-zero".to_string(),
            }
            .into());
        }

        if self.keepalive.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "keepalive.interval_secs".to_string(),
                reason: "Ping interval must be at least one second".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Load configuration from environment variables and config file
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("MILKBREAD_CONFIG").unwrap_or_else(|_| "milkbread.toml".to_string());

        if Path::new(&config_path).exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|_e| ConfigError::NotFound {
                    path: config_path.clone(),
                })?;
            let config = Self::from_toml(&contents)?;
            Ok(config.override_from_env())
        } else {
            Ok(Self::default().override_from_env())
        }
    }

    /// Parse a TOML config document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config =
            toml::from_str(contents).map_err(|e| ConfigError::ParseFailed { source: e })?;
        Ok(config)
    }

    /// Override config values with environment variables
    fn override_from_env(mut self) -> Self {
        if let Ok(token) = env::var("DISCORD_TOKEN") {
            self.discord.token = token;
        }
        if let Ok(app_id) = env::var("APP_ID") {
            if let Ok(id) = app_id.parse() {
                self.discord.application_id = Some(id);
            }
        }
        if let Ok(guild_id) = env::var("GUILD_ID") {
            if let Ok(id) = guild_id.parse() {
                self.discord.guild_id = Some(id);
            }
        }

        if let Ok(port) = env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.http.port = p;
            }
        }

        if let Ok(url) = env::var("KEEPALIVE_URL") {
            self.keepalive.url = Some(url);
        }
        if let Ok(interval) = env::var("KEEPALIVE_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.keepalive.interval_secs = secs;
            }
        }

        if let Ok(dir) = env::var("DATA_DIR") {
            self.data.dir = dir;
        }
        if let Ok(assets) = env::var("ASSETS_DIR") {
            self.data.assets = assets;
        }

        self
    }

    /// Effective self-ping target
    pub fn ping_url(&self) -> String {
        self.keepalive
            .url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/", self.http.port))
    }

    /// Effective self-ping cadence
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive.interval_secs)
    }
}

/// Helper to load dotenv file if it exists
pub fn load_dotenv() {
    if let Ok(path) = env::var("DOTENV_PATH") {
        dotenvy::from_path(&path).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http.port, 10000);
        assert_eq!(config.keepalive.interval_secs, 300);
        assert_eq!(config.data.dir, "data");
        assert_eq!(config.ping_url(), "http://127.0.0.1:10000/");
        assert_eq!(config.ping_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_from_toml_partial_file() {
        let config = Config::from_toml(
            r#"
            [discord]
            token = "abc"
            application_id = 42
            guild_id = 99

            [http]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.application_id, Some(42));
        assert_eq!(config.http.port, 8080);
        // Sections absent from the file fall back to defaults
        assert_eq!(config.keepalive.interval_secs, 300);
        assert_eq!(config.ping_url(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_explicit_ping_url_wins() {
        let mut config = Config::default();
        config.keepalive.url = Some("https://example.com/wake".to_string());
        assert_eq!(config.ping_url(), "https://example.com/wake");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.discord.token = "abc".to_string();
        assert!(config.validate().is_err());

        config.discord.application_id = Some(42);
        config.discord.guild_id = Some(0);
        assert!(config.validate().is_err());

        config.discord.guild_id = Some(99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.discord.token = "abc".to_string();
        config.discord.application_id = Some(42);
        config.discord.guild_id = Some(99);
        config.keepalive.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_rejects_bad_syntax() {
        assert!(Config::from_toml("[discord\ntoken = ").is_err());
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("milkbread.toml");
        std::fs::write(
            &path,
            "[discord]\ntoken = \"file-token\"\n\n[http]\nport = 8080\n",
        )
        .unwrap();

        // set_var is unsafe on this toolchain; no other test in this
        // binary reads the process environment.
        unsafe {
            env::set_var("MILKBREAD_CONFIG", &path);
            env::set_var("DISCORD_TOKEN", "env-token");
            env::set_var("APP_ID", "1234");
            env::set_var("GUILD_ID", "5678");
            env::set_var("PORT", "4321");
        }

        let config = Config::load().unwrap();

        unsafe {
            env::remove_var("MILKBREAD_CONFIG");
            env::remove_var("DISCORD_TOKEN");
            env::remove_var("APP_ID");
            env::remove_var("GUILD_ID");
            env::remove_var("PORT");
        }

        assert_eq!(config.discord.token, "env-token");
        assert_eq!(config.discord.application_id, Some(1234));
        assert_eq!(config.discord.guild_id, Some(5678));
        assert_eq!(config.http.port, 4321);
    }
}
