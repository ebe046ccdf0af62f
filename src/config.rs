use crate::errors::ConfigError;

/// Default MySQL port when `DB_PORT` is not set.
const DEFAULT_DB_PORT: u16 = 3306;

/// Default web listener port when `PORT` is not set.
const DEFAULT_WEB_PORT: u16 = 8080;

/// Database connection settings, parsed from environment variables.
///
/// All fields except `port` are required; construction fails before any
/// connection attempt if one is missing.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require_var("DB_HOST")?,
            user: require_var("DB_USER")?,
            password: require_var("DB_PASSWORD")?,
            database: require_var("DB_NAME")?,
            port: match std::env::var("DB_PORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidVar("DB_PORT", raw))?,
                Err(_) => DEFAULT_DB_PORT,
            },
        })
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    /// OpenWeatherMap API key. Optional at startup; fetches fail with a
    /// user-facing message while unset.
    pub weather_api_key: Option<String>,
    pub web_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            db: DbConfig::from_env()?,
            weather_api_key: std::env::var("WEATHER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            web_port: match std::env::var("PORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidVar("PORT", raw))?,
                Err(_) => DEFAULT_WEB_PORT,
            },
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NOTE: set_var/remove_var in tests is unsafe in multi-threaded contexts
    // (Rust may run tests in parallel), so all env-var scenarios live in one
    // test. If Rust editions mark these as `unsafe`, wrap accordingly.

    #[test]
    fn test_db_config_from_env() {
        unsafe {
            std::env::set_var("DB_HOST", "localhost");
            std::env::set_var("DB_USER", "weather");
            std::env::set_var("DB_PASSWORD", "secret");
            std::env::set_var("DB_NAME", "weather");
            std::env::remove_var("DB_PORT");
        }

        let config = DbConfig::from_env().expect("all required vars set");
        assert_eq!(config.port, 3306);
        assert_eq!(config.host, "localhost");

        unsafe {
            std::env::set_var("DB_PORT", "not-a-port");
        }
        let err = DbConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar("DB_PORT", _)));

        unsafe {
            std::env::remove_var("DB_PORT");
            std::env::remove_var("DB_HOST");
        }
        let err = DbConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DB_HOST")));
    }
}
