/// Startup configuration errors. The only fatal failures in the
/// application: everything past startup is recovered at its boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {0} has invalid value `{1}`")]
    InvalidVar(&'static str, String),
}

/// Failures of a single weather fetch. Each maps to one user-facing
/// message at the CLI boundary; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0} is not a recognised city in Gujarat state")]
    UnsupportedCity(String),

    #[error("weather API key is not configured; set WEATHER_API_KEY")]
    MissingApiKey,

    #[error("weather request timed out; check your internet connection")]
    Timeout,

    #[error("error fetching weather data: {0}")]
    Transport(String),

    #[error("error parsing weather data; missing field `{0}`")]
    MissingField(&'static str),
}
