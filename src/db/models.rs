use rust_decimal::Decimal;
use sqlx::FromRow;

/// One persisted weather observation from the `weather_data` table.
///
/// Rows are append-only: created by a single insert per successful fetch,
/// never updated or deleted by the application. Every store query returns
/// this full shape so callers never branch on column subsets.
#[derive(Debug, Clone, FromRow)]
pub struct WeatherRecord {
    pub id: i32,
    pub city: String,
    /// Region label, filled by the column default ('Gujarat').
    pub state: String,
    /// Air temperature in °C.
    pub temperature: Decimal,
    /// Perceived temperature in °C.
    pub feels_like: Decimal,
    /// Relative humidity percentage.
    pub humidity: i32,
    /// Atmospheric pressure in hPa.
    pub pressure: Decimal,
    /// Short free-text conditions summary (e.g. "scattered clouds").
    pub description: String,
    /// Wind speed in m/s.
    pub wind_speed: Decimal,
}

/// A city together with how many observations it has stored.
#[derive(Debug, Clone, FromRow)]
pub struct CityCount {
    pub city: String,
    pub record_count: i64,
}
