//! MySQL access layer for weather observations.
//!
//! `WeatherStore` owns at most one connection to the `weather_data` table
//! and moves between two states: Disconnected (after construction or
//! `close`) and Connected (after a successful `connect`). Every read/write
//! method guards against the Disconnected state and catches its own query
//! errors, returning an empty result instead of propagating — a failed
//! database must never crash an interactive session, at the cost of
//! silently degraded results.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::DbConfig;
use crate::db::models::{CityCount, WeatherRecord};
use crate::services::openweather::WeatherReading;

/// Bound on connect and on each individual query.
const DB_TIMEOUT: Duration = Duration::from_secs(10);

/// Data-access object for the `weather_data` table.
pub struct WeatherStore {
    config: DbConfig,
    /// `None` while disconnected. Capped at a single connection: one user,
    /// one logical session, no concurrent callers.
    pool: Option<MySqlPool>,
}

impl WeatherStore {
    /// Create a store in the Disconnected state. The configuration was
    /// already validated by `DbConfig::from_env`.
    pub fn new(config: DbConfig) -> Self {
        Self { config, pool: None }
    }

    /// Open the database connection. Returns `false` (and logs) on any
    /// connect failure — auth, network, or timeout.
    pub async fn connect(&mut self) -> bool {
        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(&self.config.database);

        let connect = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(DB_TIMEOUT)
            .connect_with(options);

        match tokio::time::timeout(DB_TIMEOUT, connect).await {
            Ok(Ok(pool)) => {
                tracing::info!(
                    "Connected to MySQL database {} at {}:{}",
                    self.config.database,
                    self.config.host,
                    self.config.port
                );
                self.pool = Some(pool);
                true
            }
            Ok(Err(e)) => {
                tracing::error!("Database connection failed: {}", e);
                false
            }
            Err(_) => {
                tracing::error!("Database connection timed out");
                false
            }
        }
    }

    /// Create the `weather_data` table if it does not exist. Safe to call
    /// repeatedly; a single DDL statement, no surrounding transaction.
    pub async fn ensure_schema(&self) {
        let Some(pool) = &self.pool else {
            return;
        };

        let ddl = sqlx::query(
            "CREATE TABLE IF NOT EXISTS weather_data (
                id INT AUTO_INCREMENT PRIMARY KEY,
                city VARCHAR(100) NOT NULL,
                state VARCHAR(50) DEFAULT 'Gujarat',
                temperature DECIMAL(5,2),
                feels_like DECIMAL(5,2),
                humidity INT,
                pressure DECIMAL(7,2),
                description VARCHAR(255),
                wind_speed DECIMAL(5,2),
                INDEX idx_city (city)
            )",
        )
        .execute(pool);

        match tokio::time::timeout(DB_TIMEOUT, ddl).await {
            Ok(Ok(_)) => tracing::debug!("weather_data table is ready"),
            Ok(Err(e)) => tracing::error!("Error creating weather_data table: {}", e),
            Err(_) => tracing::error!("Table creation timed out"),
        }
    }

    /// Insert one observation. The `state` column is filled by its default.
    /// Returns the generated row id, or `None` on failure (logged).
    pub async fn insert(&self, reading: &WeatherReading) -> Option<u64> {
        let Some(pool) = &self.pool else {
            return None;
        };

        let insert = sqlx::query(
            "INSERT INTO weather_data (city, temperature, feels_like, humidity,
                                       pressure, description, wind_speed)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&reading.city)
        .bind(reading.temperature)
        .bind(reading.feels_like)
        .bind(reading.humidity)
        .bind(reading.pressure)
        .bind(&reading.description)
        .bind(reading.wind_speed)
        .execute(pool);

        match tokio::time::timeout(DB_TIMEOUT, insert).await {
            Ok(Ok(result)) => Some(result.last_insert_id()),
            Ok(Err(e)) => {
                tracing::error!("Error inserting weather data for {}: {}", reading.city, e);
                None
            }
            Err(_) => {
                tracing::error!("Weather data insert for {} timed out", reading.city);
                None
            }
        }
    }

    /// Most recent observations for a city, newest first, capped at `limit`.
    pub async fn history_for(&self, city: &str, limit: u32) -> Vec<WeatherRecord> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };

        let query = sqlx::query_as::<_, WeatherRecord>(
            "SELECT id, city, state, temperature, feels_like, humidity,
                    pressure, description, wind_speed
             FROM weather_data
             WHERE city = ?
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(city)
        .bind(limit)
        .fetch_all(pool);

        match tokio::time::timeout(DB_TIMEOUT, query).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::error!("Error fetching weather history for {}: {}", city, e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("Weather history query for {} timed out", city);
                Vec::new()
            }
        }
    }

    /// All observations for a city, newest first.
    pub async fn all_for(&self, city: &str) -> Vec<WeatherRecord> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };

        let query = sqlx::query_as::<_, WeatherRecord>(
            "SELECT id, city, state, temperature, feels_like, humidity,
                    pressure, description, wind_speed
             FROM weather_data
             WHERE city = ?
             ORDER BY id DESC",
        )
        .bind(city)
        .fetch_all(pool);

        match tokio::time::timeout(DB_TIMEOUT, query).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::error!("Error fetching weather data for {}: {}", city, e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("Weather data query for {} timed out", city);
                Vec::new()
            }
        }
    }

    /// Cities that have stored observations, with per-city record counts,
    /// alphabetical by city.
    pub async fn cities_with_counts(&self) -> Vec<CityCount> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };

        let query = sqlx::query_as::<_, CityCount>(
            "SELECT city, COUNT(*) AS record_count
             FROM weather_data
             GROUP BY city
             ORDER BY city",
        )
        .fetch_all(pool);

        match tokio::time::timeout(DB_TIMEOUT, query).await {
            Ok(Ok(counts)) => counts,
            Ok(Err(e)) => {
                tracing::error!("Error fetching city list: {}", e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("City list query timed out");
                Vec::new()
            }
        }
    }

    /// Every stored observation, newest first.
    pub async fn all_records(&self) -> Vec<WeatherRecord> {
        let Some(pool) = &self.pool else {
            return Vec::new();
        };

        let query = sqlx::query_as::<_, WeatherRecord>(
            "SELECT id, city, state, temperature, feels_like, humidity,
                    pressure, description, wind_speed
             FROM weather_data
             ORDER BY id DESC",
        )
        .fetch_all(pool);

        match tokio::time::timeout(DB_TIMEOUT, query).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::error!("Error fetching all weather data: {}", e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("All weather data query timed out");
                Vec::new()
            }
        }
    }

    /// Release the connection. No-op when already disconnected.
    pub async fn close(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            tracing::info!("MySQL connection closed");
        }
    }
}
