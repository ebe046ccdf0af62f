//! Current-weather fetcher for Gujarat cities.
//!
//! Fetches observations from OpenWeatherMap for a fixed set of supported
//! cities, stores them in a MySQL `weather_data` table, and serves them
//! through an interactive CLI menu (`gujarat-weather`) and a minimal web
//! form (`gujarat-weather-web`).

pub mod config;
pub mod db;
pub mod errors;
pub mod routes;
pub mod services;

mod helpers;
