//! OpenWeatherMap current-weather client.
//!
//! Fetches current conditions for supported Gujarat cities.
//! See: https://openweathermap.org/current

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::FetchError;
use crate::helpers::f64_to_decimal_2dp;

const OWM_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Bound on each outbound request (connect + response).
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The fixed set of supported cities. Queries for anything else are
/// rejected before any network call.
const GUJARAT_CITIES: [&str; 25] = [
    "Ahmedabad",
    "Surat",
    "Vadodara",
    "Rajkot",
    "Bhavnagar",
    "Jamnagar",
    "Junagadh",
    "Gandhinagar",
    "Anand",
    "Navsari",
    "Morbi",
    "Mahesana",
    "Bharuch",
    "Vapi",
    "Veraval",
    "Godhra",
    "Patan",
    "Porbandar",
    "Palanpur",
    "Valsad",
    "Nadiad",
    "Surendranagar",
    "Bhuj",
    "Gandhidham",
    "Ankleshwar",
];

/// Supported city names, sorted. Pure, no I/O.
pub fn supported_cities() -> Vec<&'static str> {
    let mut cities = GUJARAT_CITIES.to_vec();
    cities.sort_unstable();
    cities
}

/// Case-insensitive allow-list membership check.
pub fn is_supported(city: &str) -> bool {
    GUJARAT_CITIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(city))
}

/// One normalized current-weather observation, not yet persisted.
///
/// Only constructed from a fully-parsed upstream response — a response
/// missing any required field produces a `FetchError` instead.
#[derive(Debug, Clone)]
pub struct WeatherReading {
    /// Canonical city name as reported by OpenWeatherMap (not necessarily
    /// equal to the queried string).
    pub city: String,
    /// Air temperature in °C, 2 decimal places.
    pub temperature: Decimal,
    /// Perceived temperature in °C, 2 decimal places.
    pub feels_like: Decimal,
    /// Relative humidity percentage.
    pub humidity: i32,
    /// Atmospheric pressure in hPa, 2 decimal places.
    pub pressure: Decimal,
    /// Short conditions summary (e.g. "scattered clouds").
    pub description: String,
    /// Wind speed in m/s, 2 decimal places. 0 when the upstream response
    /// omits `wind.speed`.
    pub wind_speed: Decimal,
}

// --- OpenWeatherMap JSON response types ---
//
// Every field is optional at the serde layer so a partial payload
// deserializes cleanly and the missing field can be reported by name.

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    main: Option<OwmMain>,
    weather: Option<Vec<OwmWeather>>,
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<i32>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OwmClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OwmClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::build(api_key, OWM_API_URL.to_string(), FETCH_TIMEOUT)
    }

    fn build(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            http,
            api_key,
            base_url,
        }
    }

    /// Fetch current conditions for a city.
    ///
    /// Exactly one outbound request per invocation, no retries. The API key
    /// and allow-list are checked first so misconfigured or unsupported
    /// queries never reach the network.
    pub async fn fetch_current(&self, city: &str) -> Result<WeatherReading, FetchError> {
        let Some(api_key) = &self.api_key else {
            return Err(FetchError::MissingApiKey);
        };
        if !is_supported(city) {
            return Err(FetchError::UnsupportedCity(city.to_string()));
        }

        let place = format!("{},Gujarat,IN", city);
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", place.as_str()),
                ("appid", api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        let payload: OwmResponse = response.json().await.map_err(request_error)?;

        reading_from_response(payload)
    }
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Map a parsed OpenWeatherMap payload to a reading. Pure — fails with the
/// name of the first missing required field.
fn reading_from_response(payload: OwmResponse) -> Result<WeatherReading, FetchError> {
    let city = payload.name.ok_or(FetchError::MissingField("name"))?;
    let main = payload.main.ok_or(FetchError::MissingField("main"))?;
    let temperature = main.temp.ok_or(FetchError::MissingField("temp"))?;
    let feels_like = main.feels_like.ok_or(FetchError::MissingField("feels_like"))?;
    let humidity = main.humidity.ok_or(FetchError::MissingField("humidity"))?;
    let pressure = main.pressure.ok_or(FetchError::MissingField("pressure"))?;
    let description = payload
        .weather
        .and_then(|entries| entries.into_iter().next())
        .and_then(|entry| entry.description)
        .ok_or(FetchError::MissingField("weather"))?;
    let wind = payload.wind.ok_or(FetchError::MissingField("wind"))?;

    Ok(WeatherReading {
        city,
        temperature: f64_to_decimal_2dp(temperature),
        feels_like: f64_to_decimal_2dp(feels_like),
        humidity,
        pressure: f64_to_decimal_2dp(pressure),
        description,
        wind_speed: f64_to_decimal_2dp(wind.speed.unwrap_or(0.0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OwmClient {
        OwmClient::build(
            Some("test-key".to_string()),
            format!("{}/data/2.5/weather", server.uri()),
            Duration::from_millis(500),
        )
    }

    fn full_payload() -> serde_json::Value {
        serde_json::json!({
            "name": "Surat",
            "dt": 1754000000,
            "main": {
                "temp": 31.416,
                "feels_like": 35.1,
                "humidity": 74,
                "pressure": 1004
            },
            "weather": [{ "description": "haze" }],
            "wind": { "speed": 3.6 }
        })
    }

    #[test]
    fn test_supported_cities_sorted() {
        let cities = supported_cities();
        assert_eq!(cities.len(), 25);
        assert_eq!(cities.first(), Some(&"Ahmedabad"));
        let mut sorted = cities.clone();
        sorted.sort_unstable();
        assert_eq!(cities, sorted);
    }

    #[test]
    fn test_is_supported_case_insensitive() {
        assert!(is_supported("Surat"));
        assert!(is_supported("surat"));
        assert!(is_supported("SURAT"));
        assert!(!is_supported("Mumbai"));
    }

    #[tokio::test]
    async fn test_unsupported_city_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_current("Mumbai").await;
        assert!(matches!(result, Err(FetchError::UnsupportedCity(city)) if city == "Mumbai"));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
            .expect(0)
            .mount(&server)
            .await;

        let client = OwmClient::build(
            None,
            format!("{}/data/2.5/weather", server.uri()),
            Duration::from_millis(500),
        );
        let result = client.fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_fetch_rounds_to_two_decimals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Surat,Gujarat,IN"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let reading = client_for(&server).fetch_current("Surat").await.unwrap();
        assert_eq!(reading.city, "Surat");
        assert_eq!(reading.temperature, Decimal::from_str("31.42").unwrap());
        assert_eq!(reading.feels_like, Decimal::from_str("35.10").unwrap());
        assert_eq!(reading.humidity, 74);
        assert_eq!(reading.pressure, Decimal::from_str("1004.00").unwrap());
        assert_eq!(reading.description, "haze");
        assert_eq!(reading.wind_speed, Decimal::from_str("3.60").unwrap());
    }

    #[tokio::test]
    async fn test_lowercase_city_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "surat,Gujarat,IN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let reading = client_for(&server).fetch_current("surat").await.unwrap();
        // Canonical name comes from the response, not the query string.
        assert_eq!(reading.city, "Surat");
    }

    #[tokio::test]
    async fn test_wind_speed_defaults_to_zero() {
        let mut payload = full_payload();
        payload["wind"] = serde_json::json!({});

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;

        let reading = client_for(&server).fetch_current("Surat").await.unwrap();
        assert_eq!(reading.wind_speed, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_missing_main_is_reported_by_name() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("main");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::MissingField("main"))));
    }

    #[tokio::test]
    async fn test_missing_wind_is_reported_by_name() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("wind");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::MissingField("wind"))));
    }

    #[tokio::test]
    async fn test_empty_weather_array_is_reported() {
        let mut payload = full_payload();
        payload["weather"] = serde_json::json!([]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::MissingField("weather"))));
    }

    #[tokio::test]
    async fn test_http_error_status_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_slow_upstream_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(full_payload())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = OwmClient::build(
            Some("test-key".to_string()),
            format!("{}/data/2.5/weather", server.uri()),
            Duration::from_millis(50),
        );
        let result = client.fetch_current("Surat").await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }
}
