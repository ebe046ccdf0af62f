//! Interactive menu for fetching and browsing Gujarat weather.
//!
//! Menu options: 1 = fetch + display + store, 2 = last-5 history for a
//! city, 3 = list supported cities, 4 = exit. Single user, one database
//! connection for the whole session.

use std::io::{self, Write};

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gujarat_weather::config::AppConfig;
use gujarat_weather::db::store::WeatherStore;
use gujarat_weather::services::openweather::{supported_cities, OwmClient, WeatherReading};

/// Rows shown by the history view.
const HISTORY_LIMIT: u32 = 5;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gujarat_weather=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if config.weather_api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY is not set; weather fetches will fail until configured");
    }

    // Say goodbye on Ctrl-C instead of dying mid-prompt.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nInterrupted. Goodbye!");
            std::process::exit(0);
        }
    });

    println!("Welcome to the Gujarat Weather App");

    let mut store = WeatherStore::new(config.db.clone());
    if !store.connect().await {
        eprintln!("Failed to set up the database. Exiting.");
        std::process::exit(1);
    }
    store.ensure_schema().await;

    let client = OwmClient::new(config.weather_api_key.clone());

    loop {
        print_menu();
        let Some(choice) = prompt("Enter your choice (1-4): ") else {
            break;
        };
        match choice.as_str() {
            "1" => fetch_and_store(&client, &store).await,
            "2" => show_history(&store).await,
            "3" => show_cities(),
            "4" => {
                println!("Thank you for using the Gujarat Weather App!");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-4."),
        }
    }

    store.close().await;
}

fn print_menu() {
    let line = "=".repeat(50);
    println!("\n{line}");
    println!("MAIN MENU");
    println!("{line}");
    println!("1. Get weather for a city");
    println!("2. View weather history");
    println!("3. Show available cities");
    println!("4. Exit");
    println!("{}", "-".repeat(50));
}

/// Print a prompt and read one trimmed line. `None` on EOF.
fn prompt(message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Menu option 1: fetch current conditions, display them, store the row.
async fn fetch_and_store(client: &OwmClient, store: &WeatherStore) {
    let Some(city) = prompt("\nEnter city name: ") else {
        return;
    };
    if city.is_empty() {
        println!("Please enter a valid city name");
        return;
    }

    println!("Fetching weather data for {city}...");
    match client.fetch_current(&city).await {
        Ok(reading) => {
            display_reading(&reading);
            match store.insert(&reading).await {
                Some(id) => println!("Weather data saved to database (ID: {id})"),
                None => println!("Failed to save weather data to database"),
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn display_reading(reading: &WeatherReading) {
    let line = "=".repeat(50);
    println!("\n{line}");
    println!("WEATHER REPORT FOR {}", reading.city.to_uppercase());
    println!("{line}");
    println!("Temperature:  {} °C", reading.temperature);
    println!("Feels like:   {} °C", reading.feels_like);
    println!("Humidity:     {} %", reading.humidity);
    println!("Pressure:     {} hPa", reading.pressure);
    println!("Conditions:   {}", reading.description);
    println!("Wind speed:   {} m/s", reading.wind_speed);
    println!("Retrieved at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{line}");
}

/// Menu option 2: last few stored observations for a city.
async fn show_history(store: &WeatherStore) {
    let Some(city) = prompt("\nEnter city name for history: ") else {
        return;
    };
    if city.is_empty() {
        println!("Please enter a valid city name");
        return;
    }

    let history = store.history_for(&city, HISTORY_LIMIT).await;
    if history.is_empty() {
        println!("No weather history found for {city}");
        return;
    }

    let rule = "-".repeat(60);
    println!("\nRECENT WEATHER HISTORY FOR {}", city.to_uppercase());
    println!("{rule}");
    println!(
        "{:<6} {:<10} {:<10} {:<25}",
        "ID", "Temp", "Humidity", "Description"
    );
    println!("{rule}");
    for record in &history {
        println!(
            "{:<6} {:<10} {:<10} {:<25}",
            record.id,
            format!("{} °C", record.temperature),
            format!("{} %", record.humidity),
            record.description,
        );
    }
    println!("{rule}");
}

/// Menu option 3: the supported cities, three per row.
fn show_cities() {
    println!("\nAvailable Gujarat cities:");
    let rule = "-".repeat(48);
    println!("{rule}");
    for row in supported_cities().chunks(3) {
        let mut line = String::new();
        for city in row {
            line.push_str(&format!("{city:<16}"));
        }
        println!("{}", line.trim_end());
    }
    println!("{rule}");
}
