//! Stored-records web form.
//!
//! - GET  / — renders an empty search form
//! - POST / — form field `city`; renders all stored records for that city
//!
//! The web path only reads history; it never fetches new observations.

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use crate::config::DbConfig;
use crate::db::models::WeatherRecord;
use crate::db::store::WeatherStore;

/// Shared state for the record routes.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConfig,
}

/// Search form body.
#[derive(Debug, Deserialize)]
pub struct CityForm {
    pub city: String,
}

/// Render the empty search form.
pub async fn show_form() -> Html<String> {
    Html(render_page(None))
}

/// Look up all stored records for the submitted city.
///
/// Opens and closes its own store instance per request — one user, one
/// short-lived connection, no pool shared across requests. A connect
/// failure degrades to the no-records rendering.
pub async fn search_records(
    State(state): State<AppState>,
    Form(form): Form<CityForm>,
) -> Html<String> {
    let city = form.city.trim().to_string();
    if city.is_empty() {
        return Html(render_page(None));
    }

    let mut store = WeatherStore::new(state.db.clone());
    let records = if store.connect().await {
        let records = store.all_for(&city).await;
        store.close().await;
        records
    } else {
        Vec::new()
    };

    Html(render_page(Some((city, records))))
}

/// Build the full page: search form plus, after a POST, the result section.
fn render_page(results: Option<(String, Vec<WeatherRecord>)>) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Gujarat Weather Records</title></head>\n\
         <body>\n\
         <h1>Gujarat Weather Records</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"city\">City:</label>\n\
         <input type=\"text\" id=\"city\" name=\"city\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n",
    );

    if let Some((city, records)) = results {
        page.push_str(&render_results(&city, &records));
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_results(city: &str, records: &[WeatherRecord]) -> String {
    if records.is_empty() {
        return format!(
            "<p>No weather records found for {}.</p>\n",
            escape_html(city)
        );
    }

    let mut section = format!(
        "<h2>Records for {}</h2>\n\
         <table border=\"1\">\n\
         <tr><th>ID</th><th>City</th><th>State</th><th>Temp (&deg;C)</th>\
         <th>Feels like (&deg;C)</th><th>Humidity (%)</th><th>Pressure (hPa)</th>\
         <th>Description</th><th>Wind (m/s)</th></tr>\n",
        escape_html(city)
    );
    for record in records {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            record.id,
            escape_html(&record.city),
            escape_html(&record.state),
            record.temperature,
            record.feels_like,
            record.humidity,
            record.pressure,
            escape_html(&record.description),
            record.wind_speed,
        ));
    }
    section.push_str("</table>\n");
    section
}

/// Escape text interpolated into HTML. City names and descriptions come
/// from user input and the upstream API respectively.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
