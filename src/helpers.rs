//! f64 → Decimal conversion for weather values.
//!
//! OpenWeatherMap reports metric values as JSON floats; the `weather_data`
//! columns are fixed-precision DECIMALs rounded to 2 fractional digits.
//! Non-finite inputs (NaN, ±Inf) convert to `Decimal::ZERO`.

use rust_decimal::Decimal;

/// Convert an f64 to Decimal, rounded to 2 decimal places.
pub(crate) fn f64_to_decimal_2dp(v: f64) -> Decimal {
    if !v.is_finite() {
        tracing::warn!(
            "f64_to_decimal_2dp received non-finite value {}, defaulting to 0",
            v
        );
        return Decimal::ZERO;
    }
    Decimal::from_str_exact(&format!("{:.2}", v)).unwrap_or_default()
}
