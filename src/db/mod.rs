pub mod models;
pub mod store;

pub use models::{CityCount, WeatherRecord};
pub use store::WeatherStore;
