//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration and locally persisted state (settings, recent cities)
//! - The geocode-then-fetch chain over Nominatim and Open-Meteo
//! - Normalization of provider responses into [`WeatherRecord`]s
//! - Display helpers shared by front ends
//!
//! It is used by `dashboard-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod geocode;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod recent;
pub mod service;
pub mod settings;
pub mod storage;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{ErrorKind, WeatherError};
pub use model::{Coordinates, Place, Query, WeatherRecord};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use recent::RecentCities;
pub use service::WeatherService;
pub use settings::Settings;
pub use storage::LocalStore;
