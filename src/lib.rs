//! Salon Booking Server
//!
//! REST JSON API for hair and beauty salons: salons, staff, services,
//! weekly schedules and closures, slot availability and conflict-checked
//! bookings.

use std::sync::Arc;

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
