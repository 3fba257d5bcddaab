//! API handlers for the salon booking REST endpoints

pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod health;
pub mod openapi;
pub mod salons;
pub mod schedules;
pub mod stats;
