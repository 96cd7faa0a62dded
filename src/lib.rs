//! Backline Audio Equipment Inventory & Maintenance Server
//!
//! A REST JSON API for tracking physical audio gear: who is using what,
//! which items are broken, and who gets told about it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
