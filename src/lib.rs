//! kalshi-dash - Prediction-market portfolio summary normalizer and terminal dashboard

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;

// Re-export commonly used types
pub use services::{compute_stats, CashUnit, DashboardView};
pub use types::*;
