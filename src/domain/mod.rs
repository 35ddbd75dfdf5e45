//! Core domain types and analytics.

pub mod ohlcv;
pub mod stats;
pub mod indicator;
pub mod forecast;
pub mod signal;
pub mod risk;
pub mod allocation;
pub mod analytics;
pub mod config;
pub mod error;
