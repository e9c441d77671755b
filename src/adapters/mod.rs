//! Concrete adapter implementations for ports.

pub mod csv_trades;
pub mod file_config_adapter;
pub mod location;
pub mod scheduler;
pub mod scoring;
#[cfg(feature = "web")]
pub mod web;
