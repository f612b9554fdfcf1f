//! Concrete adapter implementations for ports.

pub mod csv_issuer_adapter;
pub mod csv_price_adapter;
pub mod file_config_adapter;
pub mod json_price_adapter;
