//! Core domain types and logic.

pub mod config_validation;
pub mod date_key;
pub mod engine_config;
pub mod error;
pub mod fetch;
pub mod issuer;
pub mod row;
pub mod table;
pub mod table_set;
pub mod views;
