//! Port traits at the engine's boundary.

pub mod config_port;
pub mod issuer_port;
pub mod price_port;
