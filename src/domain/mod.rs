//! Domain layer: pure models and the ports the core talks through.

pub mod errors;
pub mod models;
pub mod ports;
