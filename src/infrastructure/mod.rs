//! Infrastructure layer: external integrations.

pub mod agent;
pub mod browser;
pub mod config;
