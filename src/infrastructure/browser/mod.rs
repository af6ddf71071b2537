//! Browser automation endpoint client.

pub mod client;

pub use client::BrowserStateClient;
