//! Domain services: report aggregation and failure mining.

pub mod improve;
pub mod report;

pub use improve::FailureMiner;
pub use report::ReportAggregator;
