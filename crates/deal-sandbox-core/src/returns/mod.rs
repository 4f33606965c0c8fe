pub mod extended;
pub mod metrics;
