pub mod aggregator;
pub mod clock;
pub mod config;
pub mod enricher;
pub mod error;
pub mod histogram;
pub mod merger;
pub mod report;
pub mod stats;
pub mod types;
