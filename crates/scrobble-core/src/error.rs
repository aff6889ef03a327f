// crates/scrobble-core/src/error.rs

use std::path::PathBuf;

use scrobble_parser::ParserError;
use thiserror::Error;

use crate::aggregator::AggregateError;
use crate::config::ConfigError;
use crate::enricher::EnrichError;
use crate::histogram::RenderError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Export parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("Enrichment failed: {0}")]
    Enrich(#[from] EnrichError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Histogram rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
