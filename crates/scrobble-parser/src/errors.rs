use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to read export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export header is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("export header lists column '{column}' more than once")]
    DuplicateColumn { column: &'static str },

    #[error("data row on line {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("failed to build export dataframe: {0}")]
    Polars(#[from] PolarsError),
}
