pub mod errors;
pub mod export;
pub mod schema;

pub use errors::ParserError;
pub use export::{parse_scrobble_export, read_scrobble_export};
pub use schema::{ExportColumn, DISCARDED_COLUMNS, EXPORT_COLUMNS};

#[cfg(test)]
mod tests;
