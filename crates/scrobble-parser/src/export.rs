use std::collections::HashMap;
use std::fs;
use std::path::Path;

use csv::StringRecord;
use polars::prelude::*;
use tracing::debug;

use crate::errors::ParserError;
use crate::schema::ExportColumn;

/// Column accumulator for the raw play table. Text cells are kept verbatim;
/// empty cells become nulls.
struct ExportColumns {
    text: HashMap<ExportColumn, Vec<Option<String>>>,
    uts: Vec<Option<i64>>,
}

impl ExportColumns {
    fn new() -> Self {
        let text = ExportColumn::ALL
            .into_iter()
            .filter(|column| *column != ExportColumn::Uts)
            .map(|column| (column, Vec::new()))
            .collect();
        Self {
            text,
            uts: Vec::new(),
        }
    }

    fn push_text(&mut self, column: ExportColumn, value: &str) {
        let cell = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        self.text.entry(column).or_default().push(cell);
    }

    fn build(mut self) -> Result<DataFrame, ParserError> {
        let mut columns: Vec<Column> = Vec::with_capacity(ExportColumn::ALL.len());
        for column in ExportColumn::ALL {
            let name = column.canonical_name();
            if column == ExportColumn::Uts {
                columns.push(Series::new(name.into(), std::mem::take(&mut self.uts)).into());
                continue;
            }
            let values = self.text.remove(&column).unwrap_or_default();
            let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            columns.push(Series::new(name.into(), utf8).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn locate_columns(header: &StringRecord) -> Result<Vec<(ExportColumn, usize)>, ParserError> {
    let mut positions: HashMap<ExportColumn, usize> = HashMap::new();
    for (idx, name) in header.iter().enumerate() {
        let Some(column) = ExportColumn::from_header(name.trim()) else {
            debug!(column = name, "ignoring unrecognized export column");
            continue;
        };
        if positions.insert(column, idx).is_some() {
            return Err(ParserError::DuplicateColumn {
                column: column.canonical_name(),
            });
        }
    }

    ExportColumn::ALL
        .into_iter()
        .map(|column| {
            positions
                .get(&column)
                .map(|idx| (column, *idx))
                .ok_or(ParserError::MissingColumn {
                    column: column.canonical_name(),
                })
        })
        .collect()
}

fn parse_uts(value: &str, line_index: usize) -> Result<Option<i64>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|err| ParserError::DataRow {
            line_index,
            message: format!("failed to parse column 'uts' as integer: {err}"),
        })
}

/// Parses a play-history export into the raw play table.
///
/// The header is matched by name, so column order does not matter and unknown
/// columns are skipped. The resulting frame always carries every
/// [`ExportColumn`] in canonical order: text columns as nullable strings and
/// `uts` as nullable `Int64`.
pub fn parse_scrobble_export(content: &str) -> Result<DataFrame, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let header = reader.headers()?.clone();
    let positions = locate_columns(&header)?;

    let mut columns = ExportColumns::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let line_index = record
            .position()
            .map_or(row_idx + 2, |pos| pos.line() as usize);

        for (column, idx) in &positions {
            let value = record.get(*idx).unwrap_or_default();
            if *column == ExportColumn::Uts {
                columns.uts.push(parse_uts(value, line_index)?);
            } else {
                columns.push_text(*column, value);
            }
        }
    }

    columns.build()
}

pub fn read_scrobble_export(path: impl AsRef<Path>) -> Result<DataFrame, ParserError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let df = parse_scrobble_export(&content)?;
    debug!(path = %path.display(), rows = df.height(), "parsed scrobble export");
    Ok(df)
}
