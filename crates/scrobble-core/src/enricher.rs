use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use polars::prelude::*;
use scrobble_parser::DISCARDED_COLUMNS;
use thiserror::Error;
use tracing::debug;

use crate::types::Weekday;

pub const TIMESTAMP_FORMAT: &str = "%d %b %Y, %H:%M";
pub const FULL_NAME_SEPARATOR: &str = " :: ";
pub const MISSING_COMPONENT: &str = "-";

/// Column names of the enriched play table, in output order.
pub const ENRICHED_COLUMNS: [&str; 6] = [
    "time",
    "weekday",
    "before_noon",
    "day_minute",
    "full_name",
    "times_listened",
];

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("row {row}: utc_time '{value}' is not a valid timestamp: {source}")]
    Timestamp {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("row {row}: utc_time is missing")]
    MissingTimestamp { row: usize },
    #[error("raw play table is missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

struct PlayRow {
    time: NaiveDateTime,
    weekday: Weekday,
    before_noon: bool,
    day_minute: i64,
    full_name: String,
}

/// Per-person play table keyed and sorted by `time`.
#[derive(Debug, Clone)]
pub struct EnrichedScrobbles {
    df: DataFrame,
}

impl EnrichedScrobbles {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn head(&self, rows: usize) -> DataFrame {
        self.df.head(Some(rows))
    }

    pub fn tail(&self, rows: usize) -> DataFrame {
        self.df.tail(Some(rows))
    }

    pub fn times_listened(&self) -> Result<Vec<i64>, PolarsError> {
        Ok(self
            .df
            .column("times_listened")?
            .i64()?
            .into_iter()
            .flatten()
            .collect())
    }

    pub fn day_minutes(&self) -> Result<Vec<i64>, PolarsError> {
        Ok(self
            .df
            .column("day_minute")?
            .i64()?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Play timestamps as microseconds since the epoch, in table order.
    pub fn time_micros(&self) -> Result<Vec<i64>, PolarsError> {
        let physical = self.df.column("time")?.cast(&DataType::Int64)?;
        Ok(physical.i64()?.into_iter().flatten().collect())
    }

    pub fn weekdays(&self) -> Result<Vec<Weekday>, PolarsError> {
        self.df
            .column("weekday")?
            .str()?
            .into_iter()
            .flatten()
            .map(|label| {
                Weekday::try_from(label).map_err(|msg| PolarsError::ComputeError(msg.into()))
            })
            .collect()
    }
}

fn text_column<'a>(
    df: &'a DataFrame,
    name: &'static str,
) -> Result<&'a StringChunked, EnrichError> {
    let column = df.column(name).map_err(|_| EnrichError::MissingColumn(name))?;
    Ok(column.str()?)
}

fn full_name(artist: Option<&str>, album: Option<&str>, track: Option<&str>) -> String {
    [artist, album, track]
        .into_iter()
        .map(|part| part.unwrap_or(MISSING_COMPONENT))
        .collect::<Vec<_>>()
        .join(FULL_NAME_SEPARATOR)
}

fn parse_play_time(row: usize, value: Option<&str>) -> Result<NaiveDateTime, EnrichError> {
    let value = value.ok_or(EnrichError::MissingTimestamp { row })?;
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        EnrichError::Timestamp {
            row,
            value: value.to_string(),
            source,
        }
    })
}

/// Turns a raw play table into the enriched per-play table.
///
/// Every raw row yields exactly one output row. `times_listened` is the number
/// of rows in the whole input sharing the row's `full_name`, so it is repeated
/// on each of those rows rather than collapsing them. The identifier columns and
/// the raw `artist`/`album`/`track` cells are not carried over, and rows come
/// out in ascending `time` order with ties kept in input order.
pub fn enrich_scrobbles(raw: &DataFrame) -> Result<EnrichedScrobbles, EnrichError> {
    let utc_time = text_column(raw, "utc_time")?;
    let artist = text_column(raw, "artist")?;
    let album = text_column(raw, "album")?;
    let track = text_column(raw, "track")?;
    for name in DISCARDED_COLUMNS {
        if raw.column(name).is_err() {
            return Err(EnrichError::MissingColumn(name));
        }
    }

    let len = raw.height();
    let mut rows: Vec<PlayRow> = Vec::with_capacity(len);
    for idx in 0..len {
        let time = parse_play_time(idx, utc_time.get(idx))?;
        rows.push(PlayRow {
            time,
            weekday: Weekday::from(time.weekday()),
            before_noon: time.hour() < 12,
            day_minute: i64::from(time.hour() * 60 + time.minute()),
            full_name: full_name(artist.get(idx), album.get(idx), track.get(idx)),
        });
    }

    let mut play_counts: HashMap<&str, i64> = HashMap::new();
    for row in &rows {
        *play_counts.entry(row.full_name.as_str()).or_insert(0) += 1;
    }
    let times_listened: Vec<i64> = rows
        .iter()
        .map(|row| play_counts.get(row.full_name.as_str()).copied().unwrap_or(0))
        .collect();

    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by_key(|idx| rows[*idx].time);

    let time: Vec<i64> = order
        .iter()
        .map(|idx| rows[*idx].time.and_utc().timestamp_micros())
        .collect();
    let weekday: Vec<&str> = order.iter().map(|idx| rows[*idx].weekday.as_str()).collect();
    let before_noon: Vec<bool> = order.iter().map(|idx| rows[*idx].before_noon).collect();
    let day_minute: Vec<i64> = order.iter().map(|idx| rows[*idx].day_minute).collect();
    let full_names: Vec<&str> = order
        .iter()
        .map(|idx| rows[*idx].full_name.as_str())
        .collect();
    let counts: Vec<i64> = order.iter().map(|idx| times_listened[*idx]).collect();

    let time_series = Series::new("time".into(), time)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let df = DataFrame::new(vec![
        time_series.into(),
        Series::new("weekday".into(), weekday).into(),
        Series::new("before_noon".into(), before_noon).into(),
        Series::new("day_minute".into(), day_minute).into(),
        Series::new("full_name".into(), full_names).into(),
        Series::new("times_listened".into(), counts).into(),
    ])?;

    debug!(
        rows = df.height(),
        distinct_tracks = play_counts.len(),
        "enriched play table"
    );

    Ok(EnrichedScrobbles { df })
}
