use std::collections::BTreeMap;

use chrono::NaiveTime;
use polars::df;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::clock::minutes_to_clock;
use crate::enricher::EnrichedScrobbles;
use crate::stats::MeanStd;
use crate::types::{Bucket, Weekday};

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("enriched table is missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' is null")]
    NullValue { column: &'static str, row: usize },
    #[error("row {row}: {message}")]
    UnknownWeekday { row: usize, message: String },
    #[error("mean day minute {0} cannot be shown as a clock time")]
    ClockOutOfRange(f64),
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Statistics for one (weekday, before_noon) bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub bucket: Bucket,
    pub rows: usize,
    pub day_minute: MeanStd,
    /// `day_minute.mean` as a time of day; the std stays in minutes.
    pub mean_clock: NaiveTime,
    pub times_listened: MeanStd,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSummary {
    buckets: Vec<BucketStats>,
}

impl BucketSummary {
    pub fn buckets(&self) -> &[BucketStats] {
        &self.buckets
    }

    pub fn get(&self, bucket: &Bucket) -> Option<&BucketStats> {
        self.buckets
            .binary_search_by(|stats| stats.bucket.cmp(bucket))
            .ok()
            .map(|idx| &self.buckets[idx])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn to_dataframe(&self) -> Result<DataFrame, PolarsError> {
        let weekday: Vec<&str> = self.buckets.iter().map(|s| s.bucket.weekday.as_str()).collect();
        let before_noon: Vec<bool> = self.buckets.iter().map(|s| s.bucket.before_noon).collect();
        let clock: Vec<String> = self.buckets.iter().map(|s| s.mean_clock.to_string()).collect();
        let minute_std: Vec<f64> = self.buckets.iter().map(|s| s.day_minute.std).collect();
        let listened_mean: Vec<f64> = self
            .buckets
            .iter()
            .map(|s| s.times_listened.mean)
            .collect();
        let listened_std: Vec<f64> = self.buckets.iter().map(|s| s.times_listened.std).collect();

        df![
            "weekday" => weekday,
            "before_noon" => before_noon,
            "day_minute_mean" => clock,
            "day_minute_std" => minute_std,
            "times_listened_mean" => listened_mean,
            "times_listened_std" => listened_std,
        ]
    }
}

#[derive(Default)]
struct BucketAccumulator {
    day_minutes: Vec<f64>,
    times_listened: Vec<f64>,
}

fn column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, AggregateError> {
    df.column(name).map_err(|_| AggregateError::MissingColumn(name))
}

/// Groups plays by (weekday, before_noon) and summarizes `times_listened` and
/// `day_minute` per group.
///
/// Only groups with at least one play appear. A group with a single play has
/// a defined mean and a `NaN` standard deviation. Buckets are ordered Monday to
/// Sunday, afternoon (`before_noon = false`) before morning.
pub fn aggregate_buckets(scrobbles: &EnrichedScrobbles) -> Result<BucketSummary, AggregateError> {
    let df = scrobbles.dataframe();
    let weekday = column(df, "weekday")?.str()?;
    let before_noon = column(df, "before_noon")?.bool()?;
    let day_minute = column(df, "day_minute")?.i64()?;
    let times_listened = column(df, "times_listened")?.i64()?;

    let mut groups: BTreeMap<Bucket, BucketAccumulator> = BTreeMap::new();
    for row in 0..df.height() {
        let label = weekday.get(row).ok_or(AggregateError::NullValue {
            column: "weekday",
            row,
        })?;
        let day = Weekday::try_from(label)
            .map_err(|message| AggregateError::UnknownWeekday { row, message })?;
        let morning = before_noon.get(row).ok_or(AggregateError::NullValue {
            column: "before_noon",
            row,
        })?;
        let minute = day_minute.get(row).ok_or(AggregateError::NullValue {
            column: "day_minute",
            row,
        })?;
        let listened = times_listened.get(row).ok_or(AggregateError::NullValue {
            column: "times_listened",
            row,
        })?;

        let acc = groups.entry(Bucket::new(day, morning)).or_default();
        acc.day_minutes.push(minute as f64);
        acc.times_listened.push(listened as f64);
    }

    let mut buckets = Vec::with_capacity(groups.len());
    for (bucket, acc) in groups {
        let day_minute = MeanStd::of(&acc.day_minutes);
        let mean_clock = minutes_to_clock(day_minute.mean)
            .ok_or(AggregateError::ClockOutOfRange(day_minute.mean))?;
        buckets.push(BucketStats {
            bucket,
            rows: acc.day_minutes.len(),
            day_minute,
            mean_clock,
            times_listened: MeanStd::of(&acc.times_listened),
        });
    }

    debug!(buckets = buckets.len(), "aggregated listening buckets");

    Ok(BucketSummary { buckets })
}
