use std::fs::File;
use std::path::Path;

use polars::df;
use polars::prelude::*;
use tracing::info;

use crate::aggregator::{BucketStats, BucketSummary};
use crate::error::{ReportError, Result};
use crate::stats::Describe;
use crate::types::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    DayMinute,
    TimesListened,
}

impl Metric {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Metric::DayMinute => "day_minute",
            Metric::TimesListened => "times_listened",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Std,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
        }
    }
}

/// A single numeric column of the joint summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeltColumn {
    pub side: Side,
    pub metric: Metric,
    pub statistic: Statistic,
}

impl MeltColumn {
    pub fn new(side: Side, metric: Metric, statistic: Statistic) -> Self {
        Self {
            side,
            metric,
            statistic,
        }
    }

    /// Reads the column from one side's bucket. The day-minute mean is taken
    /// in minutes rather than as a clock time.
    pub fn value(&self, stats: &BucketStats) -> f64 {
        let pair = match self.metric {
            Metric::DayMinute => stats.day_minute,
            Metric::TimesListened => stats.times_listened,
        };
        match self.statistic {
            Statistic::Mean => pair.mean,
            Statistic::Std => pair.std,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointRow {
    pub bucket: Bucket,
    pub left: BucketStats,
    pub right: BucketStats,
}

impl JointRow {
    pub fn side(&self, side: Side) -> &BucketStats {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Buckets present in both persons' summaries, side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct JointSummary {
    suffixes: (String, String),
    rows: Vec<JointRow>,
}

impl JointSummary {
    pub fn rows(&self) -> &[JointRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn suffix(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.suffixes.0,
            Side::Right => &self.suffixes.1,
        }
    }

    /// Label of a metric on one side, e.g. `times_listened_A`.
    pub fn variable_name(&self, side: Side, metric: Metric) -> String {
        format!("{}{}", metric.canonical_name(), self.suffix(side))
    }

    /// Flattened header for a `(metric+suffix, statistic)` column pair.
    pub fn column_name(&self, column: MeltColumn) -> String {
        format!(
            "{}_{}",
            self.variable_name(column.side, column.metric),
            column.statistic.as_str()
        )
    }

    pub fn to_dataframe(&self) -> std::result::Result<DataFrame, PolarsError> {
        let mut columns: Vec<Column> = vec![
            Series::new(
                "weekday".into(),
                self.rows
                    .iter()
                    .map(|r| r.bucket.weekday.as_str())
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "before_noon".into(),
                self.rows
                    .iter()
                    .map(|r| r.bucket.before_noon)
                    .collect::<Vec<_>>(),
            )
            .into(),
        ];

        for side in [Side::Left, Side::Right] {
            let clock: Vec<String> = self
                .rows
                .iter()
                .map(|r| r.side(side).mean_clock.to_string())
                .collect();
            let clock_name =
                self.column_name(MeltColumn::new(side, Metric::DayMinute, Statistic::Mean));
            columns.push(Series::new(clock_name.into(), clock).into());

            for column in [
                MeltColumn::new(side, Metric::DayMinute, Statistic::Std),
                MeltColumn::new(side, Metric::TimesListened, Statistic::Mean),
                MeltColumn::new(side, Metric::TimesListened, Statistic::Std),
            ] {
                let values: Vec<f64> = self
                    .rows
                    .iter()
                    .map(|r| column.value(r.side(side)))
                    .collect();
                columns.push(Series::new(self.column_name(column).into(), values).into());
            }
        }

        DataFrame::new(columns)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        info!(path = %path.display(), rows = df.height(), "wrote joint summary");
        Ok(())
    }
}

/// Inner join of two summaries on their bucket key.
///
/// Buckets missing from either side are dropped. `suffixes` distinguish the
/// left and right columns in flattened headers and melt labels.
pub fn join_summaries(
    left: &BucketSummary,
    right: &BucketSummary,
    suffixes: (&str, &str),
) -> JointSummary {
    let rows: Vec<JointRow> = left
        .buckets()
        .iter()
        .filter_map(|left_stats| {
            right.get(&left_stats.bucket).map(|right_stats| JointRow {
                bucket: left_stats.bucket,
                left: left_stats.clone(),
                right: right_stats.clone(),
            })
        })
        .collect();

    JointSummary {
        suffixes: (suffixes.0.to_string(), suffixes.1.to_string()),
        rows,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongFormRow {
    pub bucket: Bucket,
    pub variable: String,
    pub value: f64,
}

/// Unpivoted view of selected joint summary columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongForm {
    rows: Vec<LongFormRow>,
}

impl LongForm {
    pub fn rows(&self) -> &[LongFormRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    pub fn describe(&self) -> Describe {
        Describe::of(&self.values())
    }

    pub fn to_dataframe(&self) -> std::result::Result<DataFrame, PolarsError> {
        let weekday: Vec<&str> = self.rows.iter().map(|r| r.bucket.weekday.as_str()).collect();
        let before_noon: Vec<bool> = self.rows.iter().map(|r| r.bucket.before_noon).collect();
        let variable: Vec<&str> = self.rows.iter().map(|r| r.variable.as_str()).collect();
        let value: Vec<f64> = self.values();

        df![
            "weekday" => weekday,
            "before_noon" => before_noon,
            "variable" => variable,
            "value" => value,
        ]
    }
}

/// Unpivots the selected columns into one row per (bucket, column).
///
/// Rows are grouped by column in selection order, each group listing buckets
/// in key order. `variable` names the metric and side only; the statistic
/// sub-label is dropped.
pub fn melt(joint: &JointSummary, columns: &[MeltColumn]) -> LongForm {
    let rows = columns
        .iter()
        .flat_map(|column| {
            let variable = joint.variable_name(column.side, column.metric);
            joint.rows().iter().map(move |row| LongFormRow {
                bucket: row.bucket,
                variable: variable.clone(),
                value: column.value(row.side(column.side)),
            })
        })
        .collect();

    LongForm { rows }
}

/// Both persons' mean `times_listened`, in long form.
pub fn melt_mean_times_listened(joint: &JointSummary) -> LongForm {
    melt(
        joint,
        &[
            MeltColumn::new(Side::Left, Metric::TimesListened, Statistic::Mean),
            MeltColumn::new(Side::Right, Metric::TimesListened, Statistic::Mean),
        ],
    )
}
