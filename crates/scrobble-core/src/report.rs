use std::fs;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use scrobble_parser::read_scrobble_export;
use tracing::info;

use crate::aggregator::{aggregate_buckets, BucketSummary};
use crate::config::{PersonConfig, ReportConfig};
use crate::enricher::{enrich_scrobbles, EnrichedScrobbles};
use crate::error::{ReportError, Result};
use crate::histogram::{render_histograms, Histogram, PersonHistograms};
use crate::merger::{join_summaries, melt_mean_times_listened, JointSummary, LongForm};
use crate::stats::Describe;

/// One person's enriched plays and bucket summary.
#[derive(Debug, Clone)]
pub struct PersonReport {
    pub label: String,
    pub scrobbles: EnrichedScrobbles,
    pub summary: BucketSummary,
}

impl PersonReport {
    pub fn histograms(
        &self,
        times_listened_bins: usize,
    ) -> std::result::Result<PersonHistograms, PolarsError> {
        let times_listened: Vec<f64> = self
            .scrobbles
            .times_listened()?
            .into_iter()
            .map(|count| count as f64)
            .collect();
        let weekdays = self.scrobbles.weekdays()?;

        Ok(PersonHistograms {
            label: self.label.clone(),
            times_listened: Histogram::equal_width(&times_listened, times_listened_bins, None),
            weekdays: Histogram::weekday_counts(&weekdays),
        })
    }
}

/// Every table produced by a report run, kept for printing.
#[derive(Debug, Clone)]
pub struct ListeningReport {
    pub person_a: PersonReport,
    pub person_b: PersonReport,
    pub joint: JointSummary,
    pub long_form: LongForm,
    pub long_form_stats: Describe,
    pub joint_table_path: PathBuf,
    pub histogram_path: PathBuf,
}

pub fn load_person(person: &PersonConfig) -> Result<PersonReport> {
    let raw = read_scrobble_export(&person.export_path)?;
    let scrobbles = enrich_scrobbles(&raw)?;
    let summary = aggregate_buckets(&scrobbles)?;
    info!(
        person = %person.label,
        plays = scrobbles.len(),
        buckets = summary.len(),
        "processed listening history"
    );
    Ok(PersonReport {
        label: person.label.clone(),
        scrobbles,
        summary,
    })
}

/// Runs the whole comparison: both histories are loaded and summarized, the
/// summaries joined and written as CSV, the mean play counts unpivoted and
/// described, and the histogram figure rendered.
pub fn run_report(config: &ReportConfig) -> Result<ListeningReport> {
    config.validate()?;

    let person_a = load_person(&config.person_a)?;
    let person_b = load_person(&config.person_b)?;

    let suffix_a = format!("_{}", person_a.label);
    let suffix_b = format!("_{}", person_b.label);
    let joint = join_summaries(
        &person_a.summary,
        &person_b.summary,
        (suffix_a.as_str(), suffix_b.as_str()),
    );
    info!(
        shared_buckets = joint.len(),
        left_buckets = person_a.summary.len(),
        right_buckets = person_b.summary.len(),
        "joined bucket summaries"
    );

    fs::create_dir_all(&config.output.directory).map_err(|source| ReportError::Io {
        path: config.output.directory.clone(),
        source,
    })?;

    let joint_table_path = config.output.joint_table_path();
    joint.write_csv(&joint_table_path)?;

    let long_form = melt_mean_times_listened(&joint);
    let long_form_stats = long_form.describe();

    let histogram_path = config.output.histogram_path();
    let bins = config.display.times_listened_bins;
    render_histograms(
        &histogram_path,
        &[person_a.histograms(bins)?, person_b.histograms(bins)?],
    )?;

    Ok(ListeningReport {
        person_a,
        person_b,
        joint,
        long_form,
        long_form_stats,
        joint_table_path,
        histogram_path,
    })
}
