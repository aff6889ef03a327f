mod common;

use scrobble_core::aggregator::{aggregate_buckets, BucketSummary};
use scrobble_core::enricher::enrich_scrobbles;
use scrobble_core::merger::{
    join_summaries, melt, melt_mean_times_listened, MeltColumn, Metric, Side, Statistic,
};
use scrobble_core::types::{Bucket, Weekday};
use scrobble_parser::read_scrobble_export;

use common::fixture_path;

fn summary(name: &str) -> BucketSummary {
    let raw = read_scrobble_export(fixture_path(name)).expect("read");
    aggregate_buckets(&enrich_scrobbles(&raw).expect("enrich")).expect("aggregate")
}

#[test]
fn join_keeps_only_shared_buckets() {
    let a = summary("scrobbles_person_a.csv");
    let b = summary("scrobbles_person_b.csv");
    let joint = join_summaries(&a, &b, ("_A", "_B"));

    let keys: Vec<Bucket> = joint.rows().iter().map(|row| row.bucket).collect();
    assert_eq!(
        keys,
        vec![
            Bucket::new(Weekday::Mon, true),
            Bucket::new(Weekday::Tue, false),
        ]
    );
    for key in &keys {
        assert!(a.get(key).is_some() && b.get(key).is_some());
    }

    let monday = &joint.rows()[0];
    assert_eq!(monday.left.times_listened.mean, 1.0);
    assert_eq!(monday.right.times_listened.mean, 2.0);
}

#[test]
fn join_with_disjoint_summaries_is_empty() {
    let a = summary("scrobbles_person_a.csv");
    let joint = join_summaries(&a, &BucketSummary::default(), ("_A", "_B"));
    assert!(joint.is_empty());
}

#[test]
fn joint_frame_headers_are_flattened_with_suffixes() {
    let joint = join_summaries(
        &summary("scrobbles_person_a.csv"),
        &summary("scrobbles_person_b.csv"),
        ("_A", "_B"),
    );
    let df = joint.to_dataframe().unwrap();
    assert_eq!(
        df.get_column_names(),
        [
            "weekday",
            "before_noon",
            "day_minute_A_mean",
            "day_minute_A_std",
            "times_listened_A_mean",
            "times_listened_A_std",
            "day_minute_B_mean",
            "day_minute_B_std",
            "times_listened_B_mean",
            "times_listened_B_std",
        ]
    );
    assert_eq!(df.height(), 2);
}

#[test]
fn melt_emits_one_row_per_bucket_and_person() {
    let joint = join_summaries(
        &summary("scrobbles_person_a.csv"),
        &summary("scrobbles_person_b.csv"),
        ("_A", "_B"),
    );
    let long = melt_mean_times_listened(&joint);

    let rows: Vec<(Bucket, &str, f64)> = long
        .rows()
        .iter()
        .map(|row| (row.bucket, row.variable.as_str(), row.value))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Bucket::new(Weekday::Mon, true), "times_listened_A", 1.0),
            (Bucket::new(Weekday::Tue, false), "times_listened_A", 3.0),
            (Bucket::new(Weekday::Mon, true), "times_listened_B", 2.0),
            (Bucket::new(Weekday::Tue, false), "times_listened_B", 1.0),
        ]
    );

    let df = long.to_dataframe().unwrap();
    assert_eq!(
        df.get_column_names(),
        ["weekday", "before_noon", "variable", "value"]
    );

    let stats = long.describe();
    assert_eq!(stats.count, 4);
    assert!((stats.mean - 1.75).abs() < 1e-12);
    assert!((stats.median - 1.5).abs() < 1e-12);
    assert!((stats.q75 - 2.25).abs() < 1e-12);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 3.0);
}

#[test]
fn melt_respects_selected_columns() {
    let joint = join_summaries(
        &summary("scrobbles_person_a.csv"),
        &summary("scrobbles_person_b.csv"),
        ("_x", "_y"),
    );
    let long = melt(
        &joint,
        &[MeltColumn::new(Side::Right, Metric::DayMinute, Statistic::Mean)],
    );
    assert_eq!(long.len(), 2);
    assert!(long.rows().iter().all(|row| row.variable == "day_minute_y"));
    assert_eq!(long.rows()[0].value, 510.0);
    assert_eq!(long.rows()[1].value, 1215.0);
}

#[test]
fn undefined_std_is_written_as_nan() {
    let a = summary("scrobbles_person_a.csv");
    let b = summary("scrobbles_person_b.csv");
    let joint = join_summaries(&a, &b, ("_A", "_B"));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("joint_pivot_table.csv");
    joint.write_csv(&path).expect("write csv");

    let csv = std::fs::read_to_string(&path).expect("read csv");
    let tuesday = csv.lines().nth(2).expect("tuesday row");
    assert!(tuesday.split(',').any(|cell| cell == "NaN"), "{tuesday}");
    assert!(!tuesday.contains(",,"), "{tuesday}");
}
