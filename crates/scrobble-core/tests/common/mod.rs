#![allow(dead_code)]

use std::path::PathBuf;

use polars::df;
use polars::prelude::*;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../scrobble-parser/tests/data")
        .join(name)
}

/// Raw play table with empty identifier columns.
pub fn raw_frame(rows: &[(&str, Option<&str>, Option<&str>, Option<&str>)]) -> DataFrame {
    let nulls: Vec<Option<&str>> = vec![None; rows.len()];
    let uts: Vec<Option<i64>> = vec![None; rows.len()];
    df!(
        "utc_time" => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        "artist" => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
        "artist_mbid" => nulls.clone(),
        "album" => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        "album_mbid" => nulls.clone(),
        "track" => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        "track_mbid" => nulls,
        "uts" => uts,
    )
    .unwrap()
}
