use std::fs;
use std::path::PathBuf;

use crate::errors::ParserError;
use crate::schema::EXPORT_COLUMNS;
use crate::{parse_scrobble_export, read_scrobble_export};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixture(name: &str) -> String {
    let full_path = fixture_path(name);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn parses_export_with_reordered_header() {
    let df = parse_scrobble_export(&fixture("scrobbles_person_a.csv")).expect("parse failed");

    assert_eq!(df.get_column_names(), EXPORT_COLUMNS);
    assert_eq!(df.height(), 6);

    let utc_time = df.column("utc_time").unwrap().str().unwrap();
    assert_eq!(utc_time.get(0), Some("15 Jan 2024, 09:05"));

    let uts = df.column("uts").unwrap().i64().unwrap();
    assert_eq!(uts.get(0), Some(1705309500));
}

#[test]
fn empty_cells_become_nulls() {
    let df = parse_scrobble_export(&fixture("scrobbles_person_a.csv")).expect("parse failed");

    let album = df.column("album").unwrap().str().unwrap();
    assert_eq!(album.get(0), None);
    assert_eq!(album.get(1), Some("Geogaddi"));

    let artist_mbid = df.column("artist_mbid").unwrap().str().unwrap();
    assert_eq!(artist_mbid.get(0), None);
    assert_eq!(artist_mbid.null_count(), 4);
}

#[test]
fn reads_export_from_disk() {
    let df = read_scrobble_export(fixture_path("scrobbles_person_b.csv")).expect("read failed");
    assert_eq!(df.height(), 4);

    let artist = df.column("artist").unwrap().str().unwrap();
    assert_eq!(artist.get(3), None);
}

#[test]
fn missing_column_is_rejected() {
    let err = parse_scrobble_export(&fixture("scrobbles_missing_track.csv"))
        .expect_err("missing track column should fail");
    assert!(matches!(err, ParserError::MissingColumn { column: "track" }));
}

#[test]
fn duplicate_column_is_rejected() {
    let content = "utc_time,artist,artist_mbid,album,album_mbid,track,track_mbid,uts,artist\n";
    let err = parse_scrobble_export(content).expect_err("duplicate column should fail");
    assert!(matches!(err, ParserError::DuplicateColumn { column: "artist" }));
}

#[test]
fn header_only_export_yields_empty_frame() {
    let content = "utc_time,artist,artist_mbid,album,album_mbid,track,track_mbid,uts\n";
    let df = parse_scrobble_export(content).expect("parse failed");
    assert_eq!(df.height(), 0);
    assert_eq!(df.get_column_names(), EXPORT_COLUMNS);
}

#[test]
fn unknown_columns_are_ignored() {
    let content = "utc_time,artist,artist_mbid,album,album_mbid,track,track_mbid,uts,loved\n\
                   \"15 Jan 2024, 09:05\",X,,,,Y,,1705309500,1\n";
    let df = parse_scrobble_export(content).expect("parse failed");
    assert_eq!(df.get_column_names(), EXPORT_COLUMNS);
    assert_eq!(df.height(), 1);
}

#[test]
fn malformed_uts_reports_line() {
    let content = "utc_time,artist,artist_mbid,album,album_mbid,track,track_mbid,uts\n\
                   \"15 Jan 2024, 09:05\",X,,,,Y,,1705309500\n\
                   \"15 Jan 2024, 09:06\",X,,,,Y,,soon\n";
    let err = parse_scrobble_export(content).expect_err("bad uts should fail");
    match err {
        ParserError::DataRow { line_index, message } => {
            assert_eq!(line_index, 3);
            assert!(message.contains("uts"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ragged_row_is_a_csv_error() {
    let content = "utc_time,artist,artist_mbid,album,album_mbid,track,track_mbid,uts\n\
                   \"15 Jan 2024, 09:05\",X,,,,Y\n";
    let err = parse_scrobble_export(content).expect_err("ragged row should fail");
    assert!(matches!(err, ParserError::Csv(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_scrobble_export(fixture_path("does_not_exist.csv"))
        .expect_err("missing file should fail");
    assert!(matches!(err, ParserError::Io { .. }));
}
