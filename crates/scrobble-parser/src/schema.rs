/// Columns of a play-history export, in the order the raw frame is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportColumn {
    UtcTime,
    Artist,
    ArtistMbid,
    Album,
    AlbumMbid,
    Track,
    TrackMbid,
    Uts,
}

impl ExportColumn {
    pub const ALL: [ExportColumn; 8] = [
        ExportColumn::UtcTime,
        ExportColumn::Artist,
        ExportColumn::ArtistMbid,
        ExportColumn::Album,
        ExportColumn::AlbumMbid,
        ExportColumn::Track,
        ExportColumn::TrackMbid,
        ExportColumn::Uts,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            ExportColumn::UtcTime => "utc_time",
            ExportColumn::Artist => "artist",
            ExportColumn::ArtistMbid => "artist_mbid",
            ExportColumn::Album => "album",
            ExportColumn::AlbumMbid => "album_mbid",
            ExportColumn::Track => "track",
            ExportColumn::TrackMbid => "track_mbid",
            ExportColumn::Uts => "uts",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.canonical_name() == name)
    }
}

pub const EXPORT_COLUMNS: [&str; 8] = [
    "utc_time",
    "artist",
    "artist_mbid",
    "album",
    "album_mbid",
    "track",
    "track_mbid",
    "uts",
];

pub const DISCARDED_COLUMNS: [&str; 4] = ["artist_mbid", "album_mbid", "track_mbid", "uts"];
