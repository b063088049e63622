//! Catalog data models read from the Plex metadata store.
//!
//! The tree is owned top-down (show -> seasons -> episodes). Children refer
//! back to their parent only through `parent_id`.

use serde::{Deserialize, Serialize};

/// Library section type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Movie,
    Show,
    /// Any other Plex section type (music, photos, ...), carried by its raw code.
    Unsupported(i64),
}

impl SectionKind {
    /// Map a Plex `section_type` code.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SectionKind::Movie,
            2 => SectionKind::Show,
            other => SectionKind::Unsupported(other),
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Movie => write!(f, "Movies"),
            SectionKind::Show => write!(f, "TV Shows"),
            SectionKind::Unsupported(code) => write!(f, "Unknown ({})", code),
        }
    }
}

/// Catalog entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Show,
    Season,
    Episode,
}

impl EntityKind {
    /// Plex `metadata_type` code for this kind.
    pub fn code(self) -> i64 {
        match self {
            EntityKind::Movie => 1,
            EntityKind::Show => 2,
            EntityKind::Season => 3,
            EntityKind::Episode => 4,
        }
    }

    /// Map a Plex `metadata_type` code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(EntityKind::Movie),
            2 => Some(EntityKind::Show),
            3 => Some(EntityKind::Season),
            4 => Some(EntityKind::Episode),
            _ => None,
        }
    }
}

/// A Plex library (e.g. "Movies", "TV Shows").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySection {
    /// Section ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Section type.
    pub kind: SectionKind,
}

/// A declared root path of a library section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location ID.
    pub id: i64,
    /// Owning section ID.
    pub section_id: i64,
    /// Root path as recorded by the server.
    pub root_path: String,
    /// Whether the server considers the location available.
    pub available: bool,
}

impl Location {
    /// Convenience constructor for a location with only a root path.
    pub fn new(id: i64, root_path: impl Into<String>) -> Self {
        Self {
            id,
            section_id: 0,
            root_path: root_path.into(),
            available: true,
        }
    }
}

/// Caller-chosen output directory for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOverride {
    /// The location whose files are redirected.
    pub location: Location,
    /// Output directory for files under that location.
    pub output_dir: String,
}

/// A movie, show, season or episode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    /// Metadata item ID.
    pub id: i64,
    /// Entity type.
    pub kind: EntityKind,
    /// Parent item ID (episode -> season -> show).
    pub parent_id: Option<i64>,
    /// Display title.
    pub title: String,
    /// Sort title.
    pub title_sort: String,
    /// Release year.
    pub year: Option<i32>,
    /// Season or episode number.
    pub index: Option<i32>,
}

impl MetadataItem {
    /// Create an item with only the fields the formatter cares about.
    pub fn new(id: i64, kind: EntityKind, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            kind,
            parent_id: None,
            title_sort: title.clone(),
            title,
            year: None,
            index: None,
        }
    }

    /// Set the release year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the ordinal index.
    pub fn with_index(mut self, index: i32) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the parent ID.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// A physical file belonging to a movie or episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Media part ID.
    pub id: i64,
    /// Full file path as recorded by the server.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
}

impl MediaFile {
    pub fn new(id: i64, path: impl Into<String>, size: u64) -> Self {
        Self {
            id,
            path: path.into(),
            size,
        }
    }
}

/// A movie with its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub metadata: MetadataItem,
    pub files: Vec<MediaFile>,
}

/// A show with its seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowInfo {
    pub metadata: MetadataItem,
    pub seasons: Vec<SeasonInfo>,
}

impl ShowInfo {
    /// Total number of episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }

    /// Iterate every file of every episode, in catalog order.
    pub fn files(&self) -> impl Iterator<Item = &MediaFile> {
        self.seasons
            .iter()
            .flat_map(|s| s.episodes.iter())
            .flat_map(|e| e.files.iter())
    }
}

/// A season with its episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub metadata: MetadataItem,
    pub episodes: Vec<EpisodeInfo>,
}

/// An episode with its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub metadata: MetadataItem,
    pub files: Vec<MediaFile>,
}

/// Everything the planner needs for one library section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryContent {
    pub section: LibrarySection,
    pub locations: Vec<Location>,
    pub movies: Vec<MovieInfo>,
    pub shows: Vec<ShowInfo>,
}

impl LibraryContent {
    /// Create empty content for a section.
    pub fn empty(section: LibrarySection) -> Self {
        Self {
            section,
            locations: Vec::new(),
            movies: Vec::new(),
            shows: Vec::new(),
        }
    }
}
