//! Plex Media Server metadata store.
//!
//! Reads `com.plexapp.plugins.library.db` strictly read-only. The file is
//! opened as an immutable URI so a running server holding the database (and
//! its WAL) open does not block us.

use crate::models::catalog::{
    EntityKind, EpisodeInfo, LibraryContent, LibrarySection, Location, MediaFile, MetadataItem,
    MovieInfo, SeasonInfo, SectionKind, ShowInfo,
};
use crate::{Error, Result};
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;

/// Source of library sections and catalog trees.
pub trait MetadataProvider {
    /// All library sections, ordered by name.
    fn library_sections(&self) -> Result<Vec<LibrarySection>>;

    /// Root locations of a section, in declaration order.
    fn section_locations(&self, section_id: i64) -> Result<Vec<Location>>;

    /// The full catalog tree of a section with its locations.
    fn library_content(&self, section: &LibrarySection) -> Result<LibraryContent>;
}

const METADATA_COLUMNS: &str = r#"id, metadata_type, parent_id,
    COALESCE(title, ''), COALESCE(title_sort, title, ''), year, "index""#;

/// Read-only handle on a Plex library database.
pub struct PlexDatabase {
    conn: Connection,
}

impl PlexDatabase {
    /// Open the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.display().to_string()));
        }

        let uri = sqlite_uri(&std::path::absolute(path)?);
        tracing::debug!("Opening Plex database: {}", uri);

        let conn = Connection::open_with_flags(
            &uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Fail now rather than on the first query if this is not SQLite.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |r| r.get::<_, i64>(0))?;

        Ok(Self { conn })
    }

    fn parse_metadata_row(row: &Row) -> rusqlite::Result<Option<MetadataItem>> {
        let code: i64 = row.get(1)?;
        let Some(kind) = EntityKind::from_code(code) else {
            return Ok(None);
        };
        Ok(Some(MetadataItem {
            id: row.get(0)?,
            kind,
            parent_id: row.get(2)?,
            title: row.get(3)?,
            title_sort: row.get(4)?,
            year: row.get(5)?,
            index: row.get(6)?,
        }))
    }

    /// Top-level items of `kind` in a section, ordered by sort title.
    fn metadata_items(&self, section_id: i64, kind: EntityKind) -> Result<Vec<MetadataItem>> {
        let sql = format!(
            r#"SELECT {} FROM metadata_items
               WHERE library_section_id = ?1 AND metadata_type = ?2
               ORDER BY title_sort, id"#,
            METADATA_COLUMNS
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let items = stmt
            .query_map(params![section_id, kind.code()], Self::parse_metadata_row)?
            .filter_map(|r| r.transpose())
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Children of `parent_id` of `kind`, ordered by index.
    fn child_items(&self, parent_id: i64, kind: EntityKind) -> Result<Vec<MetadataItem>> {
        let sql = format!(
            r#"SELECT {} FROM metadata_items
               WHERE parent_id = ?1 AND metadata_type = ?2
               ORDER BY "index", id"#,
            METADATA_COLUMNS
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let items = stmt
            .query_map(params![parent_id, kind.code()], Self::parse_metadata_row)?
            .filter_map(|r| r.transpose())
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Files of a movie or episode.
    fn media_files(&self, metadata_id: i64) -> Result<Vec<MediaFile>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT mp.id, COALESCE(mp.file, ''), COALESCE(mp.size, 0)
             FROM media_parts mp
             JOIN media_items mi ON mp.media_item_id = mi.id
             WHERE mi.metadata_item_id = ?1
             ORDER BY mp.id",
        )?;
        let files = stmt
            .query_map(params![metadata_id], |row| {
                let size: i64 = row.get(2)?;
                Ok(MediaFile {
                    id: row.get(0)?,
                    path: row.get(1)?,
                    size: size.max(0) as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files.into_iter().filter(|f| !f.path.is_empty()).collect())
    }

    fn movies(&self, section_id: i64) -> Result<Vec<MovieInfo>> {
        self.metadata_items(section_id, EntityKind::Movie)?
            .into_iter()
            .map(|metadata| {
                let files = self.media_files(metadata.id)?;
                Ok(MovieInfo { metadata, files })
            })
            .collect()
    }

    fn shows(&self, section_id: i64) -> Result<Vec<ShowInfo>> {
        self.metadata_items(section_id, EntityKind::Show)?
            .into_iter()
            .map(|metadata| {
                let seasons = self.seasons(metadata.id)?;
                Ok(ShowInfo { metadata, seasons })
            })
            .collect()
    }

    fn seasons(&self, show_id: i64) -> Result<Vec<SeasonInfo>> {
        self.child_items(show_id, EntityKind::Season)?
            .into_iter()
            .map(|metadata| {
                let episodes = self.episodes(metadata.id)?;
                Ok(SeasonInfo { metadata, episodes })
            })
            .collect()
    }

    fn episodes(&self, season_id: i64) -> Result<Vec<EpisodeInfo>> {
        self.child_items(season_id, EntityKind::Episode)?
            .into_iter()
            .map(|metadata| {
                let files = self.media_files(metadata.id)?;
                Ok(EpisodeInfo { metadata, files })
            })
            .collect()
    }
}

impl MetadataProvider for PlexDatabase {
    fn library_sections(&self) -> Result<Vec<LibrarySection>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, COALESCE(name, ''), section_type FROM library_sections ORDER BY name",
        )?;
        let sections = stmt
            .query_map([], |row| {
                Ok(LibrarySection {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: SectionKind::from_code(row.get(2)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sections)
    }

    fn section_locations(&self, section_id: i64) -> Result<Vec<Location>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, library_section_id, COALESCE(root_path, ''), available
             FROM section_locations
             WHERE library_section_id = ?1
             ORDER BY id",
        )?;
        let locations = stmt
            .query_map(params![section_id], |row| {
                let available: Option<i64> = row.get(3)?;
                Ok(Location {
                    id: row.get(0)?,
                    section_id: row.get(1)?,
                    root_path: row.get(2)?,
                    available: available.unwrap_or(0) != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(locations)
    }

    fn library_content(&self, section: &LibrarySection) -> Result<LibraryContent> {
        let mut content = LibraryContent::empty(section.clone());
        content.locations = self.section_locations(section.id)?;

        match section.kind {
            SectionKind::Movie => content.movies = self.movies(section.id)?,
            SectionKind::Show => content.shows = self.shows(section.id)?,
            SectionKind::Unsupported(code) => {
                tracing::debug!("Section {} has unsupported type {}", section.name, code);
            }
        }

        tracing::debug!(
            "Loaded library {}: {} movies, {} shows",
            section.name,
            content.movies.len(),
            content.shows.len()
        );
        Ok(content)
    }
}

/// Build a read-only, immutable SQLite URI for an absolute path.
fn sqlite_uri(path: &Path) -> String {
    let mut slashed = path.to_string_lossy().replace('\\', "/");
    if !slashed.starts_with('/') {
        // C:/x -> /C:/x
        slashed.insert(0, '/');
    }
    let escaped = slashed
        .replace('%', "%25")
        .replace('?', "%3f")
        .replace('#', "%23");
    format!("file:{}?mode=ro&immutable=1", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_uri() {
        assert_eq!(
            sqlite_uri(Path::new("/var/lib/plex/db.sqlite")),
            "file:/var/lib/plex/db.sqlite?mode=ro&immutable=1"
        );
        assert_eq!(
            sqlite_uri(Path::new("/tmp/a?b#c%d.db")),
            "file:/tmp/a%3fb%23c%25d.db?mode=ro&immutable=1"
        );
    }

    #[test]
    fn test_open_missing_database() {
        let dir = TempDir::new().unwrap();
        let result = PlexDatabase::open(&dir.path().join("missing.db"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_open_rejects_non_sqlite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, b"this is definitely not a sqlite database file").unwrap();
        assert!(PlexDatabase::open(&path).is_err());
    }
}
