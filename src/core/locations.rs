//! Location matching and output directory resolution.
//!
//! All matching uses the same rule: both sides are slash-normalized,
//! lowercased and stripped of Windows long-path prefixes, and a root only
//! matches on a component boundary (`/a/b` covers `/a/b/x` but not `/a/bc`).

use crate::models::catalog::{Location, LocationOverride, MediaFile, ShowInfo};
use crate::models::plan::PathMapping;
use crate::utils::path::{apply_mapping, to_slash};
use std::path::{Path, PathBuf};

/// Normalize a path for prefix comparison only.
pub fn normalize_for_match(path: &str) -> String {
    let slashed = to_slash(path);
    let stripped = match slashed
        .strip_prefix("//?/")
        .or_else(|| slashed.strip_prefix("//./"))
    {
        // \\?\UNC\server\share is the long form of \\server\share
        Some(rest) => match rest.get(..4) {
            Some(unc) if unc.eq_ignore_ascii_case("unc/") => format!("//{}", &rest[4..]),
            _ => rest.to_string(),
        },
        None => slashed.clone(),
    };
    stripped.to_lowercase()
}

/// Whether `path` lies under `root`.
pub fn path_under(path: &str, root: &str) -> bool {
    let root = normalize_for_match(root);
    if root.is_empty() {
        return false;
    }
    let root = root.trim_end_matches('/');
    let path = normalize_for_match(path);

    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Whether `path` lies under any of `locations`.
pub fn path_in_locations(path: &str, locations: &[Location]) -> bool {
    locations.iter().any(|loc| path_under(path, &loc.root_path))
}

/// Whether any of `files` lies under any of `locations`.
pub fn files_in_locations(files: &[MediaFile], locations: &[Location]) -> bool {
    files.iter().any(|f| path_in_locations(&f.path, locations))
}

/// Whether any episode file of `show` lies under any of `locations`.
pub fn show_in_locations(show: &ShowInfo, locations: &[Location]) -> bool {
    show.files().any(|f| path_in_locations(&f.path, locations))
}

/// Which rule produced an output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    LocationOverride,
    GlobalOutput,
    LibraryRoot,
    WorkingDirectory,
}

/// Picks the output directory for a source file.
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    overrides: &'a [LocationOverride],
    output_dir: Option<&'a Path>,
    locations: &'a [Location],
    mapping: Option<&'a PathMapping>,
}

impl<'a> LocationResolver<'a> {
    pub fn new(
        overrides: &'a [LocationOverride],
        output_dir: Option<&'a Path>,
        locations: &'a [Location],
    ) -> Self {
        Self {
            overrides,
            output_dir,
            locations,
            mapping: None,
        }
    }

    /// Library roots are server paths; map them like source paths when they
    /// are used as the output directory.
    pub fn with_mapping(mut self, mapping: Option<&'a PathMapping>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Resolve the output directory for `file_path` (an unmapped catalog path).
    ///
    /// Priority: per-location override, global output directory, the single
    /// library location containing the file, the current directory.
    pub fn resolve(&self, file_path: &str) -> (PathBuf, ResolvedBy) {
        if let Some(ov) = self
            .overrides
            .iter()
            .find(|ov| path_under(file_path, &ov.location.root_path))
        {
            return (PathBuf::from(&ov.output_dir), ResolvedBy::LocationOverride);
        }

        if let Some(dir) = self.output_dir {
            return (dir.to_path_buf(), ResolvedBy::GlobalOutput);
        }

        let mut owners = self
            .locations
            .iter()
            .filter(|loc| path_under(file_path, &loc.root_path));
        match (owners.next(), owners.next()) {
            (Some(loc), None) => {
                let root = apply_mapping(&loc.root_path, self.mapping);
                return (PathBuf::from(root), ResolvedBy::LibraryRoot);
            }
            (Some(_), Some(_)) => {
                tracing::debug!("{} is under several library roots", file_path);
            }
            _ => {}
        }

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        (cwd, ResolvedBy::WorkingDirectory)
    }
}

/// Resolve the output directory for `file_path` (convenience function).
pub fn resolve_output_dir(
    file_path: &str,
    overrides: &[LocationOverride],
    output_dir: Option<&Path>,
    locations: &[Location],
) -> PathBuf {
    LocationResolver::new(overrides, output_dir, locations)
        .resolve(file_path)
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: i64, root: &str) -> Location {
        Location::new(id, root)
    }

    fn over(root: &str, output: &str) -> LocationOverride {
        LocationOverride {
            location: loc(99, root),
            output_dir: output.to_string(),
        }
    }

    #[test]
    fn test_path_under_requires_component_boundary() {
        assert!(path_under("/a/b/file.mkv", "/a/b"));
        assert!(path_under("/a/b/file.mkv", "/a/b/"));
        assert!(path_under("/a/b", "/a/b"));
        assert!(!path_under("/a/bc/file.mkv", "/a/b"));
        assert!(!path_under("/a/file.mkv", "/a/b"));
    }

    #[test]
    fn test_path_under_ignores_case_and_separators() {
        assert!(path_under("D:\\Media\\TV\\show.mkv", "d:/media/tv"));
        assert!(path_under("d:/media/tv/show.mkv", "D:\\MEDIA\\TV\\"));
    }

    #[test]
    fn test_long_path_prefixes_stripped() {
        assert!(path_under("\\\\?\\D:\\Media\\x.mkv", "D:\\Media"));
        assert!(path_under("\\\\.\\D:\\Media\\x.mkv", "D:\\Media"));
        assert!(path_under("\\\\?\\UNC\\nas\\share\\x.mkv", "\\\\nas\\share"));
        assert!(path_under("D:\\Media\\x.mkv", "\\\\?\\D:\\Media"));
    }

    #[test]
    fn test_root_path_matches_everything_absolute() {
        assert!(path_under("/anything/here", "/"));
        assert!(!path_under("/anything", ""));
    }

    #[test]
    fn test_override_wins() {
        let overrides = vec![over("/src/a", "/out/a")];
        let locations = vec![loc(1, "/src/a")];
        let resolver = LocationResolver::new(&overrides, Some(Path::new("/out")), &locations);
        assert_eq!(
            resolver.resolve("/src/a/x.mkv"),
            (PathBuf::from("/out/a"), ResolvedBy::LocationOverride)
        );
    }

    #[test]
    fn test_global_output_when_no_override_matches() {
        let overrides = vec![over("/src/a", "/out/a")];
        let locations = vec![loc(1, "/src/a"), loc(2, "/src/b")];
        let resolver = LocationResolver::new(&overrides, Some(Path::new("/out")), &locations);
        assert_eq!(
            resolver.resolve("/src/b/x.mkv"),
            (PathBuf::from("/out"), ResolvedBy::GlobalOutput)
        );
    }

    #[test]
    fn test_library_root_without_output() {
        let locations = vec![loc(1, "/src/a"), loc(2, "/src/b")];
        let resolver = LocationResolver::new(&[], None, &locations);
        assert_eq!(
            resolver.resolve("/src/b/x.mkv"),
            (PathBuf::from("/src/b"), ResolvedBy::LibraryRoot)
        );
    }

    #[test]
    fn test_library_root_is_mapped() {
        let locations = vec![loc(1, "/data/tv")];
        let mapping = PathMapping {
            from: "/data".to_string(),
            to: "/mnt/nas".to_string(),
        };
        let resolver = LocationResolver::new(&[], None, &locations).with_mapping(Some(&mapping));
        let (dir, by) = resolver.resolve("/data/tv/x.mkv");
        assert_eq!(by, ResolvedBy::LibraryRoot);
        assert_eq!(dir, PathBuf::from(crate::utils::path::from_slash("/mnt/nas/tv")));
    }

    #[test]
    fn test_working_directory_fallback() {
        let locations = vec![loc(1, "/src/a")];
        let (dir, by) = LocationResolver::new(&[], None, &locations).resolve("/elsewhere/x.mkv");
        assert_eq!(by, ResolvedBy::WorkingDirectory);
        assert_eq!(dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn test_ambiguous_library_root_falls_back_to_cwd() {
        let locations = vec![loc(1, "/src"), loc(2, "/src/a")];
        let (_, by) = LocationResolver::new(&[], None, &locations).resolve("/src/a/x.mkv");
        assert_eq!(by, ResolvedBy::WorkingDirectory);
    }

    #[test]
    fn test_membership_predicates() {
        let selected = vec![loc(2, "/src/b")];
        let files = vec![MediaFile::new(1, "/src/a/1.mkv", 1), MediaFile::new(2, "/src/b/2.mkv", 1)];
        assert!(path_in_locations("/src/b/2.mkv", &selected));
        assert!(!path_in_locations("/src/a/1.mkv", &selected));
        assert!(files_in_locations(&files, &selected));
        assert!(!files_in_locations(&files[..1], &selected));
    }

    #[test]
    fn test_convenience_function_matches_resolver() {
        let locations = vec![loc(1, "/src/a")];
        assert_eq!(
            resolve_output_dir("/src/a/x.mkv", &[], Some(Path::new("/out")), &locations),
            PathBuf::from("/out")
        );
    }
}
