//! Path string helpers.
//!
//! Catalog paths are strings authored on the media server's machine, so they
//! may use either separator regardless of the platform running this tool.

use crate::models::plan::PathMapping;
use crate::Result;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Convert every backslash to a forward slash.
pub fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert forward slashes to the platform separator.
pub fn from_slash(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }
}

/// Replace the `from` prefix of `path` with `to`.
///
/// Returns `path` unchanged when either prefix is empty or when the
/// slash-normalized path does not start with the slash-normalized `from`.
/// Comparison is case-sensitive.
pub fn remap(path: &str, from: &str, to: &str) -> String {
    if from.is_empty() || to.is_empty() {
        return path.to_string();
    }

    let normalized_path = to_slash(path);
    let normalized_from = to_slash(from);

    match normalized_path.strip_prefix(&normalized_from) {
        Some(rest) => from_slash(&format!("{}{}", to, rest)),
        None => path.to_string(),
    }
}

/// Apply an optional mapping rule.
pub fn apply_mapping(path: &str, mapping: Option<&PathMapping>) -> String {
    match mapping {
        Some(m) => remap(path, &m.from, &m.to),
        None => path.to_string(),
    }
}

/// Extension of the last path component, including the dot.
///
/// Empty when the file name has no dot.
pub fn extension(path: &str) -> &str {
    let name_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let name = &path[name_start..];
    match name.rfind('.') {
        Some(dot) => &name[dot..],
        None => "",
    }
}

/// Join a formatted relative name onto `base`, one component at a time.
///
/// Either separator splits components. Empty, `.`, `..`, root and drive
/// prefix components are dropped, so the result always stays under `base`.
pub fn join_under(base: &Path, relative: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for part in relative.split(['/', '\\']) {
        let mut components = Path::new(part).components();
        if let (Some(Component::Normal(name)), None) = (components.next(), components.next()) {
            joined.push(name);
        }
    }
    joined
}

/// Parse a `FROM:TO` mapping.
///
/// A colon directly after a leading drive letter (`F:`) belongs to the path,
/// so `F:\Media:H:\Media` splits into `F:\Media` and `H:\Media`.
pub fn parse_path_mapping(spec: &str) -> Result<PathMapping> {
    let bytes = spec.as_bytes();
    let split = spec.char_indices().find(|&(i, c)| {
        if c != ':' {
            return false;
        }
        // Drive colon of the first half.
        if i == 1 && bytes[0].is_ascii_alphabetic() {
            return false;
        }
        true
    });

    let (from, to) = match split {
        Some((i, _)) => (&spec[..i], &spec[i + 1..]),
        None => return Err(crate::Error::InvalidPathMapping(spec.to_string())),
    };

    if from.is_empty() || to.is_empty() {
        return Err(crate::Error::InvalidPathMapping(spec.to_string()));
    }

    Ok(PathMapping {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_prefix() {
        let mapped = remap("/data/media/Movies/Heat.mkv", "/data/media", "/mnt/nas");
        assert_eq!(mapped, from_slash("/mnt/nas/Movies/Heat.mkv"));
    }

    #[test]
    fn test_remap_windows_source() {
        let mapped = remap("F:\\Media\\Show\\ep.mkv", "F:\\Media", "/mnt/media");
        assert_eq!(mapped, from_slash("/mnt/media/Show/ep.mkv"));
    }

    #[test]
    fn test_remap_empty_prefix_is_noop() {
        assert_eq!(remap("C:\\x\\y", "", "/z"), "C:\\x\\y");
        assert_eq!(remap("/x/y", "/x", ""), "/x/y");
    }

    #[test]
    fn test_remap_is_case_sensitive() {
        assert_eq!(remap("/Data/x.mkv", "/data", "/mnt"), "/Data/x.mkv");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("/src/Show A/ep1.mkv"), ".mkv");
        assert_eq!(extension("C:\\dir.v2\\file"), "");
        assert_eq!(extension("/a/archive.tar.gz"), ".gz");
        assert_eq!(extension("/a/noext"), "");
    }

    #[test]
    fn test_join_under_stays_under_base() {
        let base = Path::new("/out");
        assert_eq!(
            join_under(base, "Show/Season 1/S01E01.mkv"),
            PathBuf::from("/out/Show/Season 1/S01E01.mkv")
        );
        assert_eq!(
            join_under(base, "/Season 1/S01E01.mkv"),
            PathBuf::from("/out/Season 1/S01E01.mkv")
        );
        assert_eq!(
            join_under(base, "..\\../x//./y.mkv"),
            PathBuf::from("/out/x/y.mkv")
        );
        assert_eq!(join_under(base, ""), PathBuf::from("/out"));
    }

    #[test]
    fn test_parse_path_mapping() {
        let m = parse_path_mapping("/data:/mnt/data").unwrap();
        assert_eq!((m.from.as_str(), m.to.as_str()), ("/data", "/mnt/data"));

        let m = parse_path_mapping("F:\\Media:H:\\Media").unwrap();
        assert_eq!((m.from.as_str(), m.to.as_str()), ("F:\\Media", "H:\\Media"));

        let m = parse_path_mapping("/srv/media:Z:\\media").unwrap();
        assert_eq!((m.from.as_str(), m.to.as_str()), ("/srv/media", "Z:\\media"));
    }

    #[test]
    fn test_parse_path_mapping_rejects_malformed() {
        assert!(parse_path_mapping("nocolon").is_err());
        assert!(parse_path_mapping(":/x").is_err());
        assert!(parse_path_mapping("/x:").is_err());
        assert!(parse_path_mapping("C:").is_err());
    }
}
