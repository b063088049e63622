//! Property tests for the name and path helpers.
//!
//! Tests cover:
//! - Sanitizer output rules and idempotence
//! - Template substitution of a single placeholder
//! - Path remapping no-op cases

use plex_renamer::generators::filename::NameFormatter;
use plex_renamer::generators::sanitize::sanitize_filename;
use plex_renamer::models::catalog::{EntityKind, MetadataItem};
use plex_renamer::utils::path::remap;
use proptest::prelude::*;

const ILLEGAL: &[char] = &[':', '/', '\\', '*', '?', '"', '<', '>', '|'];

proptest! {
    #[test]
    fn sanitized_names_are_legal(name in any::<String>()) {
        let out = sanitize_filename(&name);
        prop_assert!(!out.contains(ILLEGAL), "illegal char in {:?}", out);
        prop_assert!(!out.chars().any(char::is_control));
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
        prop_assert!(!out.ends_with('.'));
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn sanitize_is_idempotent(name in any::<String>()) {
        let once = sanitize_filename(&name);
        prop_assert_eq!(sanitize_filename(&once), once);
    }

    #[test]
    fn sanitize_keeps_visible_text(name in "[A-Za-z0-9]{1,12}( [A-Za-z0-9]{1,12}){0,3}") {
        prop_assert_eq!(sanitize_filename(&name), name);
    }

    #[test]
    fn single_placeholder_is_substituted_once(
        title in "[A-Za-z0-9][A-Za-z0-9 :?]{0,20}",
        prefix in "[a-z_]{0,5}",
        suffix in "[a-z_]{0,5}",
    ) {
        let formatter = NameFormatter::new("", &format!("{}{{title}}{}", prefix, suffix));
        let movie = MetadataItem::new(1, EntityKind::Movie, title.clone());
        let out = formatter.format_movie(&movie, ".mkv");

        let value = sanitize_filename(&title);
        prop_assert_eq!(&out, &format!("{}{}{}", prefix, value, suffix));
        prop_assert!(!out.contains("{title}"), "unsubstituted placeholder in {:?}", out);
    }

    #[test]
    fn remap_with_empty_prefix_is_noop(path in any::<String>(), other in any::<String>()) {
        prop_assert_eq!(remap(&path, "", &other), path.clone());
        prop_assert_eq!(remap(&path, &other, ""), path);
    }

    #[test]
    fn remap_without_matching_prefix_is_noop(
        path in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        from in "/[A-Z]{1,8}",
        to in "/[a-z]{1,8}",
    ) {
        // Lowercase paths never start with an uppercase prefix, with either separator.
        prop_assert_eq!(remap(&path, &from, &to), path.clone());
        let windows_from = from.replace('/', "\\");
        prop_assert_eq!(remap(&path, &windows_from, &to), path);
    }
}
