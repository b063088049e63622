//! Filename sanitizer.
//!
//! Makes display strings safe as a single path component on the most
//! restrictive supported filesystem (Windows/NTFS).

use regex::Regex;
use std::sync::LazyLock;

/// Characters illegal in Windows filenames and what they become.
///
/// No replacement contains a key, so application order never matters.
const REPLACEMENTS: &[(char, &str)] = &[
    (':', " -"),
    ('/', "-"),
    ('\\', "-"),
    ('*', ""),
    ('?', ""),
    ('"', "'"),
    ('<', ""),
    ('>', ""),
    ('|', "-"),
];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Sanitize a string for use as a file or directory name.
///
/// Does not substitute a fallback for input that sanitizes to nothing
/// (e.g. `"?"` or `"..."`); callers supply their own fallback title.
pub fn sanitize_filename(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for c in name.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => result.push_str(to),
            None if c.is_control() => {}
            None => result.push(c),
        }
    }

    let collapsed = WHITESPACE_RUN.replace_all(&result, " ");

    // Windows rejects names ending in a space or period.
    collapsed
        .trim_start_matches(' ')
        .trim_end_matches([' ', '.'])
        .to_string()
}
