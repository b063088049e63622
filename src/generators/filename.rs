//! Filename generator.
//!
//! Expands user templates such as `{show}/Season {season}/S{snum}E{enum} - {title}{ext}`
//! against catalog metadata. Separators written in the template itself are kept;
//! every title inserted into it goes through [`sanitize_filename`].

use super::sanitize::sanitize_filename;
use crate::models::catalog::MetadataItem;

/// Default template for TV show episodes.
pub const DEFAULT_TV_FORMAT: &str = "{show}/Season {season}/S{snum}E{enum} - {title}{ext}";

/// Default template for movies.
pub const DEFAULT_MOVIE_FORMAT: &str = "{title} ({year}){ext}";

/// Filename formatter holding the episode and movie templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFormatter {
    tv_format: String,
    movie_format: String,
}

impl NameFormatter {
    /// Create a formatter. Empty templates fall back to the defaults.
    pub fn new(tv_format: &str, movie_format: &str) -> Self {
        let pick = |format: &str, default: &str| {
            if format.is_empty() {
                default.to_string()
            } else {
                format.to_string()
            }
        };
        Self {
            tv_format: pick(tv_format, DEFAULT_TV_FORMAT),
            movie_format: pick(movie_format, DEFAULT_MOVIE_FORMAT),
        }
    }

    pub fn tv_format(&self) -> &str {
        &self.tv_format
    }

    pub fn movie_format(&self) -> &str {
        &self.movie_format
    }

    /// Generate the relative destination name of an episode file.
    ///
    /// Tokens: `{show}`, `{season}`, `{snum}`, `{enum}`, `{title}`, `{year}`, `{ext}`.
    pub fn format_episode(
        &self,
        show: &MetadataItem,
        season: &MetadataItem,
        episode: &MetadataItem,
        ext: &str,
    ) -> String {
        let season_num = season.index.unwrap_or(0);
        let episode_num = episode.index.unwrap_or(0);

        expand(&self.tv_format, |token| match token {
            "show" => Some(sanitize_filename(&show.title)),
            "season" => Some(season_num.to_string()),
            "snum" => Some(format!("{:02}", season_num)),
            "enum" => Some(format!("{:02}", episode_num)),
            "title" => Some(sanitize_filename(&episode.title)),
            "year" => Some(show.year.map(|y| y.to_string()).unwrap_or_default()),
            "ext" => Some(ext.to_string()),
            _ => None,
        })
    }

    /// Generate the relative destination name of a movie file.
    ///
    /// Tokens: `{title}`, `{year}` (`Unknown` when absent), `{ext}`.
    pub fn format_movie(&self, movie: &MetadataItem, ext: &str) -> String {
        expand(&self.movie_format, |token| match token {
            "title" => Some(sanitize_filename(&movie.title)),
            "year" => Some(
                movie
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            "ext" => Some(ext.to_string()),
            _ => None,
        })
    }
}

impl Default for NameFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TV_FORMAT, DEFAULT_MOVIE_FORMAT)
    }
}

/// Single left-to-right pass over `template`.
///
/// Recognized `{token}`s are replaced by `lookup`; anything else, including
/// unknown tokens and stray braces, is copied verbatim. Substituted values are
/// never rescanned.
fn expand<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let close = match after.find(['{', '}']) {
            Some(i) if after.as_bytes()[i] == b'}' => i,
            _ => {
                // No token here; keep the brace and continue after it.
                out.push('{');
                rest = after;
                continue;
            }
        };

        let token = &after[..close];
        match lookup(token) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(token);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::EntityKind;

    fn show() -> MetadataItem {
        MetadataItem::new(1, EntityKind::Show, "Show A").with_year(2020)
    }

    fn season(index: Option<i32>) -> MetadataItem {
        let mut s = MetadataItem::new(2, EntityKind::Season, "Season");
        s.index = index;
        s
    }

    fn episode(title: &str, index: Option<i32>) -> MetadataItem {
        let mut e = MetadataItem::new(3, EntityKind::Episode, title);
        e.index = index;
        e
    }

    #[test]
    fn test_default_episode_format() {
        let f = NameFormatter::default();
        let name = f.format_episode(&show(), &season(Some(1)), &episode("Pilot", Some(3)), ".mkv");
        assert_eq!(name, "Show A/Season 1/S01E03 - Pilot.mkv");
    }

    #[test]
    fn test_missing_indexes_default_to_zero() {
        let f = NameFormatter::default();
        let name = f.format_episode(&show(), &season(None), &episode("Special", None), ".mkv");
        assert_eq!(name, "Show A/Season 0/S00E00 - Special.mkv");
    }

    #[test]
    fn test_wide_episode_numbers_overflow_padding() {
        let f = NameFormatter::new("S{snum}E{enum}", "");
        let name = f.format_episode(&show(), &season(Some(2)), &episode("x", Some(104)), "");
        assert_eq!(name, "S02E104");
    }

    #[test]
    fn test_show_year_empty_when_absent() {
        let f = NameFormatter::new("{show} ({year})", "");
        let untitled = MetadataItem::new(1, EntityKind::Show, "Untitled");
        let name = f.format_episode(&untitled, &season(Some(1)), &episode("x", Some(1)), "");
        assert_eq!(name, "Untitled ()");
    }

    #[test]
    fn test_default_movie_format() {
        let f = NameFormatter::default();
        let movie = MetadataItem::new(1, EntityKind::Movie, "Title: Part One");
        assert_eq!(f.format_movie(&movie, ".mkv"), "Title - Part One (Unknown).mkv");

        let dated = MetadataItem::new(2, EntityKind::Movie, "Heat").with_year(1995);
        assert_eq!(f.format_movie(&dated, ".mp4"), "Heat (1995).mp4");
    }

    #[test]
    fn test_titles_cannot_introduce_separators() {
        let f = NameFormatter::default();
        let s = MetadataItem::new(1, EntityKind::Show, "AC/DC: Live");
        let name = f.format_episode(&s, &season(Some(1)), &episode("Back/In/Black", Some(1)), ".mkv");
        assert_eq!(name, "AC-DC - Live/Season 1/S01E01 - Back-In-Black.mkv");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let f = NameFormatter::new("{show} {quality} {}{ext}", "{title} {{year}}{ext}");
        let name = f.format_episode(&show(), &season(Some(1)), &episode("x", Some(1)), ".mkv");
        assert_eq!(name, "Show A {quality} {}.mkv");

        let movie = MetadataItem::new(1, EntityKind::Movie, "Heat").with_year(1995);
        assert_eq!(f.format_movie(&movie, ".mkv"), "Heat {1995}.mkv");
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        let f = NameFormatter::new("", "{title} {year");
        let movie = MetadataItem::new(1, EntityKind::Movie, "Heat").with_year(1995);
        assert_eq!(f.format_movie(&movie, ".mkv"), "Heat {year");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let f = NameFormatter::default();
        let movie = MetadataItem::new(1, EntityKind::Movie, "{year}");
        assert_eq!(f.format_movie(&movie, ".mkv"), "{year} (Unknown).mkv");
    }

    #[test]
    fn test_empty_templates_use_defaults() {
        let f = NameFormatter::new("", "");
        assert_eq!(f.tv_format(), DEFAULT_TV_FORMAT);
        assert_eq!(f.movie_format(), DEFAULT_MOVIE_FORMAT);
    }
}
