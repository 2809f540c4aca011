//! Recommendation parser: best-effort extraction of structured cards from
//! the model's free-text reply.
//!
//! Expected entry shape, one per recommendation:
//!
//! ```text
//! <digits>. <title> (<format>, <genre>, <year>): <description>
//! ```
//!
//! `year` is four digits or `N/A`. A description starts at the first
//! non-whitespace character after the colon and runs until the next line
//! that starts a numbered entry, or the end of input, and may span lines.
//! When the description is empty the following numbered line is absorbed
//! into it rather than producing an empty card.
//! Text that does not match is skipped; no match at all yields an empty list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ENTRY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\s*([^(]+)\(([^,]+),\s*([^,]+),\s*(\d{4}|N/A)\):")
        .expect("entry header pattern is valid")
});

static NEXT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\d+\.").expect("next entry pattern is valid"));

pub const BOOK_ICON: &str = "📚";
pub const MOVIE_ICON: &str = "🎬";
pub const FALLBACK_ICON: &str = "✨";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    /// "Book" or "Movie" when the model follows the template.
    pub format: String,
    pub genre: String,
    /// Four digits or "N/A".
    pub year: String,
    pub description: String,
    pub icon: String,
}

/// Exact, case-sensitive lookup.
pub fn icon_for_format(format: &str) -> &'static str {
    match format {
        "Book" => BOOK_ICON,
        "Movie" => MOVIE_ICON,
        _ => FALLBACK_ICON,
    }
}

/// Parses every template-matching entry in `raw`, in order of appearance.
/// The leading number of each entry is ignored.
pub fn parse_recommendations(raw: &str) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = ENTRY_HEADER.captures_at(raw, cursor) {
        let (Some(whole), Some(title), Some(format), Some(genre), Some(year)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            break;
        };

        // Whitespace after the colon is skipped, then the description needs
        // at least one character. If only whitespace is left, its last
        // character stands in as an (empty once trimmed) description.
        let rest = &raw[whole.end()..];
        let body = rest.trim_start();
        let desc_start = if body.is_empty() {
            match rest.char_indices().last() {
                Some((offset, _)) => whole.end() + offset,
                None => break,
            }
        } else {
            raw.len() - body.len()
        };
        let Some(first) = raw[desc_start..].chars().next() else {
            break;
        };
        let min_end = desc_start + first.len_utf8();
        let desc_end = NEXT_ENTRY
            .find_at(raw, min_end)
            .map(|m| m.start())
            .unwrap_or(raw.len());

        let format = format.as_str().trim();
        recommendations.push(Recommendation {
            title: title.as_str().trim().to_string(),
            format: format.to_string(),
            genre: genre.as_str().trim().to_string(),
            year: year.as_str().trim().to_string(),
            description: raw[desc_start..desc_end].trim().to_string(),
            icon: icon_for_format(format).to_string(),
        });

        cursor = desc_end;
    }

    recommendations
}
