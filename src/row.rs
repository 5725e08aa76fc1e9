// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Table row value type and the cell-level text transformations.
//!
//! A [`Row`] is an immutable five-field value: once created through
//! [`Row::new`] or [`Row::normalized`] no field contains a pipe character or
//! a newline, so rendering a row can never corrupt table structure. URL
//! extraction from a link cell lives here as well because merge
//! deduplication depends on the extraction being identical for stored and
//! freshly rendered cells.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder description written when a repository declares none.
pub const NO_DESCRIPTION: &str = "暂无简介";

/// Marker appended to truncated descriptions.
const ELLIPSIS: &str = "...";

static LINK_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((https?://[^)]+)\)").expect("valid link URL pattern"));

/// One record of the persisted markdown table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Category label assigned by the classifier.
    pub category:    String,
    /// Owner display text, optionally suffixed with a location.
    pub developer:   String,
    /// Project name.
    pub project:     String,
    /// Markdown link cell, `[name](url)`.
    pub link:        String,
    /// Sanitized, possibly truncated description.
    pub description: String
}

impl Row {
    /// Builds a row, sanitizing every cell.
    pub fn new<C, D, P, L, S>(category: C, developer: D, project: P, link: L, description: S) -> Self
    where
        C: AsRef<str>,
        D: AsRef<str>,
        P: AsRef<str>,
        L: AsRef<str>,
        S: AsRef<str>
    {
        Self {
            category:    sanitize_cell(category.as_ref()),
            developer:   sanitize_cell(developer.as_ref()),
            project:     sanitize_cell(project.as_ref()),
            link:        sanitize_cell(link.as_ref()),
            description: sanitize_cell(description.as_ref())
        }
    }

    /// Re-sanitizes every cell and re-truncates the description.
    ///
    /// Applied to every merged row regardless of origin so rows parsed from
    /// a hand-edited table obey the same invariants as freshly built ones.
    pub fn normalized(&self, max_description_length: usize) -> Self {
        Self::new(
            &self.category,
            &self.developer,
            &self.project,
            &self.link,
            truncate_text(&self.description, max_description_length)
        )
    }

    /// Builds a row from parsed cells; cells beyond the fifth are ignored.
    ///
    /// Returns `None` when fewer than five cells are supplied, which lets
    /// the table parser drop malformed lines silently.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() < 5 {
            return None;
        }
        Some(Self::new(
            &cells[0], &cells[1], &cells[2], &cells[3], &cells[4]
        ))
    }

    /// Renders the row in its markdown table form.
    pub fn render(&self) -> String {
        format!(
            "| {} | {} | {} | {} | {} |",
            self.category, self.developer, self.project, self.link, self.description
        )
    }

    /// Returns the URL carried by the link cell, when one can be extracted.
    pub fn url(&self) -> Option<String> {
        extract_url(&self.link)
    }
}

/// Strips characters that would break the pipe-delimited table format.
///
/// Pipes become the full-width `／` substitute, newlines become spaces, and
/// outer whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use indie_radar::sanitize_cell;
///
/// assert_eq!(sanitize_cell("a|b\nc"), "a／b c");
/// ```
pub fn sanitize_cell(text: &str) -> String {
    text.replace('|', "／").replace('\n', " ").trim().to_owned()
}

/// Truncates text to at most `max_len` characters, appending `...`.
///
/// A `max_len` of zero disables truncation. Counting is character-wise, not
/// byte-wise; descriptions are frequently CJK and byte slicing would split
/// code points. The kept prefix is at most `max_len - 3` characters with
/// trailing whitespace trimmed before the ellipsis marker is appended.
///
/// # Examples
///
/// ```
/// use indie_radar::truncate_text;
///
/// assert_eq!(truncate_text("hello world", 8), "hello...");
/// assert_eq!(truncate_text("short", 0), "short");
/// ```
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if max_len == 0 || text.chars().count() <= max_len {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    let mut truncated = kept.trim_end().to_owned();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Extracts the URL from a rendered link cell.
///
/// The first parenthesized `(http…)` group wins; a cell that is itself a
/// bare URL is returned whole; anything else yields `None`. The fallback
/// order is load-bearing for merge deduplication and must stay consistent
/// between stored and freshly rendered cells.
///
/// # Examples
///
/// ```
/// use indie_radar::extract_url;
///
/// assert_eq!(
///     extract_url("[demo](https://example.com/demo)").as_deref(),
///     Some("https://example.com/demo")
/// );
/// assert_eq!(
///     extract_url("https://example.com").as_deref(),
///     Some("https://example.com")
/// );
/// assert!(extract_url("plain text").is_none());
/// ```
pub fn extract_url(cell: &str) -> Option<String> {
    if let Some(captures) = LINK_URL.captures(cell) {
        return captures.get(1).map(|group| group.as_str().to_owned());
    }
    if cell.starts_with("http://") || cell.starts_with("https://") {
        return Some(cell.to_owned());
    }
    None
}
