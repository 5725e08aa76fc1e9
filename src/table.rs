// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Marker-delimited table parsing, merging and README splicing.
//!
//! The persisted table lives between two literal HTML comment markers inside
//! a larger README. Merging reconciles freshly ranked rows against whatever
//! the document already holds: existing rows keep their spot on URL
//! conflicts, new rows are prepended, every row is re-normalized, and the
//! combined table is bounded by `max_total`. The README is read once and
//! written once; a document without a valid marker block fails before any
//! modification is persisted.

use std::{collections::HashSet, fs, path::Path};

use tracing::{debug, info};

use crate::{
    error::{Error, io_error},
    filter::is_excluded_text,
    row::Row
};

/// Start marker of the auto-generated table block.
pub const AUTO_START: &str = "<!-- AUTO-GENERATED START -->";
/// End marker of the auto-generated table block.
pub const AUTO_END: &str = "<!-- AUTO-GENERATED END -->";

/// Fixed table header row.
pub const TABLE_HEADER: &str = "| 类别 | 开发者 | 项目名称 | 链接 | 简介 |";
/// Divider line separating the header from data rows.
pub const TABLE_DIVIDER: &str = "|---|---|---|---|---|";

/// Sizing and pruning options applied during a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Upper bound on total rows after the merge, `0` meaning unbounded.
    pub max_total:              usize,
    /// Description length bound re-applied to every merged row.
    pub max_description_length: usize,
    /// Keywords used when pruning existing rows.
    pub exclude_keywords:       Vec<String>,
    /// Whether existing rows matching the keywords are dropped.
    pub prune_existing:         bool
}

/// Parses table data rows out of a marker block.
///
/// Only lines that begin with a pipe, are not the divider and not the header
/// and carry at least five cells are kept; anything else is dropped
/// silently. Hand-edited tables therefore degrade gracefully instead of
/// failing a run.
pub fn parse_rows(block: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    for line in block.lines() {
        let line = line.trim();
        if !line.starts_with('|') || line.starts_with("|---") {
            continue;
        }
        let cells: Vec<String> = line
            .trim_matches('|')
            .split('|')
            .map(|cell| cell.trim().to_owned())
            .collect();
        if cells.len() >= 2 && cells[0] == "类别" && cells[1] == "开发者" {
            continue;
        }
        if let Some(row) = Row::from_cells(&cells) {
            rows.push(row);
        }
    }
    rows
}

/// Renders rows into the table's markdown text form.
pub fn render_table(rows: &[Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(TABLE_HEADER.to_owned());
    lines.push(TABLE_DIVIDER.to_owned());
    for row in rows {
        lines.push(row.render());
    }
    lines.join("\n")
}

/// Merges new rows into the document's auto-generated table block.
///
/// Steps, in order: parse existing rows from the block; when
/// `prune_existing` is set and keywords are configured, drop existing rows
/// whose project name or description matches a keyword; collect the URL
/// identity set of the surviving existing rows; drop new rows whose URL is
/// already present (existing rows win on conflict, and a URL repeated among
/// the new rows keeps only its first carrier); prepend the surviving
/// new rows to the existing ones; re-normalize every row; truncate to
/// `max_total` when nonzero; splice the rendered table back between the
/// markers.
///
/// Returns the updated document and the number of new rows that survived
/// deduplication. The count intentionally ignores any rows later evicted by
/// the `max_total` bound.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the document lacks either marker or
/// the end marker precedes the start marker. Nothing is modified in that
/// case.
///
/// # Examples
///
/// ```
/// use indie_radar::{MergeOptions, Row, merge_document};
///
/// let document = "intro\n<!-- AUTO-GENERATED START -->\n<!-- AUTO-GENERATED END -->\n";
/// let row = Row::new("工具", "octocat", "demo", "[demo](https://x.com/demo)", "desc");
/// let (updated, added) =
///     merge_document(document, &[row], &MergeOptions::default())?;
/// assert_eq!(added, 1);
/// assert!(updated.contains("[demo](https://x.com/demo)"));
/// # Ok::<(), indie_radar::Error>(())
/// ```
pub fn merge_document(
    document: &str,
    new_rows: &[Row],
    options: &MergeOptions
) -> Result<(String, usize), Error> {
    let start = document.find(AUTO_START);
    let end = document.find(AUTO_END);
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            return Err(Error::validation(
                "README is missing the auto-generated marker block"
            ));
        }
    };

    let block = &document[start + AUTO_START.len()..end];
    let mut existing_rows = parse_rows(block);
    debug!("parsed {} existing rows", existing_rows.len());

    if options.prune_existing && !options.exclude_keywords.is_empty() {
        let before = existing_rows.len();
        existing_rows.retain(|row| {
            !is_excluded_text(
                &format!("{} {}", row.project, row.description),
                &options.exclude_keywords
            )
        });
        if existing_rows.len() < before {
            info!("pruned {} existing rows by keyword", before - existing_rows.len());
        }
    }

    let mut seen_urls: HashSet<String> = existing_rows.iter().filter_map(Row::url).collect();

    let accepted_new: Vec<&Row> = new_rows
        .iter()
        .filter(|row| match row.url() {
            Some(url) => seen_urls.insert(url),
            None => true
        })
        .collect();
    let added = accepted_new.len();

    let mut merged: Vec<Row> = accepted_new
        .into_iter()
        .cloned()
        .chain(existing_rows)
        .map(|row| row.normalized(options.max_description_length))
        .collect();

    if options.max_total > 0 && merged.len() > options.max_total {
        merged.truncate(options.max_total);
    }

    let table_text = render_table(&merged);
    let mut updated = String::with_capacity(document.len() + table_text.len());
    updated.push_str(&document[..start]);
    updated.push_str(AUTO_START);
    updated.push('\n');
    updated.push_str(&table_text);
    updated.push('\n');
    updated.push_str(AUTO_END);
    updated.push_str(&document[end + AUTO_END.len()..]);

    Ok((updated, added))
}

/// Merges new rows into the README on disk.
///
/// The file is read once before the merge and written once after it, and
/// only when the content actually changed, so a failed merge can never leave
/// a partially updated document behind.
///
/// # Errors
///
/// Returns [`Error::Io`] on read or write failures and propagates
/// [`Error::Validation`] from [`merge_document`].
pub fn update_readme(
    readme_path: &Path,
    new_rows: &[Row],
    options: &MergeOptions
) -> Result<usize, Error> {
    info!("reading README from {}", readme_path.display());
    let content =
        fs::read_to_string(readme_path).map_err(|source| io_error(readme_path, source))?;

    let (updated, added) = merge_document(&content, new_rows, options)?;

    if updated != content {
        info!("writing updated README to {}", readme_path.display());
        fs::write(readme_path, updated).map_err(|source| io_error(readme_path, source))?;
    } else {
        info!("README already up to date");
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempfile::tempdir;

    use super::{
        AUTO_END, AUTO_START, MergeOptions, merge_document, parse_rows, render_table,
        update_readme
    };
    use crate::row::Row;

    fn document_with(rows: &str) -> String {
        format!("# 项目清单\n\n{AUTO_START}\n{rows}\n{AUTO_END}\n\nfooter\n")
    }

    fn row(project: &str, url: &str) -> Row {
        Row::new(
            "工具",
            "octocat",
            project,
            format!("[{project}]({url})"),
            format!("{project} description")
        )
    }

    #[test]
    fn parse_rows_skips_header_divider_and_malformed_lines() {
        let block = "\
| 类别 | 开发者 | 项目名称 | 链接 | 简介 |
|---|---|---|---|---|
| 工具 | dev | proj | [proj](https://x.com/proj) | desc |
| too | few | cells |
not a table line
| 工具 | dev | other | https://x.com/other | desc |";
        let rows = parse_rows(block);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project, "proj");
        assert_eq!(rows[1].link, "https://x.com/other");
    }

    #[test]
    fn render_table_emits_header_and_divider_first() {
        let text = render_table(&[row("demo", "https://x.com/demo")]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "| 类别 | 开发者 | 项目名称 | 链接 | 简介 |");
        assert_eq!(lines[1], "|---|---|---|---|---|");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn merge_rejects_document_without_markers() {
        let error = merge_document("no markers here", &[], &MergeOptions::default())
            .expect_err("expected marker validation failure");
        assert!(error.to_string().contains("marker"));
    }

    #[test]
    fn merge_rejects_reversed_markers() {
        let document = format!("{AUTO_END}\n{AUTO_START}\n");
        let error = merge_document(&document, &[], &MergeOptions::default())
            .expect_err("expected marker validation failure");
        assert!(error.to_string().contains("marker"));
    }

    #[test]
    fn merge_with_no_new_rows_is_idempotent() {
        let table = render_table(&[row("demo", "https://x.com/demo")]);
        let document = document_with(&table);
        let (updated, added) =
            merge_document(&document, &[], &MergeOptions::default()).expect("merge failed");
        assert_eq!(added, 0);
        assert_eq!(updated, document);

        let (again, _) =
            merge_document(&updated, &[], &MergeOptions::default()).expect("merge failed");
        assert_eq!(again, updated);
    }

    #[test]
    fn merge_deduplicates_by_extracted_url() {
        let table = render_table(&[row("foo", "https://x.com/a/foo")]);
        let document = document_with(&table);

        let duplicate = row("foo-renamed", "https://x.com/a/foo");
        let (updated, added) =
            merge_document(&document, &[duplicate], &MergeOptions::default())
                .expect("merge failed");
        assert_eq!(added, 0);
        // Existing row wins on conflict; the incoming name never appears.
        assert!(!updated.contains("foo-renamed"));
    }

    #[test]
    fn duplicate_urls_among_new_rows_collapse_to_the_first() {
        let document = document_with(&render_table(&[]));
        let new_rows = vec![
            row("first-carrier", "https://x.com/a/shared"),
            row("second-carrier", "https://x.com/a/shared"),
        ];

        let (updated, added) =
            merge_document(&document, &new_rows, &MergeOptions::default()).expect("merge failed");
        assert_eq!(added, 1);
        assert!(updated.contains("first-carrier"));
        assert!(!updated.contains("second-carrier"));
    }

    #[test]
    fn merging_twice_equals_merging_once() {
        let document = document_with(&render_table(&[]));
        let new_rows = vec![row("one", "https://x.com/a/one"), row("two", "https://x.com/a/two")];

        let (once, first_added) =
            merge_document(&document, &new_rows, &MergeOptions::default()).expect("merge failed");
        assert_eq!(first_added, 2);

        let (twice, second_added) =
            merge_document(&once, &new_rows, &MergeOptions::default()).expect("merge failed");
        assert_eq!(second_added, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn new_rows_are_prepended_before_existing_ones() {
        let table = render_table(&[row("old", "https://x.com/a/old")]);
        let document = document_with(&table);

        let (updated, _) =
            merge_document(&document, &[row("new", "https://x.com/a/new")], &MergeOptions::default())
                .expect("merge failed");
        let new_position = updated.find("x.com/a/new").expect("new row missing");
        let old_position = updated.find("x.com/a/old").expect("old row missing");
        assert!(new_position < old_position);
    }

    #[test]
    fn prune_existing_drops_rows_matching_keywords() {
        let table = render_table(&[
            row("awesome-list", "https://x.com/a/list"),
            row("real-tool", "https://x.com/a/tool"),
        ]);
        let document = document_with(&table);

        let options = MergeOptions {
            prune_existing: true,
            exclude_keywords: vec!["awesome".to_owned()],
            ..MergeOptions::default()
        };
        let (updated, added) = merge_document(&document, &[], &options).expect("merge failed");
        assert_eq!(added, 0);
        assert!(!updated.contains("awesome-list"));
        assert!(updated.contains("real-tool"));
    }

    #[test]
    fn pruned_urls_can_be_reintroduced_by_new_rows() {
        let table = render_table(&[row("awesome-old", "https://x.com/a/shared")]);
        let document = document_with(&table);

        let options = MergeOptions {
            prune_existing: true,
            exclude_keywords: vec!["awesome".to_owned()],
            ..MergeOptions::default()
        };
        let (updated, added) =
            merge_document(&document, &[row("fresh", "https://x.com/a/shared")], &options)
                .expect("merge failed");
        assert_eq!(added, 1);
        assert!(updated.contains("fresh"));
        assert!(!updated.contains("awesome-old"));
    }

    #[test]
    fn merged_rows_are_renormalized() {
        // A hand-edited overlong description is re-truncated on merge.
        let document = document_with(
            "| 工具 | dev | proj | [proj](https://x.com/proj) | hello world out there |"
        );
        let options = MergeOptions {
            max_description_length: 8,
            ..MergeOptions::default()
        };
        let (updated, _) = merge_document(&document, &[], &options).expect("merge failed");
        assert!(updated.contains("| hello... |"));
    }

    #[test]
    fn end_to_end_dedup_prepend_and_truncate() {
        let table = render_table(&[row("foo", "https://x.com/a/foo")]);
        let document = document_with(&table);

        let new_rows = vec![
            row("foo", "https://x.com/a/foo"),
            row("bar", "https://x.com/a/bar"),
        ];
        let options = MergeOptions {
            max_total: 1,
            ..MergeOptions::default()
        };
        let (updated, added) =
            merge_document(&document, &new_rows, &options).expect("merge failed");

        assert_eq!(added, 1);
        assert!(updated.contains("x.com/a/bar"));
        assert!(!updated.contains("x.com/a/foo"));
        let data_rows = parse_rows(&updated);
        assert_eq!(data_rows.len(), 1);
        assert_eq!(data_rows[0].project, "bar");
    }

    #[test]
    fn update_readme_writes_merged_content() {
        let temp = tempdir().expect("failed to create tempdir");
        let readme_path = temp.path().join("README.md");
        std::fs::write(&readme_path, document_with(&render_table(&[])))
            .expect("failed to write README");

        let added = update_readme(
            &readme_path,
            &[row("demo", "https://x.com/a/demo")],
            &MergeOptions::default()
        )
        .expect("update failed");

        assert_eq!(added, 1);
        let updated = std::fs::read_to_string(&readme_path).expect("failed to read README");
        assert!(updated.contains("x.com/a/demo"));
        assert!(updated.contains("footer"));
    }

    #[test]
    fn update_readme_leaves_file_untouched_on_marker_failure() {
        let temp = tempdir().expect("failed to create tempdir");
        let readme_path = temp.path().join("README.md");
        std::fs::write(&readme_path, "no markers at all").expect("failed to write README");

        let error = update_readme(
            &readme_path,
            &[row("demo", "https://x.com/a/demo")],
            &MergeOptions::default()
        )
        .expect_err("expected marker failure");
        assert!(error.to_string().contains("marker"));

        let content = std::fs::read_to_string(&readme_path).expect("failed to read README");
        assert_eq!(content, "no markers at all");
    }

    proptest! {
        #[test]
        fn merged_table_never_exceeds_max_total(
            existing_count in 0usize..20,
            new_count in 0usize..20,
            max_total in 1usize..10
        ) {
            let existing: Vec<Row> = (0..existing_count)
                .map(|i| row(&format!("old{i}"), &format!("https://x.com/old/{i}")))
                .collect();
            let new_rows: Vec<Row> = (0..new_count)
                .map(|i| row(&format!("new{i}"), &format!("https://x.com/new/{i}")))
                .collect();
            let document = document_with(&render_table(&existing));
            let options = MergeOptions {
                max_total,
                ..MergeOptions::default()
            };

            let (updated, _) = merge_document(&document, &new_rows, &options)
                .expect("merge failed");
            prop_assert!(parse_rows(&updated).len() <= max_total);
        }

        #[test]
        fn merged_urls_are_unique(
            overlap in 0usize..5,
            fresh in 0usize..5
        ) {
            let existing: Vec<Row> = (0..5)
                .map(|i| row(&format!("old{i}"), &format!("https://x.com/r/{i}")))
                .collect();
            // New rows reuse the first `overlap` URLs and add `fresh` new ones.
            let mut new_rows: Vec<Row> = (0..overlap)
                .map(|i| row(&format!("dup{i}"), &format!("https://x.com/r/{i}")))
                .collect();
            new_rows.extend(
                (0..fresh).map(|i| row(&format!("new{i}"), &format!("https://x.com/n/{i}")))
            );
            let document = document_with(&render_table(&existing));

            let (updated, added) = merge_document(&document, &new_rows, &MergeOptions::default())
                .expect("merge failed");
            prop_assert_eq!(added, fresh);

            let urls: Vec<String> = parse_rows(&updated)
                .iter()
                .filter_map(Row::url)
                .collect();
            let mut deduped = urls.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(urls.len(), deduped.len());
        }
    }
}
