// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Keyword-based category assignment.
//!
//! Rules are scanned linearly in their configured order and the first rule
//! with a matching keyword wins. The scan is deliberately not sorted or
//! deduplicated; rule order is part of the configuration contract.

use crate::{config::CategoryRule, record::RepositoryRecord};

/// Assigns a category label to a record.
///
/// The search text is the lowercased concatenation of name, description and
/// topics joined by spaces. Keywords match as substrings. When no rule
/// matches, `default` is returned.
///
/// # Examples
///
/// ```
/// use indie_radar::{CategoryRule, RepositoryRecord, classify};
///
/// let rules = vec![CategoryRule {
///     name:     "开发工具".to_owned(),
///     keywords: vec!["cli".to_owned()]
/// }];
/// let record = RepositoryRecord {
///     name: "rust-cli-helper".to_owned(),
///     ..RepositoryRecord::default()
/// };
/// assert_eq!(classify(&record, &rules, "其他工具"), "开发工具");
/// ```
pub fn classify(record: &RepositoryRecord, categories: &[CategoryRule], default: &str) -> String {
    let haystack = format!(
        "{} {} {}",
        record.name,
        record.description.as_deref().unwrap_or_default(),
        record.topics.join(" ")
    )
    .to_lowercase();

    for category in categories {
        if category
            .keywords
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
        {
            return category.name.clone();
        }
    }
    default.to_owned()
}
