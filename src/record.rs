// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Raw repository records as returned by the search collaborator.
//!
//! Field names mirror the GitHub REST representation so records can be
//! deserialized straight from API payloads. The core treats records as
//! immutable input; every downstream stage borrows them read-only.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Account that owns a repository.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RecordOwner {
    /// Login name of the owning account.
    #[serde(default)]
    pub login: String,

    /// Account type reported by the API, `"User"` or `"Organization"`.
    #[serde(default, rename = "type")]
    pub kind: String
}

/// A single repository as fetched from the search API.
///
/// Optional fields default so partially populated payloads deserialize
/// without errors; the filter stage decides what incomplete records mean.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RepositoryRecord {
    /// Opaque unique identifier used for cross-query deduplication.
    pub id: u64,

    /// Repository name without the owner prefix.
    #[serde(default)]
    pub name: String,

    /// Free-form description, absent for many repositories.
    #[serde(default)]
    pub description: Option<String>,

    /// Owning account.
    #[serde(default)]
    pub owner: RecordOwner,

    /// Topic labels attached to the repository.
    #[serde(default)]
    pub topics: Vec<String>,

    /// Stargazer count at fetch time.
    #[serde(default)]
    pub stargazers_count: u32,

    /// Timestamp of the most recent push, if any.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,

    /// Homepage URL declared by the maintainer; frequently blank or a bare
    /// domain rather than a full URL.
    #[serde(default)]
    pub homepage: Option<String>,

    /// Canonical repository URL.
    #[serde(default)]
    pub html_url: String,

    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,

    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,

    /// Whether the repository is disabled.
    #[serde(default)]
    pub disabled: bool
}

impl RepositoryRecord {
    /// Returns the trimmed homepage when one is declared.
    pub fn homepage_trimmed(&self) -> Option<&str> {
        self.homepage
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::RepositoryRecord;

    #[test]
    fn deserializes_from_github_payload_shape() {
        let json = r#"{
            "id": 42,
            "name": "side-project",
            "description": "A weekend build",
            "owner": {"login": "octocat", "type": "User"},
            "topics": ["indie", "rust"],
            "stargazers_count": 120,
            "pushed_at": "2025-06-01T12:00:00Z",
            "homepage": "https://side.example.com",
            "html_url": "https://github.com/octocat/side-project",
            "fork": false,
            "archived": false,
            "disabled": false
        }"#;

        let record: RepositoryRecord =
            serde_json::from_str(json).expect("expected record to deserialize");
        assert_eq!(record.id, 42);
        assert_eq!(record.owner.login, "octocat");
        assert_eq!(record.owner.kind, "User");
        assert_eq!(record.topics, ["indie", "rust"]);
        assert!(record.pushed_at.is_some());
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": 7, "name": "bare"}"#;
        let record: RepositoryRecord =
            serde_json::from_str(json).expect("expected record to deserialize");
        assert!(record.description.is_none());
        assert!(record.pushed_at.is_none());
        assert_eq!(record.stargazers_count, 0);
        assert!(!record.fork);
    }

    #[test]
    fn homepage_trimmed_filters_blank_values() {
        let mut record = RepositoryRecord {
            homepage: Some("   ".to_owned()),
            ..RepositoryRecord::default()
        };
        assert!(record.homepage_trimmed().is_none());

        record.homepage = Some("  https://example.com  ".to_owned());
        assert_eq!(record.homepage_trimmed(), Some("https://example.com"));
    }
}
