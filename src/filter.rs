// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Record admission predicates.
//!
//! Every predicate is pure; the caller supplies the reference instant so
//! recency checks stay deterministic under test.

use chrono::{DateTime, Duration, Utc};

use crate::{config::UpdaterConfig, record::RepositoryRecord};

/// Decides whether a fetched record survives into classification.
///
/// A record is rejected when any of the following holds: it is a fork,
/// archived or disabled; its owner is not an individual user account; its
/// name or description contains an excluded keyword; one of its topics is
/// excluded; its star count is below the configured minimum; it has never
/// been pushed, or not within the recency window ending at `now`; a
/// homepage is required but absent.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use indie_radar::{RepositoryRecord, UpdaterConfig, keep};
///
/// let config = UpdaterConfig::default();
/// let record = RepositoryRecord {
///     owner: indie_radar::RecordOwner {
///         login: "octocat".to_owned(),
///         kind:  "User".to_owned()
///     },
///     pushed_at: Some(Utc::now()),
///     ..RepositoryRecord::default()
/// };
/// assert!(keep(&record, &config, Utc::now()));
/// ```
pub fn keep(record: &RepositoryRecord, config: &UpdaterConfig, now: DateTime<Utc>) -> bool {
    if record.fork || record.archived || record.disabled {
        return false;
    }
    if record.owner.kind != "User" {
        return false;
    }
    if is_excluded_text(
        &format!(
            "{} {}",
            record.name,
            record.description.as_deref().unwrap_or_default()
        ),
        &config.filters.exclude_keywords
    ) {
        return false;
    }
    if has_excluded_topic(&record.topics, &config.filters.exclude_topics) {
        return false;
    }
    if record.stargazers_count < config.github.min_stars {
        return false;
    }
    let cutoff = now - Duration::days(config.github.pushed_within_days);
    match record.pushed_at {
        Some(pushed_at) if pushed_at >= cutoff => {}
        _ => return false
    }
    if config.filters.require_homepage && record.homepage_trimmed().is_none() {
        return false;
    }
    true
}

/// Case-insensitive substring match against the exclusion keyword list.
pub fn is_excluded_text(text: &str, exclude_keywords: &[String]) -> bool {
    let text_lower = text.to_lowercase();
    exclude_keywords
        .iter()
        .any(|keyword| text_lower.contains(&keyword.to_lowercase()))
}

fn has_excluded_topic(topics: &[String], exclude_topics: &[String]) -> bool {
    if exclude_topics.is_empty() {
        return false;
    }
    let excluded: Vec<String> = exclude_topics
        .iter()
        .map(|topic| topic.to_lowercase())
        .collect();
    topics
        .iter()
        .any(|topic| excluded.contains(&topic.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{is_excluded_text, keep};
    use crate::{
        config::UpdaterConfig,
        record::{RecordOwner, RepositoryRecord}
    };

    fn user_record() -> RepositoryRecord {
        RepositoryRecord {
            name: "side-project".to_owned(),
            owner: RecordOwner {
                login: "octocat".to_owned(),
                kind:  "User".to_owned()
            },
            stargazers_count: 50,
            pushed_at: Some(Utc::now() - Duration::days(10)),
            html_url: "https://github.com/octocat/side-project".to_owned(),
            ..RepositoryRecord::default()
        }
    }

    #[test]
    fn keeps_active_user_repository() {
        assert!(keep(&user_record(), &UpdaterConfig::default(), Utc::now()));
    }

    #[test]
    fn rejects_forks_archived_and_disabled() {
        let config = UpdaterConfig::default();
        let now = Utc::now();

        let mut record = user_record();
        record.fork = true;
        assert!(!keep(&record, &config, now));

        let mut record = user_record();
        record.archived = true;
        assert!(!keep(&record, &config, now));

        let mut record = user_record();
        record.disabled = true;
        assert!(!keep(&record, &config, now));
    }

    #[test]
    fn rejects_organization_owner() {
        let mut record = user_record();
        record.owner.kind = "Organization".to_owned();
        assert!(!keep(&record, &UpdaterConfig::default(), Utc::now()));
    }

    #[test]
    fn rejects_excluded_keyword_in_description() {
        let mut config = UpdaterConfig::default();
        config.filters.exclude_keywords = vec!["Awesome".to_owned()];
        let mut record = user_record();
        record.description = Some("an awesome list of links".to_owned());
        assert!(!keep(&record, &config, Utc::now()));
    }

    #[test]
    fn rejects_excluded_topic_case_insensitively() {
        let mut config = UpdaterConfig::default();
        config.filters.exclude_topics = vec!["Awesome-List".to_owned()];
        let mut record = user_record();
        record.topics = vec!["awesome-list".to_owned()];
        assert!(!keep(&record, &config, Utc::now()));
    }

    #[test]
    fn rejects_below_star_threshold() {
        let mut config = UpdaterConfig::default();
        config.github.min_stars = 100;
        assert!(!keep(&user_record(), &config, Utc::now()));
    }

    #[test]
    fn rejects_missing_or_stale_push_timestamp() {
        let config = UpdaterConfig::default();
        let now = Utc::now();

        let mut record = user_record();
        record.pushed_at = None;
        assert!(!keep(&record, &config, now));

        let mut record = user_record();
        record.pushed_at = Some(now - Duration::days(400));
        assert!(!keep(&record, &config, now));
    }

    #[test]
    fn require_homepage_rejects_blank_homepage() {
        let mut config = UpdaterConfig::default();
        config.filters.require_homepage = true;

        let mut record = user_record();
        record.homepage = Some("  ".to_owned());
        assert!(!keep(&record, &config, Utc::now()));

        record.homepage = Some("https://side.example.com".to_owned());
        assert!(keep(&record, &config, Utc::now()));
    }

    #[test]
    fn excluded_text_matches_substrings_case_insensitively() {
        let keywords = vec!["Template".to_owned()];
        assert!(is_excluded_text("a project template repo", &keywords));
        assert!(!is_excluded_text("a project starter repo", &keywords));
    }
}
