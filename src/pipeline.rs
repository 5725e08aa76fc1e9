// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Composition of the core stages: filter, classify, normalize, rank.
//!
//! Everything here is synchronous and pure apart from the injected location
//! source; fetching records and resolving profile locations happen in the
//! collaborator modules before this pipeline runs.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    classify::classify,
    config::UpdaterConfig,
    filter::keep,
    normalize::{LocationCache, LocationSource, normalize_record},
    rank::{Candidate, rank},
    record::RepositoryRecord,
    row::Row
};

/// Turns fetched records into the ranked rows of one run.
///
/// Records are filtered against `config` with `now` as the recency
/// reference, classified, normalized into rows (resolving owner locations
/// through the memoized `locations` cache when enabled), ranked by the
/// configured preference and truncated to `max_new_per_run`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use indie_radar::{LocationCache, RepositoryRecord, UpdaterConfig, build_rows};
///
/// let config = UpdaterConfig::default();
/// let mut locations = LocationCache::new(|_: &str| None);
/// let rows = build_rows(&[], &config, &mut locations, Utc::now());
/// assert!(rows.is_empty());
/// ```
pub fn build_rows<S: LocationSource>(
    records: &[RepositoryRecord],
    config: &UpdaterConfig,
    locations: &mut LocationCache<S>,
    now: DateTime<Utc>
) -> Vec<Row> {
    let mut candidates = Vec::new();

    for record in records {
        if !keep(record, config, now) {
            continue;
        }
        let category = classify(record, &config.categories, &config.category_default);
        let row = normalize_record(record, &category, config, locations);
        // keep() already rejected records without a push timestamp.
        let Some(pushed_at) = record.pushed_at else {
            continue;
        };
        candidates.push(Candidate {
            row,
            has_homepage: record.homepage_trimmed().is_some(),
            stars: record.stargazers_count,
            pushed_at
        });
    }

    debug!("{} of {} records survived filtering", candidates.len(), records.len());
    rank(
        candidates,
        config.filters.prefer_homepage,
        config.github.max_new_per_run
    )
}

/// Collects the distinct owner logins of records that pass the filter.
///
/// Used to prefetch profile locations before the pipeline runs, so the
/// per-owner lookup happens exactly once per login regardless of repository
/// count.
pub fn surviving_logins(
    records: &[RepositoryRecord],
    config: &UpdaterConfig,
    now: DateTime<Utc>
) -> Vec<String> {
    let mut logins: Vec<String> = Vec::new();
    for record in records {
        if !keep(record, config, now) {
            continue;
        }
        let login = record.owner.login.trim();
        if !login.is_empty() && !logins.iter().any(|existing| existing == login) {
            logins.push(login.to_owned());
        }
    }
    logins
}
