// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conversion of filtered records into sanitized table rows.
//!
//! The owner-location lookup is external to the core; it is modeled as a
//! [`LocationSource`] injected by the caller and wrapped in a
//! [`LocationCache`] so each distinct login is resolved at most once per
//! run, no matter how many of that owner's repositories survive filtering.

use std::collections::HashMap;

use crate::{
    config::UpdaterConfig,
    record::RepositoryRecord,
    row::{NO_DESCRIPTION, Row, truncate_text}
};

/// Resolver for an owner's profile location.
///
/// Implemented for any `FnMut(&str) -> Option<String>` so tests can inject
/// counting fakes and production code can close over a prefetched directory.
pub trait LocationSource {
    /// Fetches the location for a login, `None` when unknown.
    fn fetch(&mut self, login: &str) -> Option<String>;
}

impl<F> LocationSource for F
where
    F: FnMut(&str) -> Option<String>
{
    fn fetch(&mut self, login: &str) -> Option<String> {
        self(login)
    }
}

/// Memoizes a [`LocationSource`] by login for the duration of one run.
#[derive(Debug)]
pub struct LocationCache<S> {
    source:  S,
    entries: HashMap<String, Option<String>>
}

impl<S: LocationSource> LocationCache<S> {
    /// Wraps a source with an empty per-run cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: HashMap::new()
        }
    }

    /// Resolves a login, consulting the source only on the first call.
    ///
    /// Blank results are cached as absent so a repeatedly empty profile does
    /// not trigger repeat lookups either.
    pub fn lookup(&mut self, login: &str) -> Option<String> {
        if let Some(cached) = self.entries.get(login) {
            return cached.clone();
        }
        let resolved = self
            .source
            .fetch(login)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self.entries.insert(login.to_owned(), resolved.clone());
        resolved
    }
}

/// Builds the sanitized five-field row for a record.
///
/// The developer cell is the owner login, suffixed with `(location)` when
/// `include_owner_location` is enabled and the lookup yields a non-empty
/// value. The link cell points at the homepage when it carries an HTTP(S)
/// scheme and at the canonical repository URL otherwise. A missing
/// description becomes the fixed placeholder; either way the description is
/// truncated to the configured maximum before sanitization.
pub fn normalize_record<S: LocationSource>(
    record: &RepositoryRecord,
    category: &str,
    config: &UpdaterConfig,
    locations: &mut LocationCache<S>
) -> Row {
    let login = record.owner.login.trim();
    let developer = if config.github.include_owner_location && !login.is_empty() {
        match locations.lookup(login) {
            Some(location) => format!("{login}({location})"),
            None => login.to_owned()
        }
    } else {
        login.to_owned()
    };

    let project_name = if record.name.is_empty() {
        login.to_owned()
    } else {
        record.name.clone()
    };

    let homepage = record.homepage_trimmed().unwrap_or_default();
    let project_url = if homepage.starts_with("http://") || homepage.starts_with("https://") {
        homepage
    } else {
        record.html_url.as_str()
    };

    let description = record.description.as_deref().unwrap_or(NO_DESCRIPTION);
    let description = truncate_text(description, config.github.max_description_length);

    Row::new(
        category,
        &developer,
        &project_name,
        &format!("[{project_name}]({project_url})"),
        &description
    )
}
