// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Discovers repositories through the GitHub repository search API.
///
/// Runs every configured query page by page, deduplicates results across
/// queries by repository id and converts them into the crate's record type.
/// Also prefetches owner profile locations when the developer cell should
/// carry them.
use std::collections::{HashMap, HashSet};

use indicatif::{ProgressBar, ProgressStyle};
use masterror::AppError;
use octocrab::{Octocrab, models::Repository};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::{
    config::UpdaterConfig,
    record::{RecordOwner, RepositoryRecord},
    retry::{RetryConfig, retry_with_backoff}
};

/// Builds an authenticated GitHub client.
///
/// # Errors
///
/// Returns [`AppError`] when the client cannot be constructed.
pub fn build_client(token: &str) -> Result<Octocrab, AppError> {
    Octocrab::builder()
        .personal_token(token)
        .build()
        .map_err(|e| AppError::unauthorized(format!("failed to initialize GitHub client: {e}")))
}

/// Fetches repository records for every configured search query.
///
/// Each query is paginated up to `github.max_pages`; an empty page ends the
/// query early. Records already seen under another query are skipped, so
/// overlapping queries cannot produce duplicate records. Page requests are
/// retried with backoff and optionally paced by `github.sleep_seconds`.
///
/// # Arguments
///
/// * `octocrab` - Authenticated GitHub client
/// * `config` - Updater configuration holding queries and pagination limits
///
/// # Errors
///
/// Returns [`AppError`] when a page request keeps failing after retries.
///
/// # Example
///
/// ```no_run
/// use indie_radar::{build_client, load_config, search_repositories};
///
/// # async fn example() -> Result<(), masterror::AppError> {
/// let config = load_config(std::path::Path::new("radar.yaml")).unwrap();
/// let client = build_client("ghp_token")?;
/// let records = search_repositories(&client, &config).await?;
/// println!("fetched {} records", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn search_repositories(
    octocrab: &Octocrab,
    config: &UpdaterConfig
) -> Result<Vec<RepositoryRecord>, AppError> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}")
            .expect("valid template")
    );

    let retry = RetryConfig::default();
    let mut records = Vec::new();
    let mut seen_ids: HashSet<u64> = HashSet::new();

    for query in &config.queries {
        info!("searching: {}", query.q);
        for page in 1..=config.github.max_pages {
            pb.set_message(format!("query '{}' page {page}...", query.q));
            let result = retry_with_backoff(&retry, "repository search", || async {
                octocrab
                    .search()
                    .repositories(&query.q)
                    .sort(query.sort.as_str())
                    .order(query.order.as_str())
                    .per_page(config.github.per_page)
                    .page(page)
                    .send()
                    .await
                    .map_err(|e| AppError::service(format!("repository search failed: {e}")))
            })
            .await?;

            if result.items.is_empty() {
                debug!("query '{}' exhausted at page {page}", query.q);
                break;
            }

            for repo in result.items {
                let record = to_record(repo);
                if seen_ids.insert(record.id) {
                    records.push(record);
                }
            }
            pb.set_message(format!("{} records so far...", records.len()));

            if config.github.sleep_seconds > 0.0 {
                sleep(Duration::from_secs_f64(config.github.sleep_seconds)).await;
            }
        }
    }

    pb.finish_with_message(format!("fetched {} records", records.len()));
    info!("fetched {} records across {} queries", records.len(), config.queries.len());
    Ok(records)
}

/// Prefetches profile locations for a set of owner logins.
///
/// One profile request per login, retried with backoff. A login whose
/// profile cannot be fetched is reported and simply omitted; location
/// suffixes are decoration, not worth failing a run over.
///
/// # Arguments
///
/// * `octocrab` - Authenticated GitHub client
/// * `logins` - Distinct owner logins to resolve
pub async fn fetch_owner_locations(
    octocrab: &Octocrab,
    logins: &[String]
) -> HashMap<String, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} [{elapsed_precise}] {msg}")
            .expect("valid template")
    );

    let retry = RetryConfig::default();
    let mut locations = HashMap::new();

    for login in logins {
        pb.set_message(format!("profile of {login}..."));
        let profile = retry_with_backoff(&retry, "owner profile", || async {
            octocrab
                .users(login.as_str())
                .profile()
                .await
                .map_err(|e| AppError::service(format!("profile fetch for {login} failed: {e}")))
        })
        .await;

        match profile {
            Ok(profile) => {
                if let Some(location) = profile.location.map(|value| value.trim().to_owned())
                    && !location.is_empty()
                {
                    locations.insert(login.clone(), location);
                }
            }
            Err(error) => {
                warn!("skipping location for {login}: {error}");
            }
        }
    }

    pb.finish_with_message(format!("resolved {} owner locations", locations.len()));
    locations
}

/// Converts a search API repository into the crate's record type.
///
/// Absent optional fields collapse to their defaults; the filter stage is
/// the single place that decides what incomplete records mean.
fn to_record(repo: Repository) -> RepositoryRecord {
    let owner = repo
        .owner
        .map(|author| RecordOwner {
            login: author.login,
            kind:  author.r#type
        })
        .unwrap_or_default();

    RepositoryRecord {
        id: repo.id.0,
        name: repo.name,
        description: repo.description,
        owner,
        topics: repo.topics.unwrap_or_default(),
        stargazers_count: repo.stargazers_count.unwrap_or(0),
        pushed_at: repo.pushed_at,
        homepage: repo.homepage,
        html_url: repo
            .html_url
            .map(|url| url.to_string())
            .unwrap_or_default(),
        fork: repo.fork.unwrap_or(false),
        archived: repo.archived.unwrap_or(false),
        disabled: repo.disabled.unwrap_or(false)
    }
}
