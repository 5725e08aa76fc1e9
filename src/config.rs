//! Configuration document types describing search, filter and table limits.
//!
//! The types in this module mirror the structure of the configuration files
//! consumed by the updater CLI. Documents may be written in JSON or YAML; the
//! loader attempts JSON first and falls back to YAML so hand-maintained
//! configs can use either syntax. Defaults are intentionally permissive and
//! invariants that downstream stages rely on are checked by
//! [`UpdaterConfig::validate`].

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{Error, io_error};

/// Root configuration document consumed by one updater run.
///
/// # Examples
///
/// ```
/// use indie_radar::UpdaterConfig;
///
/// let yaml = r#"
/// github:
///   min_stars: 20
/// queries:
///   - q: "topic:indie-hacker stars:>10"
/// "#;
/// let config: UpdaterConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert_eq!(config.github.min_stars, 20);
/// assert_eq!(config.queries.len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
    /// GitHub search and table sizing parameters.
    #[serde(default)]
    pub github: GithubConfig,

    /// Search queries executed against the repository search API.
    #[serde(default)]
    pub queries: Vec<SearchQuery>,

    /// Exclusion and preference predicates applied to fetched records.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Category assigned when no rule matches.
    #[serde(default = "default_category")]
    pub category_default: String,

    /// Ordered classification rules; the first matching rule wins, so the
    /// configured order is significant and preserved as-is.
    #[serde(default)]
    pub categories: Vec<CategoryRule>
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            github:           GithubConfig::default(),
            queries:          Vec::new(),
            filters:          FilterConfig::default(),
            category_default: default_category(),
            categories:       Vec::new()
        }
    }
}

/// Search pagination, thresholds and table sizing parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API. Informational; the client talks to
    /// the default host unless overridden at build time.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Results requested per search page, capped by the API at 100.
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Maximum number of pages fetched per query.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between search pages to stay clear of secondary rate limits.
    #[serde(default)]
    pub sleep_seconds: f64,

    /// Minimum star count a repository must have to be considered.
    #[serde(default)]
    pub min_stars: u32,

    /// Recency window; repositories without a push inside it are dropped.
    #[serde(default = "default_pushed_within_days")]
    pub pushed_within_days: i64,

    /// Suffix the developer cell with the owner's profile location.
    #[serde(default)]
    pub include_owner_location: bool,

    /// Maximum description length in characters, `0` meaning unlimited.
    #[serde(default)]
    pub max_description_length: usize,

    /// Upper bound on rows added by a single run.
    #[serde(default = "default_max_new_per_run")]
    pub max_new_per_run: usize,

    /// Upper bound on total table rows, `0` meaning unbounded.
    #[serde(default)]
    pub max_total: usize
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base:               default_api_base(),
            per_page:               default_per_page(),
            max_pages:              default_max_pages(),
            sleep_seconds:          0.0,
            min_stars:              0,
            pushed_within_days:     default_pushed_within_days(),
            include_owner_location: false,
            max_description_length: 0,
            max_new_per_run:        default_max_new_per_run(),
            max_total:              0
        }
    }
}

/// A single repository search query with its sort preferences.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Raw search expression passed to the repository search endpoint.
    pub q: String,

    /// Sort field, defaulting to star count.
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Sort direction, defaulting to descending.
    #[serde(default = "default_order")]
    pub order: String
}

/// Exclusion and preference predicates applied to fetched records.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FilterConfig {
    /// Case-insensitive substrings that disqualify a record when present in
    /// its name or description.
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Topics that disqualify a record, compared case-insensitively.
    #[serde(default)]
    pub exclude_topics: Vec<String>,

    /// Rank records with a homepage ahead of more popular ones without.
    #[serde(default)]
    pub prefer_homepage: bool,

    /// Drop records that do not declare a homepage at all.
    #[serde(default)]
    pub require_homepage: bool,

    /// Retroactively remove already-persisted rows matching the exclusion
    /// keywords during a merge.
    #[serde(default)]
    pub prune_existing: bool
}

/// Named classification rule holding its keyword set.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    /// Category label written into the table.
    pub name: String,

    /// Keywords matched as case-insensitive substrings of the record's
    /// name, description and topics.
    #[serde(default)]
    pub keywords: Vec<String>
}

fn default_api_base() -> String {
    "https://api.github.com".to_owned()
}

fn default_per_page() -> u8 {
    100
}

fn default_max_pages() -> u32 {
    1
}

fn default_pushed_within_days() -> i64 {
    365
}

fn default_max_new_per_run() -> usize {
    50
}

fn default_sort() -> String {
    "stars".to_owned()
}

fn default_order() -> String {
    "desc".to_owned()
}

fn default_category() -> String {
    "其他工具".to_owned()
}

impl UpdaterConfig {
    /// Checks invariants that later pipeline stages rely on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the query list is empty, when
    /// `per_page` or `max_new_per_run` is zero, or when the recency window
    /// is not positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.queries.is_empty() {
            return Err(Error::validation("at least one search query is required"));
        }
        if self.github.per_page == 0 {
            return Err(Error::validation("github.per_page must be at least 1"));
        }
        if self.github.max_new_per_run == 0 {
            return Err(Error::validation(
                "github.max_new_per_run must be at least 1"
            ));
        }
        if self.github.pushed_within_days <= 0 {
            return Err(Error::validation(
                "github.pushed_within_days must be positive"
            ));
        }
        Ok(())
    }
}

/// Loads and validates an updater configuration document.
///
/// JSON is attempted first; on failure the raw text is re-parsed as YAML.
/// The YAML error is the one reported because YAML is the documented primary
/// syntax.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] when
/// neither syntax matches, and [`Error::Validation`] when invariants fail.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use indie_radar::load_config;
///
/// # fn main() -> Result<(), indie_radar::Error> {
/// let config = load_config(Path::new("radar.yaml"))?;
/// println!("{} queries", config.queries.len());
/// # Ok(())
/// # }
/// ```
pub fn load_config(path: &Path) -> Result<UpdaterConfig, Error> {
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let config = parse_config(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Parses a configuration document from a string, accepting JSON or YAML.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text is valid in neither syntax.
pub fn parse_config(raw: &str) -> Result<UpdaterConfig, Error> {
    if let Ok(config) = serde_json::from_str::<UpdaterConfig>(raw) {
        return Ok(config);
    }
    let config = serde_yaml::from_str::<UpdaterConfig>(raw)?;
    Ok(config)
}
