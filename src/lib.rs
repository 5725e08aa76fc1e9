//! Discovers indie open-source repositories and maintains a curated markdown
//! table embedded in a README document.
//!
//! The library separates a pure core from thin collaborators. The core
//! filters, classifies, normalizes and ranks fetched repository records and
//! merges the result into the persisted table without duplicating entries;
//! it performs no I/O beyond an injected owner-location lookup. The
//! collaborators cover GitHub search, profile lookups and token resolution.
//! All public APIs are documented with invariants, error semantics, and
//! minimal examples to facilitate integration in automation tooling.

mod classify;
mod config;
mod discover;
mod error;
mod filter;
mod normalize;
mod pipeline;
mod rank;
mod record;
pub mod retry;
mod row;
mod table;
mod token;

pub use classify::classify;
pub use config::{
    CategoryRule, FilterConfig, GithubConfig, SearchQuery, UpdaterConfig, load_config, parse_config,
};
pub use discover::{build_client, fetch_owner_locations, search_repositories};
pub use error::{Error, io_error};
pub use filter::keep;
pub use normalize::{LocationCache, LocationSource, normalize_record};
pub use pipeline::{build_rows, surviving_logins};
pub use rank::{Candidate, rank};
pub use record::{RecordOwner, RepositoryRecord};
pub use row::{NO_DESCRIPTION, Row, extract_url, sanitize_cell, truncate_text};
pub use table::{
    AUTO_END, AUTO_START, MergeOptions, TABLE_DIVIDER, TABLE_HEADER, merge_document, parse_rows,
    render_table, update_readme,
};
pub use token::resolve_token;
