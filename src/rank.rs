// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Candidate ordering and truncation.
//!
//! Ranking is a stable descending sort over a configurable key, so
//! candidates with identical keys keep the relative order the search and
//! filter stages produced.

use chrono::{DateTime, Utc};

use crate::row::Row;

/// A row paired with the metadata needed to rank it.
///
/// Candidates only exist between normalization and truncation; the final
/// selection discards the metadata and keeps the rows.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Fully normalized table row.
    pub row:          Row,
    /// Whether the record declared any homepage, scheme or not.
    pub has_homepage: bool,
    /// Stargazer count at fetch time.
    pub stars:        u32,
    /// Timestamp of the most recent push.
    pub pushed_at:    DateTime<Utc>
}

impl Candidate {
    fn key(&self, prefer_homepage: bool) -> (bool, u32, DateTime<Utc>) {
        if prefer_homepage {
            (self.has_homepage, self.stars, self.pushed_at)
        } else {
            // Sorting keys compare the homepage flag first; pinning it makes
            // star count the effective primary key.
            (true, self.stars, self.pushed_at)
        }
    }
}

/// Orders candidates by the configured preference and keeps the best.
///
/// With `prefer_homepage` set the primary key is the homepage flag, then
/// star count, then push recency; otherwise star count leads. All keys sort
/// descending. The result is truncated to the first `max_new` rows; the
/// configuration loader guarantees `max_new >= 1`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use indie_radar::{Candidate, Row, rank};
///
/// let popular = Candidate {
///     row:          Row::new("c", "a", "p1", "https://a.example", "d"),
///     has_homepage: false,
///     stars:        100,
///     pushed_at:    Utc::now()
/// };
/// let with_homepage = Candidate {
///     row:          Row::new("c", "b", "p2", "https://b.example", "d"),
///     has_homepage: true,
///     stars:        50,
///     pushed_at:    Utc::now()
/// };
///
/// let rows = rank(vec![popular, with_homepage], true, 10);
/// assert_eq!(rows[0].project, "p2");
/// ```
pub fn rank(mut candidates: Vec<Candidate>, prefer_homepage: bool, max_new: usize) -> Vec<Row> {
    candidates.sort_by(|a, b| b.key(prefer_homepage).cmp(&a.key(prefer_homepage)));
    candidates.truncate(max_new);
    candidates.into_iter().map(|candidate| candidate.row).collect()
}
