// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Retry wrapper with exponential backoff for GitHub API calls.
///
/// Search and profile requests are the only fallible network operations in
/// a run; both are retried here so transient failures do not abort an
/// otherwise healthy update.
use std::time::Duration;

use masterror::AppError;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts including the first (default: 3).
    pub max_attempts:     u32,
    /// Initial delay between attempts in milliseconds (default: 1000).
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each failure (default: 2.0).
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts:     3,
            initial_delay_ms: 1000,
            backoff_factor:   2.0
        }
    }
}

/// Executes an async operation, retrying with exponential backoff.
///
/// # Arguments
///
/// * `config` - Retry configuration (max attempts, delays)
/// * `operation_name` - Name of the operation for logging
/// * `f` - Async function to retry
///
/// # Errors
///
/// Returns the last error encountered once all attempts are exhausted.
///
/// # Example
///
/// ```no_run
/// use indie_radar::retry::{RetryConfig, retry_with_backoff};
/// use masterror::AppError;
///
/// # async fn example() -> Result<(), AppError> {
/// let config = RetryConfig::default();
/// let page = retry_with_backoff(&config, "search page", || async {
///     Ok::<_, AppError>(1u32)
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut f: F
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>
{
    let mut attempt = 1;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= config.max_attempts {
                    warn!(
                        "{} failed after {} attempts: {}",
                        operation_name, config.max_attempts, error
                    );
                    return Err(error);
                }

                warn!(
                    "{} failed on attempt {}/{}: {}. Retrying in {}ms...",
                    operation_name, attempt, config.max_attempts, error, delay_ms
                );

                sleep(Duration::from_millis(delay_ms)).await;
                delay_ms = (delay_ms as f64 * config.backoff_factor) as u64;
                attempt += 1;
            }
        }
    }
}
