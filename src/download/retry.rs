//! Retry logic with exponential backoff for transient download failures.
//!
//! [`RetryPolicy`] is an explicit object with a visible attempt loop
//! ([`fetch_with_retry`]), so attempt counts and backoff delays are directly
//! testable. Failures classify into [`FailureType`]: anything that reached
//! the network (timeouts, connection errors, HTTP error statuses) is
//! `Transient` and consumes the retry budget; local failures (bad URL, disk
//! errors, corrupt archives) are `Permanent` and surface immediately.
//!
//! Non-success HTTP statuses retry uniformly, 404s included. Spending budget
//! on a permanently missing resource is accepted here in exchange for a
//! predictable attempt count per URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, instrument};

use super::DownloadError;
use super::client::HttpClient;

/// Default maximum attempts, including the initial one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff (1 second).
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default delay cap (32 seconds).
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

/// Default backoff multiplier (doubles each attempt).
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Maximum jitter added to delays (500ms).
const MAX_JITTER: Duration = Duration::from_millis(500);

/// Classification of a download failure for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// The request reached (or tried to reach) the network and may succeed
    /// on a fresh attempt: timeout, connection failure, HTTP error status.
    Transient,

    /// Retrying cannot help: invalid URL, local IO failure, corrupt archive.
    Permanent,
}

/// Decision on whether to retry a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the given delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// The upcoming attempt number (1-indexed).
        attempt: u32,
    },

    /// Give up and surface the error.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Configuration for retry behavior with exponential backoff.
///
/// Defaults: 3 attempts, 1 s base delay doubling per attempt, 32 s cap,
/// up to 500 ms of jitter.
///
/// ```text
/// delay = min(base_delay * multiplier^(attempt - 1), max_delay) + jitter
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Base delay for the first retry.
    base_delay: Duration,

    /// Delay cap.
    max_delay: Duration,

    /// Multiplier applied each attempt.
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom settings.
    ///
    /// `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Creates a policy with a custom base delay, keeping other defaults.
    ///
    /// Tests use millisecond bases so retry loops finish quickly.
    #[must_use]
    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::default()
        }
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether the attempt that just failed should be retried.
    ///
    /// `attempt` is the 1-indexed attempt number that failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.calculate_delay(attempt);

        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    /// Calculates the backoff delay for a retry with jitter.
    ///
    /// Formula: `min(base_delay * multiplier^(attempt - 1), max_delay) + jitter`
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let multiplier = f64::from(self.backoff_multiplier);

        // attempt 1 retries after base * 2^0, attempt 2 after base * 2^1, ...
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * multiplier.powf(exponent);

        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        Duration::from_millis(capped_ms as u64) + self.calculate_jitter()
    }

    /// Generates random jitter between 0 and [`MAX_JITTER`].
    ///
    /// Jitter spreads out retries when many downloads fail simultaneously.
    fn calculate_jitter(&self) -> Duration {
        let mut rng = rand::thread_rng();
        let jitter_ms = rng.gen_range(0..=MAX_JITTER.as_millis() as u64);
        Duration::from_millis(jitter_ms)
    }
}

/// Classifies a download error into a failure type.
///
/// Timeouts, network errors, and every non-success HTTP status are
/// `Transient`. Invalid URLs, IO errors, and archive errors are `Permanent`:
/// a retry re-running the same local operation cannot change the outcome.
#[must_use]
pub fn classify_error(error: &DownloadError) -> FailureType {
    match error {
        DownloadError::Network { .. }
        | DownloadError::Timeout { .. }
        | DownloadError::HttpStatus { .. } => FailureType::Transient,

        DownloadError::Io { .. }
        | DownloadError::InvalidUrl { .. }
        | DownloadError::Archive { .. } => FailureType::Permanent,
    }
}

/// Performs one logical fetch with bounded retry: streams `url` to
/// `{dest_prefix}{extension}` via [`HttpClient::download_to_path`],
/// reissuing the full request on retryable failures.
///
/// Each invocation is independent; there is no partial resume across
/// attempts.
///
/// # Returns
///
/// - `Ok(PathBuf)` - the saved file path on success
/// - `Err((DownloadError, u32))` - final error and total attempt count
#[instrument(skip(client, policy), fields(url = %url, dest = %dest_prefix.display()))]
pub async fn fetch_with_retry(
    client: &HttpClient,
    url: &str,
    dest_prefix: &Path,
    policy: &RetryPolicy,
) -> Result<PathBuf, (DownloadError, u32)> {
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        debug!(attempt, "attempting download");

        match client.download_to_path(url, dest_prefix).await {
            Ok(path) => return Ok(path),
            Err(e) => match policy.should_retry(classify_error(&e), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    info!(
                        attempt = next_attempt,
                        max_attempts = policy.max_attempts(),
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "retrying download"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(%reason, "not retrying download");
                    return Err((e, attempt));
                }
            },
        }
    }
}
