//! Bounded retry for transient source failures
//!
//! The refresh path assumes the remote source either recovers quickly or
//! not at all within the retry budget, so the backoff between attempts is
//! a fixed interval rather than an exponential ramp. The combinator is
//! independent of any particular operation; it is parameterized only by
//! the attempt budget and the backoff duration.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for bounded-retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(5),
        }
    }
}

/// Execute an operation with bounded retries and constant backoff
///
/// The closure is invoked up to `config.max_attempts` times; after each
/// failure except the last, the task sleeps for `config.backoff`. The
/// first success wins. Returns the last error once the budget is spent.
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
    operation_name: &str,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut last_error = None;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        "Operation '{}' succeeded on attempt {}/{}",
                        operation_name, attempt, config.max_attempts
                    );
                }
                return Ok(result);
            }
            Err(err) => {
                if attempt < config.max_attempts {
                    warn!(
                        "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                        operation_name, attempt, config.max_attempts, config.backoff, err
                    );
                    last_error = Some(err);
                    sleep(config.backoff).await;
                } else {
                    warn!(
                        "Operation '{}' failed after {} attempts: {}",
                        operation_name, config.max_attempts, err
                    );
                    last_error = Some(err);
                }
            }
        }
    }

    Err(last_error.expect("at least one attempt was made"))
}
