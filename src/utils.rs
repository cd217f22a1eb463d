use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use backoff::{future::retry, ExponentialBackoff, ExponentialBackoffBuilder};
use log::warn;

const FIRST_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(4);

/// Retry limits for one request: extra attempts and a wall-clock budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub max_elapsed: Duration,
}

impl RetryPolicy {
    /// Budget for `retries` extra attempts that each may run until `timeout`,
    /// plus the longest randomized wait before each of them.
    pub fn for_requests(retries: usize, timeout: Duration) -> Self {
        let attempts = u32::try_from(retries.saturating_add(1)).unwrap_or(u32::MAX);
        let waits = u32::try_from(retries).unwrap_or(u32::MAX);
        Self {
            retries,
            max_elapsed: timeout.saturating_mul(attempts)
                .saturating_add(MAX_DELAY.saturating_mul(waits).saturating_mul(3) / 2),
        }
    }
}

/// Run `f`, retrying up to `policy.retries` extra times with exponential backoff.
///
/// `retries == 0` makes a single attempt. No retry starts once `max_elapsed` has passed.
pub async fn retry_wrapper<I, E, F, Fut>(label: &str, policy: RetryPolicy, f: F) -> Result<I, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<I, E>>,
    E: Display,
{
    let RetryPolicy { retries, max_elapsed } = policy;
    let attempts = AtomicUsize::new(0);
    retry(backoff_config(max_elapsed), || async {
        let attempt = attempts.fetch_add(1, Ordering::AcqRel) + 1;
        if attempt > 1 {
            warn!("[{label}] attempt {attempt} of {}", retries + 1);
        }
        f().await
            .map_err(|err| {
                if attempt > retries {
                    backoff::Error::permanent(err)
                } else {
                    warn!("[{label}] request failed: {err}");
                    backoff::Error::transient(err)
                }
            })
    })
        .await
}

fn backoff_config(max_elapsed: Duration) -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(FIRST_DELAY)
        .with_multiplier(2.0)
        .with_max_interval(MAX_DELAY)
        .with_max_elapsed_time(Some(max_elapsed))
        .build()
}
