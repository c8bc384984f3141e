use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Fixed-delay retry policy. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, no pause.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Every attempt failed; `last` is the error of the final attempt.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl<E: fmt::Display> fmt::Display for Exhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempts: {}", self.attempts, self.last)
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Exhausted<E> {}

/// Run `action` until it succeeds or `policy.max_attempts` is reached.
///
/// `action` receives the 1-based attempt number, so a step can restore a
/// known state (reload the page) before any attempt after the first. The
/// policy's delay is slept between attempts, never after the last one. A
/// policy of zero attempts still runs once.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut action: F) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match action(attempt).await {
            Ok(value) => return Ok(value),
            Err(last) if attempt >= max_attempts => {
                return Err(Exhausted {
                    attempts: attempt,
                    last,
                });
            }
            Err(_) => {
                attempt += 1;
                if !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
            }
        }
    }
}
