//! Uniform time limit for provider calls.

use std::future::Future;
use std::time::Duration;

/// Result of a time-limited provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T, E> {
    /// The call completed successfully in time.
    Success(T),
    /// The limit elapsed first; the call was dropped.
    TimedOut,
    /// The call completed in time with an error.
    Failed(E),
}

impl<T, E> CallOutcome<T, E> {
    /// The success value, if any.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::TimedOut | Self::Failed(_) => None,
        }
    }
}

/// Race `future` against `limit`.
///
/// When the limit wins the future is dropped, so a late response can never
/// be observed.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use springtrip_planner::{CallOutcome, with_timeout};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let outcome = with_timeout(Duration::from_secs(1), async { Ok::<_, ()>(7) }).await;
/// assert_eq!(outcome, CallOutcome::Success(7));
/// # }
/// ```
pub async fn with_timeout<T, E, F>(limit: Duration, future: F) -> CallOutcome<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(Ok(value)) => CallOutcome::Success(value),
        Ok(Err(error)) => CallOutcome::Failed(error),
        Err(_elapsed) => CallOutcome::TimedOut,
    }
}
