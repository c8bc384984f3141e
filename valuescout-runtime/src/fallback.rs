use std::future::Future;

/// Outcome of [`first_success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback<T, E> {
    /// The candidate at `index` succeeded; later candidates were not tried.
    Found { index: usize, value: T },
    /// Every candidate failed; errors are in candidate order.
    Exhausted { errors: Vec<E> },
}

impl<T, E> Fallback<T, E> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The winning value, discarding which candidate produced it.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Convert into a `Result`, folding the collected errors with `on_exhausted`.
    pub fn ok_or_else<F, X>(self, on_exhausted: F) -> Result<T, X>
    where
        F: FnOnce(Vec<E>) -> X,
    {
        match self {
            Self::Found { value, .. } => Ok(value),
            Self::Exhausted { errors } => Err(on_exhausted(errors)),
        }
    }
}

/// Run `attempt` on each candidate in order and stop at the first `Ok`.
///
/// Each candidate is expected to bound its own wait (for browser lookups, a
/// short per-call timeout).
///
/// ```
/// use valuescout_runtime::{Fallback, first_success};
///
/// # tokio_test_block_on(async {
/// let candidates = ["#missing", "#menu", "#other"];
/// let outcome = first_success(&candidates, |_, sel| async move {
///     if *sel == "#menu" { Ok(sel.len()) } else { Err(format!("no {sel}")) }
/// })
/// .await;
/// assert_eq!(outcome, Fallback::Found { index: 1, value: 5 });
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub async fn first_success<'c, C, T, E, F, Fut>(candidates: &'c [C], mut attempt: F) -> Fallback<T, E>
where
    F: FnMut(usize, &'c C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut errors = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        match attempt(index, candidate).await {
            Ok(value) => return Fallback::Found { index, value },
            Err(e) => errors.push(e),
        }
    }
    Fallback::Exhausted { errors }
}
