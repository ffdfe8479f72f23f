use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

use crate::utils::error::CustomError;

/// Outcome of one optimistic write attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    /// The document changed between read and write.
    Conflict,
}

const BASE_BACKOFF_MS: u64 = 5;

/// Runs `attempt` until it succeeds, fails, or reports `limit` conflicts.
pub async fn retry_on_conflict<T, F, Fut>(
    what: &str,
    limit: u32,
    mut attempt: F,
) -> Result<T, CustomError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>, CustomError>>,
{
    let limit = limit.max(1);

    for round in 1..=limit {
        match attempt().await? {
            Attempt::Done(value) => return Ok(value),
            Attempt::Conflict if round < limit => {
                let jitter = rand::rng().random_range(0..=BASE_BACKOFF_MS);
                let delay = BASE_BACKOFF_MS * u64::from(round) + jitter;
                warn!("{what}: version conflict on attempt {round}/{limit}, retrying in {delay}ms");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Attempt::Conflict => break,
        }
    }

    Err(CustomError::ConflictError(format!(
        "{what} was modified concurrently, please retry"
    )))
}
