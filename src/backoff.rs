const MAX_INTERVAL_BETWEEN_TRIES: std::time::Duration = std::time::Duration::from_secs(2);

// The Firebase API drops requests now and then under load, so every call
// retries briefly before the error surfaces to the cache.
pub(crate) fn backoff_default() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_interval(MAX_INTERVAL_BETWEEN_TRIES)
        .with_max_elapsed_time(Some(std::time::Duration::from_secs(15)))
        .build()
}
