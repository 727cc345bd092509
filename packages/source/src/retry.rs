//! Fetching remote data files with retry.
//!
//! Crash exports and boundary documents are fetched once at startup. A
//! transient failure (timeout, connection reset, HTTP 429 or 5xx) is
//! retried on a doubling [`Backoff`] schedule; any other client error is
//! permanent.

use std::time::Duration;

use crate::SourceError;

/// Retry schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry. Each further retry doubles it.
    pub base: Duration,
}

impl Default for Backoff {
    /// 3 retries after 2s, 4s and 8s.
    fn default() -> Self {
        Self {
            retries: 3,
            base: Duration::from_secs(2),
        }
    }
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        self.base
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

/// What to do with the result of one attempt.
enum Attempt {
    Done(reqwest::Response),
    Retry(SourceError),
    Fail(SourceError),
}

fn classify(result: Result<reqwest::Response, reqwest::Error>) -> Attempt {
    match result {
        Ok(response) => {
            let status = response.status();
            if is_retryable_status(status) {
                Attempt::Retry(SourceError::Fetch {
                    message: format!("HTTP {status} from {}", response.url()),
                })
            } else if status.is_client_error() {
                Attempt::Fail(SourceError::Fetch {
                    message: format!("HTTP {status} from {}", response.url()),
                })
            } else {
                Attempt::Done(response)
            }
        }
        Err(e) if is_transient(&e) => Attempt::Retry(SourceError::Http(e)),
        Err(e) => Attempt::Fail(SourceError::Http(e)),
    }
}

/// Downloads `url` as text, retrying transient failures.
///
/// # Errors
///
/// Returns [`SourceError`] on a permanent failure, when the last retry
/// still fails, or if the body cannot be read.
pub async fn get_text(
    client: &reqwest::Client,
    url: &str,
    backoff: Backoff,
) -> Result<String, SourceError> {
    let mut retry = 0;

    loop {
        match classify(client.get(url).send().await) {
            Attempt::Done(response) => {
                let text = response.text().await?;
                log::debug!("Downloaded {} bytes from {url}", text.len());
                return Ok(text);
            }
            Attempt::Fail(e) => return Err(e),
            Attempt::Retry(e) if retry >= backoff.retries => {
                log::error!("Giving up on {url} after {retry} retries");
                return Err(e);
            }
            Attempt::Retry(e) => {
                retry += 1;
                let delay = backoff.delay(retry);
                log::warn!("{e}; retry {retry}/{} in {delay:?}", backoff.retries);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Rate limiting and server errors.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_rate_limits_and_server_errors_only() {
        assert!(is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(reqwest::StatusCode::OK));
    }

    #[test]
    fn delays_double_from_the_base() {
        let backoff = Backoff::default();
        let delays: Vec<u64> = (1..=backoff.retries)
            .map(|retry| backoff.delay(retry).as_secs())
            .collect();
        assert_eq!(delays, [2, 4, 8]);
    }

    #[tokio::test]
    async fn unreachable_host_fails_after_retries() {
        let backoff = Backoff {
            retries: 1,
            base: Duration::from_millis(1),
        };

        let result = get_text(&reqwest::Client::new(), "http://127.0.0.1:9/crashes.csv", backoff).await;

        assert!(matches!(result, Err(SourceError::Http(_))));
    }
}
