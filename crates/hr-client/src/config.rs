use std::time::Duration;

use url::Url;

use crate::{ClientError, ClientResult, RetryPolicy};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base of every backend path; `employees` resolves to `<base_url>/employees`.
    pub base_url: Url,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Other(format!("'{}' cannot be used as a base URL", base_url)));
        }
        Ok(Self {
            base_url,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
