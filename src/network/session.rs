use std::time::Duration;

use reqwest::Client;

use crate::core::{LocalImagesError, LocalImagesOptions};

/// User-Agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("local-images/", env!("CARGO_PKG_VERSION"));

/// HTTP session used for downloading remote assets
///
/// Created once at registration and shared by every document transform, so
/// connections to the same image host get pooled.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Builds a session with the given timeout (seconds) and optional User-Agent
    pub fn new(timeout: u64, user_agent: Option<&str>) -> Result<Session, LocalImagesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| {
                LocalImagesError::Configuration(format!("unable to build HTTP client: {e}"))
            })?;

        Ok(Session { client })
    }

    pub fn from_options(options: &LocalImagesOptions) -> Result<Session, LocalImagesError> {
        Session::new(options.timeout, options.user_agent.as_deref())
    }

    /// Downloads a resource with a single GET request
    ///
    /// Anything other than a 2xx response, as well as connection problems and
    /// timeouts, is reported as [`LocalImagesError::Fetch`]. There are no retries.
    pub async fn fetch(&self, locator: &str) -> Result<Vec<u8>, LocalImagesError> {
        tracing::debug!(locator, "fetching remote asset");

        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| LocalImagesError::fetch(locator, describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocalImagesError::fetch(locator, format!("HTTP {status}")));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| LocalImagesError::fetch(locator, describe_error(&e)))?;

        Ok(data.to_vec())
    }
}

fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
