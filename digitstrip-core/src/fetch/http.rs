//! HTTP(S) archive source backed by `ureq`.

use std::time::Duration;

use ureq::Agent;

use super::{RemoteSource, RemoteStream};
use crate::config::DatasetConfig;
use crate::error::FetchError;

/// Fetches `<base_url>/<name>` over HTTP(S).
#[derive(Clone, Debug)]
pub struct HttpSource {
    agent: Agent,
    base_url: String,
}

impl HttpSource {
    /// Creates a source under `base_url` with an optional global deadline
    /// per request.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let config = Agent::config_builder().timeout_global(timeout).build();
        Self {
            agent: config.into(),
            base_url: base_url.into(),
        }
    }

    /// Creates a source from the base URL and timeout of `config`.
    #[must_use]
    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout)
    }

    /// URL of the archive called `name`.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

impl RemoteSource for HttpSource {
    fn open(&self, name: &str) -> Result<RemoteStream, FetchError> {
        let url = self.url_for(name);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|error| FetchError::Request {
                url: url.clone(),
                message: error.to_string(),
            })?;

        let declared_len = response
            .headers()
            .get("content-length")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| FetchError::MissingLength { url: url.clone() })?;

        Ok(RemoteStream {
            location: url,
            declared_len,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("https://example.test/mnist")]
    #[case::trailing_slash("https://example.test/mnist/")]
    fn url_joins_base_and_name(#[case] base: &str) {
        let source = HttpSource::new(base, None);
        assert_eq!(
            source.url_for("train-labels-idx1-ubyte.gz"),
            "https://example.test/mnist/train-labels-idx1-ubyte.gz"
        );
    }
}
