//! Remote asset source: downloads sounds (and the catalog csv) over HTTP.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use ureq::Agent;

/// Where payloads come from. Addressed by name; stateless per request.
pub trait AssetSource: Send + Sync {
    /// URL (or other locator) of `name`, for display.
    fn locate(&self, name: &str) -> String;

    /// Copy the payload of `name` into `dest`. Returns the number of bytes written.
    /// A non-success response or a transport error is an error.
    fn fetch(&self, name: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Assets served under one HTTP root: `<root><name>`.
pub struct HttpAssetSource {
    root: String,
    agent: Agent,
}

impl HttpAssetSource {
    /// Connect timeout only: a slow transfer of a large sound is not an error.
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(root: &str) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(Self::CONNECT_TIMEOUT))
            .build();
        Self {
            root: root.to_string(),
            agent: config.into(),
        }
    }
}

impl AssetSource for HttpAssetSource {
    fn locate(&self, name: &str) -> String {
        asset_url(&self.root, name)
    }

    fn fetch(&self, name: &str, dest: &mut dyn Write) -> Result<u64> {
        let url = self.locate(name);
        let mut response = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if status != ureq::http::StatusCode::OK {
            anyhow::bail!("Response from {} is {}", url, status.as_u16());
        }

        let mut body = response.body_mut().as_reader();
        std::io::copy(&mut body, dest).with_context(|| format!("download {url}"))
    }
}

/// Join an assets root and a name. Name is appended verbatim (it is already a relative location).
pub fn asset_url(root: &str, name: &str) -> String {
    if root.ends_with('/') || root.is_empty() {
        format!("{root}{name}")
    } else {
        format!("{root}/{name}")
    }
}
