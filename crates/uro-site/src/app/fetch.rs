//! HTTP fragment source.

use crate::core::error::{SiteError, SiteResult};
use crate::core::ports::FragmentSource;
use gloo_net::http::Request;
use std::future::Future;

/// Fetches fragments relative to the current document.
pub(crate) struct HttpFragments;

impl FragmentSource for HttpFragments {
    fn fetch(&self, path: &str) -> impl Future<Output = SiteResult<String>> {
        let path = path.to_string();
        async move { fetch_text(&path).await }
    }
}

async fn fetch_text(path: &str) -> SiteResult<String> {
    let network = |err: gloo_net::Error| SiteError::Network {
        path: path.to_string(),
        message: err.to_string(),
    };
    let response = Request::get(path).send().await.map_err(network)?;
    if !response.ok() {
        return Err(SiteError::FetchStatus {
            path: path.to_string(),
            status: response.status(),
        });
    }
    response.text().await.map_err(network)
}
