//! Reqwest-based client for the GitHub repository search endpoint.
//!
//! # Responsibilities
//! - Build the search URL for a query (sort by stars, descending)
//! - Perform one HTTP GET with a request timeout
//! - Classify the outcome (success / 4xx / 5xx / transport)

use reqwest::header::ACCEPT;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::github::types::{SearchResults, UpstreamError};
use crate::github::UpstreamClient;
use crate::query::Query;
use async_trait::async_trait;
use thiserror::Error;

/// Date used for `created:>` when the caller gives no `since` filter.
const EPOCH_DATE: &str = "1970-01-01";

/// Errors raised while constructing the client, before any call is made.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("upstream base URL {url:?} cannot have path segments appended")]
    NotABaseUrl { url: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the GitHub search API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GithubClient {
    /// Create a client from configuration. Validates the base URL and
    /// fixes the request timeout for every call made through it.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::NotABaseUrl {
                url: config.base_url.clone(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Build the full search URL for a query.
    fn search_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            // Checked at construction: the base URL accepts path segments.
            let mut segments = url.path_segments_mut().expect("validated base URL");
            segments.pop_if_empty().push("search").push("repositories");
        }

        let date = query
            .since
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| EPOCH_DATE.to_string());

        let mut q = format!("created:>{}", date);
        if let Some(language) = &query.language {
            q.push_str(" language:");
            q.push_str(language);
        }

        url.query_pairs_mut()
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("per_page", &query.count.to_string())
            .append_pair("q", &q);
        url
    }
}

#[async_trait]
impl UpstreamClient for GithubClient {
    async fn search(&self, query: &Query) -> Result<SearchResults, UpstreamError> {
        let url = self.search_url(query);
        tracing::debug!(url = %url, "Fetching popular repositories from upstream");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if let Some(err) = UpstreamError::from_status(status) {
            tracing::warn!(status = status, "Upstream returned error status");
            return Err(err);
        }

        response
            .json::<SearchResults>()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }
}
