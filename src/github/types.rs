//! Search result DTOs and upstream error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response of the GitHub repository search endpoint.
///
/// Field names match the wire format. The coordinator treats this value
/// as opaque: it is cached and returned verbatim, never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total number of repositories matching the query.
    pub total_count: i64,
    /// True when the upstream could not finish scanning the index.
    #[serde(default)]
    pub incomplete_results: bool,
    /// Matching repositories, most popular first.
    #[serde(default)]
    pub items: Vec<RepoSummary>,
}

/// Summary of a single repository as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Errors that can occur during an upstream search call.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Upstream rejected the request (4xx).
    #[error("upstream client error: HTTP {status}")]
    Client { status: u16 },

    /// Upstream failed to serve the request (5xx).
    #[error("upstream server error: HTTP {status}")]
    Server { status: u16 },

    /// Connection failure, timeout, or malformed response body.
    #[error("upstream transport error: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Classify an HTTP status code. Returns `None` for success codes.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400..=499 => Some(UpstreamError::Client { status }),
            500..=599 => Some(UpstreamError::Server { status }),
            _ => None,
        }
    }
}
