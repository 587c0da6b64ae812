//! Jikan API client.
//!
//! One request per call. Non-2xx responses are turned into errors before the
//! body is looked at; there is no retry and no backoff.

use super::error::CatalogError;
use super::types::*;
use super::CatalogApi;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jikan API v4 client
#[derive(Debug, Clone)]
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API, without a trailing slash
    base_url: String,
}

impl JikanClient {
    /// Create a new Jikan client
    ///
    /// `timeout` of `None` keeps the transport default.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!(url = %url, params = ?params, "Making API request");

        let response = self.client.get(&url).query(params).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request error");
            CatalogError::Transport(e)
        })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(url = %url, "Rate limited by server");
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            warn!(
                url = %url,
                status = %status,
                error = %error_text,
                "Request failed"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse response");
            CatalogError::Malformed {
                reason: e.to_string(),
            }
        })
    }
}

impl CatalogApi for JikanClient {
    async fn search_anime(&self, query: &str, page: u32) -> Result<AnimePage, CatalogError> {
        info!(query = query, page = page, "Searching anime");

        let envelope: SearchEnvelope = self
            .get(
                "/anime",
                &[("q", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        match envelope.data {
            Some(data) => {
                debug!(results = data.len(), "Search successful");
                Ok(AnimePage {
                    data,
                    pagination: envelope.pagination,
                })
            }
            None => {
                warn!(query = query, page = page, "Response has no data envelope");
                Err(CatalogError::Malformed {
                    reason: "missing data envelope".to_string(),
                })
            }
        }
    }

    async fn get_anime(&self, id: u32) -> Result<Option<AnimeDetails>, CatalogError> {
        debug!(mal_id = id, "Fetching anime details");

        match self.get::<DetailEnvelope>(&format!("/anime/{}", id), &[]).await {
            Ok(envelope) => Ok(envelope.data),
            Err(e) if e.is_not_found() => {
                debug!(mal_id = id, "Anime not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
