use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ChainMoviesResponse, MovieRecord, Offer, OffersResponse};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{url} -> not found")]
    NotFound { url: String },
    #[error("{url} -> {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl BackendError {
    /// True when `err` carries a backend "not found" reply.
    pub fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<BackendError>(),
            Some(BackendError::NotFound { .. })
        )
    }
}

/// Source of raw movie listings and offers.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_movies(&self) -> Result<Vec<MovieRecord>>;
    async fn fetch_movie(&self, id: &str) -> Result<MovieRecord>;
    async fn fetch_chain_movies(&self, chain: &str) -> Result<Vec<MovieRecord>>;
    async fn fetch_offers(&self) -> Result<OffersResponse>;
    async fn fetch_offer(&self, id: &str) -> Result<Offer>;
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                url: url.to_string(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status,
                body: text,
            }
            .into());
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {url}"))?;
        Ok(parsed)
    }
}

#[async_trait]
impl MovieSource for BackendClient {
    async fn fetch_movies(&self) -> Result<Vec<MovieRecord>> {
        self.get_json(&self.url("movies")).await
    }

    async fn fetch_movie(&self, id: &str) -> Result<MovieRecord> {
        let url = self.url(&format!("movies/{}", urlencoding::encode(id)));
        self.get_json(&url).await
    }

    async fn fetch_chain_movies(&self, chain: &str) -> Result<Vec<MovieRecord>> {
        let url = chain_movies_url(&self.base_url, chain);
        let data: ChainMoviesResponse = self.get_json(&url).await?;
        Ok(data.movies)
    }

    async fn fetch_offers(&self) -> Result<OffersResponse> {
        self.get_json(&self.url("offers")).await
    }

    async fn fetch_offer(&self, id: &str) -> Result<Offer> {
        let url = self.url(&format!("offers/{}", urlencoding::encode(id)));
        self.get_json(&url).await
    }
}

/// Per-chain listings live under a lower-cased chain segment.
fn chain_movies_url(base_url: &str, chain: &str) -> String {
    format!(
        "{}/movies/parent/{}",
        base_url,
        urlencoding::encode(&chain.trim().to_lowercase())
    )
}
