//! Access to the hosted resource catalog.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{GlobalCategory, ProgramSlug},
    error::{ApiError, ApiException},
    protocol::{FileDescriptor, GroupedResources, ProgramSummary},
};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Directory of programs with their display names.
    async fn list_programs(&self) -> Result<Vec<ProgramSummary>>;
    async fn program_resources_grouped(&self, slug: ProgramSlug) -> Result<GroupedResources>;
    async fn global_category(&self, category: GlobalCategory) -> Result<Vec<FileDescriptor>>;
}

pub struct MissingCatalogClient;

#[async_trait]
impl CatalogClient for MissingCatalogClient {
    async fn list_programs(&self) -> Result<Vec<ProgramSummary>> {
        Err(anyhow!("resource catalog is unavailable"))
    }

    async fn program_resources_grouped(&self, slug: ProgramSlug) -> Result<GroupedResources> {
        Err(anyhow!(
            "resource catalog is unavailable for program {}",
            slug.as_str()
        ))
    }

    async fn global_category(&self, category: GlobalCategory) -> Result<Vec<FileDescriptor>> {
        Err(anyhow!(
            "resource catalog is unavailable for category {}",
            category.catalog_key()
        ))
    }
}

/// REST client for the catalog service.
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed).with_context(|| format!("invalid catalog url '{base_url}'"))?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "catalog request");
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        decode_response(res, &url).await
    }
}

async fn decode_response<T: DeserializeOwned>(res: Response, url: &str) -> Result<T> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
            return Err(ApiException::from(api_error))
                .with_context(|| format!("catalog rejected {url} with HTTP {status}"));
        }
        return Err(anyhow!("catalog returned HTTP {status} for {url}"));
    }
    res.json::<T>()
        .await
        .with_context(|| format!("failed to decode catalog response from {url}"))
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list_programs(&self) -> Result<Vec<ProgramSummary>> {
        self.get_json("/programs").await
    }

    async fn program_resources_grouped(&self, slug: ProgramSlug) -> Result<GroupedResources> {
        self.get_json(&format!("/programs/{}/resources", slug.as_str()))
            .await
    }

    async fn global_category(&self, category: GlobalCategory) -> Result<Vec<FileDescriptor>> {
        self.get_json(&format!("/categories/{}", category.catalog_key()))
            .await
    }
}
