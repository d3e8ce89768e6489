//! Read-only epigram store.
//!
//! Each reveal layer maps to one table of a PostgREST-style backend. The
//! unlock core only ever reads; authoring happens elsewhere.

use std::collections::BTreeMap;
use std::future::Future;

use serde::Deserialize;
use threshold_types::RevealLayer;

use crate::http_client;
use crate::read_capped_error_body;
use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};

/// Shown when the depth layer opens on an empty table.
pub const EMPTY_DEPTH_TITLE: &str = "You found the depth.";
pub const EMPTY_DEPTH_BODY: &str = "What belongs here hasn't been written yet.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpigramRecord {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("content store unreachable after {attempts} attempt(s)")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid content payload: {0}")]
    Decode(String),
}

pub trait ContentStore: Send + Sync {
    /// Records for `layer`, ordered by `display_order`.
    fn list(
        &self,
        layer: RevealLayer,
    ) -> impl Future<Output = Result<Vec<EpigramRecord>, ContentError>> + Send;
}

/// Table names per layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTables {
    pub public: String,
    pub secret: String,
    pub depth: String,
}

impl Default for ContentTables {
    fn default() -> Self {
        Self {
            public: "epigrams".to_string(),
            secret: "secret_epigrams".to_string(),
            depth: "depth_epigrams".to_string(),
        }
    }
}

impl ContentTables {
    #[must_use]
    pub fn table(&self, layer: RevealLayer) -> &str {
        match layer {
            RevealLayer::Public => &self.public,
            RevealLayer::Secret => &self.secret,
            RevealLayer::Depth => &self.depth,
        }
    }
}

#[derive(Clone)]
pub struct RestContentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    tables: ContentTables,
    retry: RetryConfig,
}

impl std::fmt::Debug for RestContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestContentStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"****")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

impl RestContentStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: http_client().clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tables: ContentTables::default(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_tables(mut self, tables: ContentTables) -> Self {
        self.tables = tables;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn table_url(&self, layer: RevealLayer) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=display_order.asc",
            self.base_url,
            self.tables.table(layer)
        )
    }
}

impl ContentStore for RestContentStore {
    async fn list(&self, layer: RevealLayer) -> Result<Vec<EpigramRecord>, ContentError> {
        let url = self.table_url(layer);
        let outcome = send_with_retry(
            || {
                self.client
                    .get(&url)
                    .header("apikey", &self.api_key)
                    .bearer_auth(&self.api_key)
            },
            &self.retry,
        )
        .await;

        let response = match outcome {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) => {
                let status = response.status().as_u16();
                let body = read_capped_error_body(response).await;
                return Err(ContentError::Http { status, body });
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                return Err(ContentError::Transport { attempts, source });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))?;
        let records: Vec<EpigramRecord> =
            serde_json::from_slice(&bytes).map_err(|e| ContentError::Decode(e.to_string()))?;
        tracing::debug!(layer = %layer, count = records.len(), "Fetched epigrams");
        Ok(records)
    }
}

/// In-memory store for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticContentStore {
    layers: BTreeMap<RevealLayer, Vec<EpigramRecord>>,
}

impl StaticContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layer(mut self, layer: RevealLayer, mut records: Vec<EpigramRecord>) -> Self {
        records.sort_by_key(|r| r.display_order);
        self.layers.insert(layer, records);
        self
    }
}

impl ContentStore for StaticContentStore {
    async fn list(&self, layer: RevealLayer) -> Result<Vec<EpigramRecord>, ContentError> {
        Ok(self.layers.get(&layer).cloned().unwrap_or_default())
    }
}

/// Store chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ContentSource {
    Rest(RestContentStore),
    Static(StaticContentStore),
}

impl ContentStore for ContentSource {
    async fn list(&self, layer: RevealLayer) -> Result<Vec<EpigramRecord>, ContentError> {
        match self {
            ContentSource::Rest(store) => store.list(layer).await,
            ContentSource::Static(store) => store.list(layer).await,
        }
    }
}
