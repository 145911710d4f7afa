//! Synchronous client for the **tile lab REST API**.
//!
//! Covers the three calls the client core needs: job progress, tier breaks and
//! tileset metadata. Paths are relative to a base URL such as
//! `http://localhost:8000/api`.
//!
//! ### Notes
//! - Progress requests are sent with `Cache-Control: no-cache` and are never
//!   retried here; a failed fetch is reported as a [`TransportError`] and the
//!   poller turns it into a terminal `Failed` state.
//! - Break and metadata requests retry a few times on 5xx / network errors.
//! - The server sometimes serializes `progress` as a **string**; both forms are accepted.
//!
//! Typical usage:
//! ```no_run
//! # use tileset_lab::{Client, JobRef};
//! let client = Client::from_env()?;
//! let progress = client.job_progress(&JobRef::TilesetGeneration { dataset_id: 3, tileset_id: 8 })?;
//! println!("{:?} at {}%", progress.status, progress.progress);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::error::TransportError;
use crate::models::{ClassificationRequest, JobProgress, JobRef, TierBreaks, TileMetadataResponse};
use crate::poller::JobStatusSource;
use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CACHE_CONTROL;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "TILESET_LAB_API_URL";

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

// Allow -, _, . unescaped in query values (common in field names)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

/// The tier endpoint has answered both `{"breaks": [...]}` and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum BreaksBody {
    Wrapped(TierBreaks),
    Bare(Vec<f64>),
}

impl From<BreaksBody> for Vec<f64> {
    fn from(b: BreaksBody) -> Self {
        match b {
            BreaksBody::Wrapped(t) => t.breaks,
            BreaksBody::Bare(v) => v,
        }
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("tileset-lab/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            bail!("empty API base URL");
        }
        Ok(Self { base_url, http })
    }

    /// Client for `$TILESET_LAB_API_URL`, or [`DEFAULT_BASE_URL`] when unset.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    /// Progress endpoint of a job.
    pub fn progress_url(&self, job: &JobRef) -> String {
        match job {
            JobRef::DatasetIngestion { dataset_id } => {
                format!("{}/datasets/{}/progress/", self.base_url, dataset_id)
            }
            JobRef::TilesetGeneration {
                dataset_id,
                tileset_id,
            } => format!(
                "{}/datasets/{}/tilesets/{}/progress/",
                self.base_url, dataset_id, tileset_id
            ),
        }
    }

    /// Tier break endpoint for a classification request.
    pub fn tiers_url(&self, dataset_id: u64, tileset_id: u64, req: &ClassificationRequest) -> String {
        format!(
            "{}/datasets/{}/tilesets/{}/tiers/?field={}&method={}&classes={}",
            self.base_url,
            dataset_id,
            tileset_id,
            enc(&req.field),
            req.method.as_query_param(),
            req.classes
        )
    }

    pub fn metadata_url(&self, dataset_id: u64, tileset_id: u64) -> String {
        format!(
            "{}/datasets/{}/tilesets/{}/metadata/",
            self.base_url, dataset_id, tileset_id
        )
    }

    /// Fetch the current progress of `job`, bypassing any HTTP cache.
    pub fn job_progress(&self, job: &JobRef) -> Result<JobProgress, TransportError> {
        let url = self.progress_url(job);
        let resp = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .map_err(|e| TransportError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = resp.text().map_err(|e| TransportError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// Ask the server for class breaks of `req.field`.
    pub fn classify(
        &self,
        dataset_id: u64,
        tileset_id: u64,
        req: &ClassificationRequest,
    ) -> Result<Vec<f64>> {
        if req.field.trim().is_empty() {
            bail!("a field to classify is required");
        }
        if req.classes == 0 {
            bail!("at least one class is required");
        }
        let url = self.tiers_url(dataset_id, tileset_id, req);
        let body: BreaksBody = self.get_json(&url).with_context(|| format!("GET {url}"))?;
        let breaks: Vec<f64> = body.into();
        log::debug!(
            "{} breaks for {:?} ({})",
            breaks.len(),
            req.field,
            req.method.label()
        );
        Ok(breaks)
    }

    /// Fetch header and layer metadata of a generated tileset.
    pub fn tileset_metadata(&self, dataset_id: u64, tileset_id: u64) -> Result<TileMetadataResponse> {
        let url = self.metadata_url(dataset_id, tileset_id);
        self.get_json(&url).with_context(|| format!("GET {url}"))
    }

    // Small retry for transient failures (5xx / network errors)
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r.json().context("decode json");
                }
                Ok(r) if r.status().is_server_error() => {
                    log::debug!("HTTP {} from {url}, retrying", r.status());
                }
                Ok(r) => bail!("request failed with HTTP {}", r.status()),
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        match last_err {
            Some(e) => Err(e.context("network error")),
            None => bail!("server error persisted after retries"),
        }
    }
}

impl JobStatusSource for Client {
    fn fetch_progress(&self, job: &JobRef) -> Result<JobProgress, TransportError> {
        self.job_progress(job)
    }
}
