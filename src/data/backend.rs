//! HTTP client for the sales backend.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::data::SalesSource;
use crate::data::envelope::decode_envelope;
use crate::domain::{BackendSummary, DateRange, DecodedRecords, ProductTotal};
use crate::error::{AppError, LoadError};

const PATH_ALL_SALES: &str = "/vendas";
const PATH_RANGE: &str = "/filtro";
const PATH_SUMMARY: &str = "/resumo";
const PATH_PRODUCT_TOTALS: &str = "/total_por_produto";

pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::new(&settings.backend_url, settings.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /resumo`.
    pub fn fetch_summary(&self) -> Result<BackendSummary, LoadError> {
        self.get_json(PATH_SUMMARY, &[])
    }

    /// `GET /total_por_produto`.
    pub fn fetch_product_totals(&self) -> Result<Vec<ProductTotal>, LoadError> {
        self.get_json(PATH_PRODUCT_TOTALS, &[])
    }

    fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<(reqwest::StatusCode, String), LoadError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, ?query, "sending request");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| LoadError::Transport(format!("failed to read response: {e}")))?;
        Ok((status, body))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, LoadError> {
        let (status, body) = self.get_text(path, query)?;
        if !status.is_success() {
            return Err(LoadError::Transport(format!("request failed with status {status}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| LoadError::Transport(format!("invalid response body: {e}")))
    }
}

impl SalesSource for BackendClient {
    fn fetch(&self, range: Option<&DateRange>) -> Result<DecodedRecords, LoadError> {
        let (path, query) = match range {
            None => (PATH_ALL_SALES, Vec::new()),
            Some(r) => (
                PATH_RANGE,
                vec![("inicio", r.start().to_string()), ("fim", r.end().to_string())],
            ),
        };

        let (status, body) = self.get_text(path, &query)?;

        // Error statuses may still carry an envelope with a `mensagem`; prefer it.
        match decode_envelope(&body) {
            Err(LoadError::Transport(_)) if !status.is_success() => Err(LoadError::Transport(
                format!("request failed with status {status}"),
            )),
            other => other,
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
