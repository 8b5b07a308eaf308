// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{FeeSchedule, NewPortfolio, NewTransaction, Portfolio, StockMatch};
use crate::search::MIN_QUERY_LEN;

/// Failures talking to the backend. Transport problems, undecodable
/// responses and server-side rejections are distinct kinds; client-side
/// validation failures live in `validate` and never reach this type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Blocking client for the portfolio tracker backend.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base: String,
}

// Error payloads come in two shapes: `{"error": ...}` from the transaction
// endpoints and `{"detail": ...}` from the portfolio routes.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

const GENERIC_REJECTION: &str = "request failed";

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(ApiClient {
            http: crate::utils::http_client()?,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// POST /api/v1/portfolios/
    pub fn create_portfolio(&self, portfolio: &NewPortfolio) -> Result<Portfolio, ApiError> {
        let url = self.url("/api/v1/portfolios/");
        debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .json(portfolio)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp)
    }

    /// GET /api/v1/portfolios/
    pub fn list_portfolios(&self) -> Result<Vec<Portfolio>, ApiError> {
        let url = self.url("/api/v1/portfolios/");
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp)
    }

    /// GET /api/v1/portfolios/{id}
    pub fn get_portfolio(&self, id: &str) -> Result<Portfolio, ApiError> {
        let url = self.url(&format!("/api/v1/portfolios/{id}"));
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("portfolio {id}")));
        }
        read_json(resp)
    }

    /// GET /api/stocks/search?query=
    ///
    /// Queries shorter than [`MIN_QUERY_LEN`] return an empty result without
    /// touching the network.
    pub fn search_stocks(&self, query: &str) -> Result<Vec<StockMatch>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        let url = self.url("/api/stocks/search");
        debug!("GET {url}?query={query}");
        let resp = self
            .http
            .get(&url)
            .query(&[("query", query)])
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp)
    }

    /// GET /api/brokers/{name}/charges
    pub fn broker_charges(&self, broker: &str) -> Result<FeeSchedule, ApiError> {
        let url = self.url(&format!("/api/brokers/{broker}/charges"));
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if resp.status().as_u16() == 404 {
            return Err(ApiError::NotFound(format!("broker {broker}")));
        }
        read_json(resp)
    }

    /// POST /transactions/new
    ///
    /// On rejection the server-supplied error string is surfaced when the
    /// body carries one.
    pub fn submit_transaction(&self, txn: &NewTransaction) -> Result<(), ApiError> {
        let url = self.url("/transactions/new");
        debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .json(txn)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().unwrap_or_default();
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body),
        })
    }
}

fn read_json<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body),
        });
    }
    resp.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.detail))
        .unwrap_or_else(|| GENERIC_REJECTION.to_string())
}
