// Supabase (PostgREST) implementation of the remote backend
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Response, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::db::{Apartment, ParkingDocument, RemoteBackend, StoreError, StoreResult, TokenMap};

const STATE_TABLE: &str = "parking_state";
const TOKENS_TABLE: &str = "parking_tokens";

/// Key of the single state row.
pub const STATE_ROW_ID: i64 = 1;

#[derive(Deserialize)]
struct StateRow {
    data: Value,
}

#[derive(Serialize)]
struct NewStateRow<'a> {
    id: i64,
    data: &'a ParkingDocument,
}

#[derive(Serialize)]
struct StateUpdate<'a> {
    data: &'a ParkingDocument,
}

#[derive(Deserialize)]
struct TokenRow {
    token: String,
    apt: Apartment,
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: String,
}

impl SupabaseClient {
    /// Builds a client for the project at `url` authenticated with `key`.
    ///
    /// Nothing is sent over the network here; this only fails on credentials
    /// that can never work.
    pub fn new(url: &str, key: &str) -> StoreResult<Self> {
        let mut base = Url::parse(url)
            .map_err(|e| StoreError::ClientConfig(format!("invalid Supabase URL: {}", e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::ClientConfig(format!(
                "unsupported Supabase URL scheme: {}",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut api_key = HeaderValue::from_str(key).map_err(|_| {
            StoreError::ClientConfig("Supabase key is not a valid header value".to_string())
        })?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|_| {
            StoreError::ClientConfig("Supabase key is not a valid header value".to_string())
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::ClientConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rest_url: format!("{}rest/v1/", base),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}", self.rest_url, table)
    }
}

fn row_filter() -> String {
    format!("eq.{}", STATE_ROW_ID)
}

async fn error_for_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::RemoteStatus {
        status: status.as_u16(),
        body,
    })
}

async fn decode_rows<T: DeserializeOwned>(response: Response, table: &str) -> StoreResult<Vec<T>> {
    let body = error_for_status(response).await?.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| StoreError::MalformedRow(format!("{}: {}", table, e)))
}

#[async_trait]
impl RemoteBackend for SupabaseClient {
    async fn fetch_state(&self) -> StoreResult<Option<ParkingDocument>> {
        let response = self
            .client
            .get(self.table_url(STATE_TABLE))
            .query(&[("select", "data".to_string()), ("id", row_filter())])
            .send()
            .await?;
        let rows: Vec<StateRow> = decode_rows(response, STATE_TABLE).await?;

        match rows.into_iter().next() {
            Some(row) => ParkingDocument::from_value(row.data).map(Some).ok_or_else(|| {
                StoreError::MalformedRow(format!("{}.data is not a JSON object", STATE_TABLE))
            }),
            None => Ok(None),
        }
    }

    async fn insert_state(&self, document: &ParkingDocument) -> StoreResult<()> {
        let response = self
            .client
            .post(self.table_url(STATE_TABLE))
            .header("Prefer", "return=minimal")
            .json(&NewStateRow {
                id: STATE_ROW_ID,
                data: document,
            })
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }

    /// PATCHes the state row. PostgREST answers 2xx even when the filter
    /// matches nothing, so the updated rows are read back and an empty result
    /// is an error.
    async fn update_state(&self, document: &ParkingDocument) -> StoreResult<()> {
        let response = self
            .client
            .patch(self.table_url(STATE_TABLE))
            .query(&[("id", row_filter()), ("select", "id".to_string())])
            .header("Prefer", "return=representation")
            .json(&StateUpdate { data: document })
            .send()
            .await?;
        let rows: Vec<IgnoredAny> = decode_rows(response, STATE_TABLE).await?;

        if rows.is_empty() {
            return Err(StoreError::MissingRow(format!(
                "{} id={}",
                STATE_TABLE, STATE_ROW_ID
            )));
        }
        Ok(())
    }

    async fn fetch_tokens(&self) -> StoreResult<TokenMap> {
        let response = self
            .client
            .get(self.table_url(TOKENS_TABLE))
            .query(&[("select", "token,apt")])
            .send()
            .await?;
        let rows: Vec<TokenRow> = decode_rows(response, TOKENS_TABLE).await?;

        Ok(rows.into_iter().map(|row| (row.token, row.apt)).collect())
    }
}
