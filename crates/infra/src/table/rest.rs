//! PostgREST-style HTTP client for a hosted stock table.
//!
//! Requests go to `{url}/rest/v1/{table}`. Filters are encoded as `column=eq.value`
//! query parameters. Updates and deletes send `Prefer: return=representation` so the
//! affected rows come back and can be counted.

use reqwest::{Method, RequestBuilder, Response, StatusCode};

use super::{Column, Filter, StockRecord, TableClient, TableError};
use crate::config::StoreConfig;

pub struct RestTableClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl core::fmt::Debug for RestTableClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RestTableClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RestTableClient {
    pub fn new(config: &StoreConfig) -> Result<Self, TableError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint(&config.url, &config.table),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let req = self.http.request(method, &self.endpoint);
        if self.api_key.is_empty() {
            req
        } else {
            req.header("apikey", &self.api_key).bearer_auth(&self.api_key)
        }
    }

    async fn rows(resp: Response) -> Result<Vec<StockRecord>, TableError> {
        let resp = check(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| TableError::Decode(e.to_string()))
    }
}

fn endpoint(url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", url.trim_end_matches('/'), table)
}

pub(crate) fn filter_query(filter: &Filter) -> Vec<(&'static str, String)> {
    filter
        .predicates()
        .map(|(column, value)| (column.as_str(), format!("eq.{value}")))
        .collect()
}

async fn check(resp: Response) -> Result<Response, TableError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::CONFLICT {
        return Err(TableError::Duplicate(body));
    }
    Err(TableError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait::async_trait]
impl TableClient for RestTableClient {
    async fn select_all_ordered_by(&self, column: Column) -> Result<Vec<StockRecord>, TableError> {
        let order = format!("{}.asc", column.as_str());
        let resp = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", order.as_str())])
            .send()
            .await?;
        Self::rows(resp).await
    }

    async fn select_where(&self, filter: &Filter) -> Result<Vec<StockRecord>, TableError> {
        let resp = self
            .request(Method::GET)
            .query(&[("select", "*")])
            .query(&filter_query(filter))
            .send()
            .await?;
        Self::rows(resp).await
    }

    async fn insert(&self, record: &StockRecord) -> Result<(), TableError> {
        let resp = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn update(&self, record: &StockRecord, filter: &Filter) -> Result<u64, TableError> {
        let resp = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .query(&filter_query(filter))
            .json(record)
            .send()
            .await?;
        Ok(Self::rows(resp).await?.len() as u64)
    }

    async fn delete(&self, filter: &Filter) -> Result<u64, TableError> {
        let resp = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation")
            .query(&filter_query(filter))
            .send()
            .await?;
        Ok(Self::rows(resp).await?.len() as u64)
    }
}
