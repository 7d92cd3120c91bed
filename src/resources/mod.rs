//! Typed accessors for the backend's CRUD resources.
//!
//! Every call goes through [`ApiClient::request`]; these types only fix the
//! path and the envelope handling.

pub mod reports;

pub use reports::{ReportKind, ReportQuery, ReportsClient};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{ApiClient, ApiRequest};
use crate::error::{Result, UrutiError};
use crate::types::{Envelope, Page, Wrapped};

/// Query pairs for list endpoints.
pub type ListQuery<'q> = &'q [(&'q str, &'q str)];

/// Client for one CRUD collection such as `/invoices`.
///
/// Created via the accessors on [`ApiClient`] (`invoices()`, `accounts()`, ...).
#[derive(Debug, Clone, Copy)]
pub struct ResourceClient<'a> {
    client: &'a ApiClient,
    collection: &'static str,
}

impl<'a> ResourceClient<'a> {
    pub(crate) fn new(client: &'a ApiClient, collection: &'static str) -> Self {
        Self { client, collection }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// GET `/{collection}` with query pairs, keeping pagination metadata.
    #[tracing::instrument(skip(self, query), fields(collection = self.collection))]
    pub async fn list<T: DeserializeOwned>(&self, query: ListQuery<'_>) -> Result<Page<Vec<T>>> {
        let request = query.iter().fold(
            ApiRequest::get(self.collection_path()),
            |request, (key, value)| request.with_query(*key, *value),
        );
        let response = self.client.request(request).await?;
        if response.payload.is_empty() {
            return Ok(Page::empty());
        }
        let null_data = response
            .payload
            .as_json()
            .and_then(|body| body.get("data"))
            .is_some_and(serde_json::Value::is_null);
        if null_data {
            let wrapped: Wrapped<Option<Vec<T>>> =
                serde_json::from_value(response.payload.into_value())?;
            let page = Envelope::Wrapped(wrapped).into_page();
            return Ok(Page {
                items: page.items.unwrap_or_default(),
                page: page.page,
                page_size: page.page_size,
                total: page.total,
                total_pages: page.total_pages,
            });
        }
        Ok(response.envelope::<Vec<T>>()?.into_page())
    }

    /// GET `/{collection}/{id}`.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client.get(&self.item_path(id)?).await
    }

    /// POST `/{collection}`.
    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        self.client.post(&self.collection_path(), body).await
    }

    /// PUT `/{collection}/{id}`.
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
    ) -> Result<T> {
        self.client.put(&self.item_path(id)?, body).await
    }

    /// DELETE `/{collection}/{id}`.
    pub async fn delete(&self, id: &str) -> Result<serde_json::Value> {
        self.client.delete(&self.item_path(id)?).await
    }

    fn collection_path(&self) -> String {
        format!("/{}", self.collection)
    }

    fn item_path(&self, id: &str) -> Result<String> {
        let id = id.trim();
        if id.is_empty() || id.contains(|c: char| matches!(c, '/' | '?' | '#')) {
            return Err(UrutiError::InvalidArgument(format!(
                "invalid {} id {id:?}",
                self.collection
            )));
        }
        Ok(format!("/{}/{id}", self.collection))
    }
}

impl ApiClient {
    pub fn resource(&self, collection: &'static str) -> ResourceClient<'_> {
        ResourceClient::new(self, collection)
    }

    pub fn invoices(&self) -> ResourceClient<'_> {
        self.resource("invoices")
    }

    pub fn accounts(&self) -> ResourceClient<'_> {
        self.resource("accounts")
    }

    pub fn journal(&self) -> ResourceClient<'_> {
        self.resource("journal")
    }

    pub fn bank_accounts(&self) -> ResourceClient<'_> {
        self.resource("bank-accounts")
    }

    pub fn customers(&self) -> ResourceClient<'_> {
        self.resource("customers")
    }

    pub fn vendors(&self) -> ResourceClient<'_> {
        self.resource("vendors")
    }

    pub fn reports(&self) -> ReportsClient<'_> {
        ReportsClient::new(self)
    }
}
