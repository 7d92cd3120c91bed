//! Financial report endpoints (`/reports/{name}`).

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use strum::{Display, IntoStaticStr};

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;

/// Reports the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ReportKind {
    ProfitAndLoss,
    BalanceSheet,
    TrialBalance,
    CashFlow,
    AgedReceivables,
    AgedPayables,
    GeneralLedger,
}

/// Period and comparison parameters shared by report endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub as_of: Option<NaiveDate>,
    pub company_id: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl ReportQuery {
    pub fn period(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn as_of(date: NaiveDate) -> Self {
        Self {
            as_of: Some(date),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let dates = [("from", self.from), ("to", self.to), ("asOf", self.as_of)];
        dates
            .into_iter()
            .filter_map(|(key, date)| Some((key.to_string(), date?.format("%Y-%m-%d").to_string())))
            .chain(
                self.company_id
                    .iter()
                    .map(|id| ("companyId".to_string(), id.clone())),
            )
            .chain(self.extra.iter().cloned())
            .collect()
    }
}

/// Client for `/reports`. Created via [`ApiClient::reports`].
#[derive(Debug, Clone, Copy)]
pub struct ReportsClient<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsClient<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// GET `/reports/{kind}` with the query's parameters.
    pub async fn fetch<T: DeserializeOwned>(&self, kind: ReportKind, query: &ReportQuery) -> Result<T> {
        self.fetch_named(kind.into(), query).await
    }

    /// GET `/reports/{name}` for reports without a [`ReportKind`].
    pub async fn fetch_named<T: DeserializeOwned>(&self, name: &str, query: &ReportQuery) -> Result<T> {
        let request = query.pairs().into_iter().fold(
            ApiRequest::get(format!("/reports/{name}")),
            |request, (key, value)| request.with_query(key, value),
        );
        self.client.send(request).await
    }
}
