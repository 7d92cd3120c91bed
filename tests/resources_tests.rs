mod support;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use uruti::error::UrutiError;
use uruti::resources::{ReportKind, ReportQuery};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::client_for;

#[derive(Debug, Deserialize, PartialEq)]
struct Invoice {
    id: String,
    status: String,
}

#[tokio::test]
async fn list_keeps_pagination_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("status", "overdue"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "inv-7", "status": "overdue"}],
            "page": 2,
            "pageSize": 1,
            "total": 5,
            "totalPages": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let page = test
        .client
        .invoices()
        .list::<Invoice>(&[("status", "overdue"), ("page", "2")])
        .await
        .unwrap();

    assert_eq!(
        page.items,
        vec![Invoice {
            id: "inv-7".to_string(),
            status: "overdue".to_string()
        }]
    );
    assert_eq!(page.page, Some(2));
    assert_eq!(page.total, Some(5));
    assert_eq!(page.total_pages, Some(5));
}

#[tokio::test]
async fn list_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bank-accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "ba-1"}])))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let page = test.client.bank_accounts().list::<Value>(&[]).await.unwrap();

    assert_eq!(page.items, vec![json!({"id": "ba-1"})]);
    assert_eq!(page.total, None);
}

#[tokio::test]
async fn list_of_empty_body_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let page = test.client.vendors().list::<Value>(&[]).await.unwrap();

    assert!(page.items.is_empty());
}

#[tokio::test]
async fn crud_calls_hit_item_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/cus-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "cus-1"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/customers/cus-1"))
        .and(body_json(json!({"name": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "Renamed"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/customers/cus-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let customers = test.client.customers();

    let fetched: Value = customers.get("cus-1").await.unwrap();
    let updated: Value = customers
        .update("cus-1", &json!({"name": "Renamed"}))
        .await
        .unwrap();
    let deleted = customers.delete("cus-1").await.unwrap();

    assert_eq!(fetched, json!({"id": "cus-1"}));
    assert_eq!(updated, json!({"name": "Renamed"}));
    assert_eq!(deleted, json!({}));
}

#[tokio::test]
async fn create_posts_to_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/journal"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "je-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let entry: Value = test
        .client
        .journal()
        .create(&json!({"memo": "Opening balance", "lines": []}))
        .await
        .unwrap();

    assert_eq!(entry, json!({"id": "je-1"}));
}

#[tokio::test]
async fn unsafe_ids_are_rejected_before_sending() {
    let server = MockServer::start().await;
    let test = client_for(&server);

    let err = test
        .client
        .accounts()
        .get::<Value>("../admin")
        .await
        .unwrap_err();

    assert!(matches!(err, UrutiError::InvalidArgument(_)), "got {err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn report_query_becomes_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/profit-and-loss"))
        .and(query_param("from", "2024-01-01"))
        .and(query_param("to", "2024-03-31"))
        .and(query_param("companyId", "c1"))
        .and(query_param("compare", "previous"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"revenue": 1000, "expenses": 400, "netIncome": 600}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let query = ReportQuery::period(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .with_company("c1")
    .with_param("compare", "previous");
    let report: Value = test
        .client
        .reports()
        .fetch(ReportKind::ProfitAndLoss, &query)
        .await
        .unwrap();

    assert_eq!(report["netIncome"], 600);
}

#[tokio::test]
async fn balance_sheet_as_of_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/balance-sheet"))
        .and(query_param("asOf", "2024-06-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"assets": 10}})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let query = ReportQuery::as_of(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    let report: Value = test
        .client
        .reports()
        .fetch(ReportKind::BalanceSheet, &query)
        .await
        .unwrap();

    assert_eq!(report, json!({"assets": 10}));
}

#[tokio::test]
async fn list_with_null_data_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": null, "total": 0, "page": 1})),
        )
        .mount(&server)
        .await;

    let test = client_for(&server);
    let page = test.client.invoices().list::<Invoice>(&[]).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, Some(0));
    assert_eq!(page.page, Some(1));
}

#[tokio::test]
async fn list_tolerates_numeric_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "inv-1", "status": "draft"}],
            "error": {"code": 207, "message": "Some rows were skipped"}
        })))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let page = test.client.accounts().list::<Invoice>(&[]).await.unwrap();

    assert_eq!(page.items.len(), 1);
}
