mod support;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uruti::auth::StorageKey;
use uruti::client::ApiRequest;
use uruti::config::ClientConfig;
use uruti::error::UrutiError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{client_for, logged_in_client};

#[tokio::test]
async fn bearer_token_is_sent_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let test = logged_in_client(&server, "abc", None);
    let accounts: Value = test.client.get("/accounts").await.unwrap();

    assert_eq!(accounts, json!([]));
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let _: Value = test.client.get("/health").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[0].headers["x-tenant-id"], "demo-tenant");
    assert_eq!(requests[0].headers["x-company-id"], "demo-company");
    assert_eq!(requests[0].headers["content-type"], "application/json");
}

#[tokio::test]
async fn stored_tenant_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(header("x-tenant-id", "t-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    test.seed(StorageKey::TenantId, "t-9");

    let _: Value = test.client.get("/customers").await.unwrap();
}

#[tokio::test]
async fn company_header_tracks_store_between_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let test = client_for(&server);
    test.seed(StorageKey::CompanyId, "c1");
    let _: Value = test.client.get("/invoices").await.unwrap();
    test.client.session().set_company("c2").unwrap();
    let _: Value = test.client.get("/invoices").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].headers["x-company-id"], "c1");
    assert_eq!(requests[1].headers["x-company-id"], "c2");
}

#[tokio::test]
async fn legacy_company_key_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .and(header("x-company-id", "legacy-co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    test.seed(StorageKey::LegacyCompanyId, "legacy-co");

    let _: Value = test.client.get("/vendors").await.unwrap();
}

#[tokio::test]
async fn wrapped_data_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices/inv-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "inv-1", "total": 120}})),
        )
        .mount(&server)
        .await;

    let test = client_for(&server);
    let invoice: Value = test.client.get("/invoices/inv-1").await.unwrap();

    assert_eq!(invoice, json!({"id": "inv-1", "total": 120}));
}

#[tokio::test]
async fn bare_body_is_returned_whole() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"currency": "RWF"})))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let settings: Value = test.client.get("/settings").await.unwrap();

    assert_eq!(settings, json!({"currency": "RWF"}));
}

#[tokio::test]
async fn null_data_returns_whole_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null, "total": 0})))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let body: Value = test.client.get("/reports/empty").await.unwrap();

    assert_eq!(body, json!({"data": null, "total": 0}));
}

#[tokio::test]
async fn no_content_yields_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/journal/je-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let body: Value = test.client.delete("/journal/je-1").await.unwrap();

    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn malformed_json_yields_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,total\ninv-1,120"))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let body: Value = test.client.get("/export").await.unwrap();

    assert_eq!(body, Value::String("id,total\ninv-1,120".to_string()));
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(body_json(json!({"name": "Kigali Traders"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "cus-1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let created: Value = test
        .client
        .post("/customers", &json!({"name": "Kigali Traders"}))
        .await
        .unwrap();

    assert_eq!(created, json!({"id": "cus-1"}));
}

#[tokio::test]
async fn patch_and_query_parameters_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/invoices/inv-1"))
        .and(query_param("companyId", "c1"))
        .and(body_json(json!({"status": "sent"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "sent"}})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let request = ApiRequest::patch("/invoices/inv-1")
        .with_query("companyId", "c1")
        .with_body(json!({"status": "sent"}));
    let response: Value = test.client.send(request).await.unwrap();

    assert_eq!(response, json!({"status": "sent"}));
}

#[tokio::test]
async fn extra_headers_override_company() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header("x-company-id", "override-co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let test = client_for(&server);
    let request = ApiRequest::get("/accounts")
        .with_header("x-company-id", "override-co")
        .unwrap();
    let _: Value = test.client.send(request).await.unwrap();
}

#[tokio::test]
async fn nested_error_message_wins() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/journal"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "m1", "details": {"field": "lines"}},
            "message": "m2"
        })))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let err = test
        .client
        .post::<Value, _>("/journal", &json!({}))
        .await
        .unwrap_err();

    match err {
        UrutiError::Api {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "m1");
            assert_eq!(details, Some(json!({"field": "lines"})));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn top_level_message_is_used_without_nested_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bank-accounts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "m2"})))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let err = test.client.get::<Value>("/bank-accounts").await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("m2"), "unexpected message: {err}");
}

#[tokio::test]
async fn plain_text_error_body_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let err = test.client.get::<Value>("/accounts").await.unwrap_err();

    match err {
        UrutiError::Api { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "oops");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let test = client_for(&server);
    let err = test.client.get::<Value>("/accounts").await.unwrap_err();

    match err {
        UrutiError::Api { status, message, .. } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Request failed with status 502");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let test = support::client_with_config(ClientConfig::new("http://127.0.0.1:1"));

    let err = test.client.get::<Value>("/accounts").await.unwrap_err();

    assert!(matches!(err, UrutiError::Network(_)), "got {err:?}");
}
