use super::{a_record, zone};
use crate::api::{Cursor, DnsApiClient, LegacyClient};
use crate::error::DdnsError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LegacyClient {
    LegacyClient::new(
        "test_key",
        "user@example.com",
        "example.com",
        Some(&format!("{}/api_json.html", server.uri())),
    )
}

fn rec_load_all(has_more: bool, objs: serde_json::Value) -> serde_json::Value {
    let count = objs.as_array().map_or(0, |a| a.len());
    json!({
        "request": { "act": "rec_load_all" },
        "response": { "recs": { "has_more": has_more, "count": count, "objs": objs } },
        "result": "success",
        "msg": null
    })
}

#[tokio::test]
async fn test_zone_is_the_configured_domain() {
    // Nothing is mounted: listing zones must not touch the network.
    let server = MockServer::start().await;
    let client = client_for(&server);

    let page = client.list_zones(client.first_page()).await.unwrap();

    assert_eq!(page.items, vec![zone("example.com", "example.com")]);
    assert_eq!(page.next, None);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_rec_load_all_pages_by_offset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api_json.html"))
        .and(body_string_contains("a=rec_load_all"))
        .and(body_string_contains("tkn=test_key"))
        .and(body_string_contains("email=user%40example.com"))
        .and(body_string_contains("z=example.com"))
        .and(body_string_contains("&o=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rec_load_all(
            true,
            json!([
                { "rec_id": "1", "name": "www.example.com", "display_name": "www", "type": "A",
                  "content": "203.0.113.1", "ttl": "1", "service_mode": "0" },
                { "rec_id": "2", "name": "home.example.com", "display_name": "home", "type": "A",
                  "content": "203.0.113.9", "ttl": "120", "service_mode": "1" }
            ]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .list_records(&zone("example.com", "example.com"), Cursor::Offset(0))
        .await
        .unwrap();

    assert_eq!(page.next, Some(Cursor::Offset(2)));
    assert_eq!(page.items.len(), 2);

    let home = &page.items[1];
    assert_eq!(home.id, "2");
    assert_eq!(home.name, "home.example.com");
    assert_eq!(home.ttl, Some(120));
    assert_eq!(home.proxied, Some(true));
    assert_eq!(page.items[0].proxied, Some(false));
}

#[tokio::test]
async fn test_rec_load_all_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("&o=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rec_load_all(
            false,
            json!([{ "rec_id": "3", "name": "example.com", "type": "A",
                     "content": "203.0.113.3", "ttl": 300 }]),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .list_records(&zone("example.com", "example.com"), Cursor::Offset(2))
        .await
        .unwrap();

    assert_eq!(page.next, None);
    assert_eq!(page.items[0].ttl, Some(300));
    assert_eq!(page.items[0].proxied, None);
}

#[tokio::test]
async fn test_rec_load_all_error_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "msg": "Invalid zone.",
            "err_code": "E_UNAUTH"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .list_records(&zone("example.com", "example.com"), Cursor::Offset(0))
        .await;

    assert!(matches!(result, Err(DdnsError::Provider(msg)) if msg.contains("Invalid zone.")));
}

#[tokio::test]
async fn test_rec_edit_sends_record_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("a=rec_edit"))
        .and(body_string_contains("z=example.com"))
        .and(body_string_contains("id=2"))
        .and(body_string_contains("type=A"))
        .and(body_string_contains("name=home.example.com"))
        .and(body_string_contains("content=203.0.113.5"))
        .and(body_string_contains("ttl=120"))
        .and(body_string_contains("service_mode=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": { "act": "rec_edit" },
            "response": { "rec": { "obj": { "rec_id": "2" } } },
            "result": "success",
            "msg": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut record = a_record("2", "home.example.com", "203.0.113.5");
    record.ttl = Some(120);
    record.proxied = Some(true);

    let client = client_for(&server);
    client
        .update_record(&zone("example.com", "example.com"), &record)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rec_edit_error_result_fails_update() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "msg": "Invalid record id."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .update_record(
            &zone("example.com", "example.com"),
            &a_record("2", "home.example.com", "203.0.113.5"),
        )
        .await;

    assert!(matches!(result, Err(DdnsError::UpdateFailed(_))));
}

#[tokio::test]
async fn test_rec_edit_unparseable_response_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .update_record(
            &zone("example.com", "example.com"),
            &a_record("2", "home.example.com", "203.0.113.5"),
        )
        .await;

    assert!(matches!(result, Err(DdnsError::Provider(_))));
}

#[tokio::test]
async fn test_legacy_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .list_records(&zone("example.com", "example.com"), Cursor::Offset(0))
        .await;

    assert!(matches!(
        result,
        Err(DdnsError::UnexpectedStatusCode { status: 500, .. })
    ));
}

#[test]
fn test_legacy_accepts_bare_subdomain() {
    let client = LegacyClient::new("k", "e", "example.com", None);
    assert!(client.accepts_bare_subdomain());
    assert_eq!(client.first_page(), Cursor::Offset(0));
}
