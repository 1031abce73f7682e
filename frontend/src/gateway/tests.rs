use super::*;
use crate::error::FailureKind;
use crate::request::MockTransport;
use crate::storage::MemoryStorage;
use crate::testing::auth_response;
use sensorwatch_shared::protocol::{ListSensorsRequest, LogoutRequest};
use sensorwatch_shared::{LoginCredentials, Sensor};
use serde_json::json;
use std::rc::Rc;

const BASE: &str = "https://api.example.com";

// =========================================================
// 辅助函数
// =========================================================

fn setup(token: Option<&str>) -> (Rc<MockTransport>, AuthenticatedGateway<Rc<MockTransport>>) {
    let session = SessionStore::init(MemoryStorage::new(), "token");
    if token.is_some() {
        session.set_auth(&auth_response(token, 1));
    }
    let transport = Rc::new(MockTransport::new());
    let config = ClientConfig::default().with_base_url(BASE);
    let gateway = AuthenticatedGateway::new(&config, session, transport.clone());
    (transport, gateway)
}

fn get(path: &str) -> RequestDescriptor {
    RequestDescriptor {
        method: HttpMethod::Get,
        path: path.to_string(),
        body: None,
        authenticated: true,
    }
}

// =========================================================
// 凭据附加
// =========================================================

#[tokio::test]
async fn attaches_bearer_token_when_authenticated() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_response(HttpMethod::Get, &format!("{BASE}/sensors"), 200, json!([]));

    gateway
        .perform(get("/sensors"), &CancellationToken::new())
        .await
        .unwrap();

    let req = transport.last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn omits_header_when_anonymous() {
    let (transport, gateway) = setup(None);
    transport.mock_response(HttpMethod::Get, &format!("{BASE}/sensors"), 200, json!([]));

    gateway
        .perform(get("/sensors"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(transport.last_request().unwrap().header("Authorization").is_none());
}

#[tokio::test]
async fn reads_token_at_call_time() {
    let (transport, gateway) = setup(None);
    transport.mock_response(HttpMethod::Get, &format!("{BASE}/sensors"), 200, json!([]));

    gateway.session().set_auth(&auth_response(Some("fresh"), 1));
    gateway
        .perform(get("/sensors"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer fresh")
    );
}

#[tokio::test]
async fn login_never_carries_credential() {
    let (transport, gateway) = setup(Some("stale"));
    transport.mock_response(
        HttpMethod::Post,
        &format!("{BASE}/auth/login"),
        200,
        crate::testing::auth_json(Some("new"), 1),
    );

    let creds = LoginCredentials {
        email: "a@b.c".into(),
        password: "pw".into(),
    };
    let resp = send(&gateway, &creds, &CancellationToken::new()).await.unwrap();

    assert_eq!(resp.data.token.as_deref(), Some("new"));
    let req = transport.last_request().unwrap();
    assert!(req.header("Authorization").is_none());
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(req.body.as_deref().unwrap()).unwrap(),
        json!({ "email": "a@b.c", "password": "pw" })
    );
}

// =========================================================
// 失败归一化
// =========================================================

#[tokio::test]
async fn transport_error_has_no_status() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_failure(HttpMethod::Get, &format!("{BASE}/sensors"), "connection refused");

    let err = gateway
        .perform(get("/sensors"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Transport);
    assert_eq!(err.status, None);
    assert!(err.message.contains("connection refused"));
}

#[tokio::test]
async fn non_2xx_is_rejected_with_server_message() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_response(
        HttpMethod::Get,
        &format!("{BASE}/sensors"),
        401,
        json!({ "message": "Token expired" }),
    );

    let err = gateway
        .perform(get("/sensors"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "Token expired");
    assert!(err.is_unauthorized());
}

#[test]
fn rejection_message_fallbacks() {
    assert_eq!(
        rejection_message(400, r#"{"message":["name is required","id is required"]}"#),
        "name is required, id is required"
    );
    assert_eq!(rejection_message(403, r#"{"error":"Forbidden"}"#), "Forbidden");
    assert_eq!(
        rejection_message(502, "<html>Bad Gateway</html>"),
        "request failed with status 502"
    );
}

#[tokio::test]
async fn malformed_body_is_decode_failure() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_raw(HttpMethod::Get, &format!("{BASE}/sensors"), 200, "{ not json");

    let err = send(&gateway, &ListSensorsRequest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
    assert_eq!(err.status, Some(200));
    assert_eq!(err.spans()[0].operation, "gateway.decode");
}

#[tokio::test]
async fn empty_body_decodes_for_unit_like_responses() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_raw(HttpMethod::Post, &format!("{BASE}/auth/logout"), 204, "");

    let resp = send(&gateway, &LogoutRequest::default(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(resp.status, 204);
}

#[tokio::test]
async fn typed_send_returns_status_and_data() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_response(
        HttpMethod::Get,
        &format!("{BASE}/sensors"),
        200,
        json!([{ "id": "s1", "name": "Greenhouse" }]),
    );

    let resp = send(&gateway, &ListSensorsRequest, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    let sensors: &Vec<Sensor> = &resp.data;
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0].name, "Greenhouse");
    assert!(transport.last_request().unwrap().body.is_none());
}

// =========================================================
// URL 解析
// =========================================================

#[tokio::test]
async fn absolute_cursor_is_used_verbatim() {
    let (transport, gateway) = setup(Some("abc"));
    let cursor = "https://cdn.example.com/alerts/s1/alerts?cursor=c2&page_size=3";
    transport.mock_response(HttpMethod::Get, cursor, 200, json!({}));

    gateway
        .perform(get(cursor), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(transport.last_request().unwrap().url, cursor);
}

#[tokio::test]
async fn credential_stays_on_api_origin() {
    let (transport, gateway) = setup(Some("abc"));
    let same = format!("{BASE}/alerts/s1/alerts?cursor=c2");
    let foreign = "https://cdn.example.com/alerts/s1/alerts?cursor=c2";
    let lookalike = "https://api.example.com.evil.test/alerts?cursor=c2";
    for url in [same.as_str(), foreign, lookalike] {
        transport.mock_response(HttpMethod::Get, url, 200, json!({}));
    }

    let cancel = CancellationToken::new();
    gateway.perform(get(&same), &cancel).await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().header("Authorization"),
        Some("Bearer abc")
    );

    for url in [foreign, lookalike] {
        gateway.perform(get(url), &cancel).await.unwrap();
        assert_eq!(transport.last_request().unwrap().header("Authorization"), None);
    }
}

#[tokio::test]
async fn relative_path_without_slash() {
    let (transport, gateway) = setup(None);
    transport.mock_response(HttpMethod::Get, &format!("{BASE}/sensors"), 200, json!([]));

    gateway
        .perform(get("sensors"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(transport.last_request().unwrap().url, format!("{BASE}/sensors"));
}

// =========================================================
// 取消
// =========================================================

#[tokio::test]
async fn cancelled_token_skips_network() {
    let (transport, gateway) = setup(Some("abc"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = gateway.perform(get("/sensors"), &cancel).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Cancelled);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn cancelling_in_flight_request_stops_waiting() {
    let (transport, gateway) = setup(Some("abc"));
    transport.mock_hang(HttpMethod::Get, &format!("{BASE}/sensors"));
    let cancel = CancellationToken::new();

    let (result, _) = futures::join!(gateway.perform(get("/sensors"), &cancel), async {
        cancel.cancel();
    });

    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
    assert_eq!(transport.request_count(), 1);
}
