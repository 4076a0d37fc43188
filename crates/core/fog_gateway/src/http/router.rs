use crate::http::error::ApiError;
use aliyun_mapper_ext::DeviceIdentity;
use aliyun_mapper_ext::UplinkConverter;
use aliyun_mapper_ext::UplinkRequest;
use aliyun_mapper_ext::UplinkResponse;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use tracing::warn;

#[derive(Clone)]
struct GatewayState {
    converter: Arc<UplinkConverter>,
}

/// The body of an uplink translation request.
///
/// Missing fields are read as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct UplinkBody {
    #[serde(default)]
    pub raw_topic: String,
    #[serde(default)]
    pub raw_payload: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub product_key: String,
    #[serde(default)]
    pub device_id: String,
    /// `<device_name>&<product_key>`, used when the product key or device name is missing
    #[serde(default)]
    pub username: Option<String>,
}

impl TryFrom<UplinkBody> for UplinkRequest {
    type Error = ApiError;

    fn try_from(body: UplinkBody) -> Result<Self, Self::Error> {
        let identity =
            DeviceIdentity::resolve(&body.product_key, &body.device_name, body.username.as_deref())?;
        Ok(UplinkRequest {
            product_key: identity.product_key,
            device_name: identity.device_name,
            device_id: body.device_id,
            raw_topic: body.raw_topic,
            raw_payload: body.raw_payload,
        })
    }
}

pub fn gateway_router(converter: Arc<UplinkConverter>, uplink_path: &str) -> Router {
    Router::new()
        .route(uplink_path, post(translate_uplink))
        .route("/health", get(health))
        .with_state(GatewayState { converter })
}

async fn translate_uplink(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<UplinkResponse>, ApiError> {
    let body: UplinkBody = serde_json::from_slice(&body)?;
    let request = UplinkRequest::try_from(body)?;

    match state.converter.convert(&request) {
        Ok(response) => {
            debug!("Translated {} into {}", request.raw_topic, response.topic);
            Ok(Json(response))
        }
        Err(err) => {
            warn!("Failed to translate {:?}: {err}", request.raw_topic);
            Err(err.into())
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "up" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use axum::body::Body;
    use axum::http::Method;
    use axum::http::Request;
    use axum::http::StatusCode;
    use base64::prelude::*;
    use http_body_util::BodyExt as _;
    use test_case::test_case;
    use tower::Service;

    fn app() -> Router {
        gateway_router(Arc::new(UplinkConverter::default()), "/uplink")
    }

    fn uplink_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/uplink")
            .body(body.into())
            .expect("request builder")
    }

    async fn send(body: Value) -> (StatusCode, Value) {
        send_raw(body.to_string()).await
    }

    async fn send_raw(body: String) -> (StatusCode, Value) {
        let mut app = app();
        let response = app.call(uplink_request(body)).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn decode_fog_payload(response: &Value) -> Value {
        let encoded = response["fog_payload"].as_str().unwrap();
        let json = BASE64_STANDARD.decode(encoded).unwrap();
        serde_json::from_slice(&json).unwrap()
    }

    #[tokio::test]
    async fn translate_property_post() {
        let (status, response) = send(json!({
            "raw_topic": "/sys/PK/DN/thing/event/property/post",
            "raw_payload": r#"{"id":"1","version":"1.0","params":{"temperature":21.5},"method":"thing.event.property.post"}"#,
            "device_name": "DN",
            "product_key": "PK",
            "device_id": "device-0001"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response["fog_topic"],
            json!("fogcloud/PK/DN/thing/up/property/post")
        );
        let payload = decode_fog_payload(&response);
        assert_eq!(payload["id"], json!(0));
        assert_eq!(payload["version"], json!("1.0"));
        assert_json_eq!(payload["params"], json!({ "temperature": 21.5 }));
    }

    #[tokio::test]
    async fn translate_event_post_using_the_username() {
        let (status, response) = send(json!({
            "raw_topic": "/sys/PK/DN/thing/event/temperature/post",
            "raw_payload": r#"{"id":"2","version":"1.0","params":{"value":30}}"#,
            "username": "DN&PK"
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response["fog_topic"],
            json!("fogcloud/PK/DN/thing/up/event/temperature/post")
        );
    }

    #[test_case(
        json!({ "raw_topic": "", "raw_payload": "{}", "product_key": "PK", "device_name": "DN" }),
        "EmptyInput"
        ; "empty topic"
    )]
    #[test_case(
        json!({ "raw_topic": "/sys/PK/DN/thing/event/property/post", "product_key": "PK", "device_name": "DN" }),
        "EmptyInput"
        ; "missing payload"
    )]
    #[test_case(
        json!({ "raw_topic": "/sys/PK/DN/thing/service/property/set", "raw_payload": "{}", "username": "DN&PK" }),
        "InvalidTopic"
        ; "unmatched topic"
    )]
    #[test_case(
        json!({ "raw_topic": "fogcloud/PK/DN/thing/up/service/reboot/reply", "raw_payload": "{}", "username": "DN&PK" }),
        "UnsupportedPattern"
        ; "service reply"
    )]
    #[test_case(
        json!({ "raw_topic": "/sys/PK/DN/thing/event/property/post", "raw_payload": "{}", "username": "DN" }),
        "InvalidUsername"
        ; "invalid username"
    )]
    #[test_case(
        json!({ "raw_topic": "/sys/PK/DN/thing/event/property/post", "raw_payload": "{}" }),
        "MissingIdentity"
        ; "missing identity"
    )]
    #[test_case(
        json!({ "raw_topic": "/sys/PK/DN/thing/event/property/post", "raw_payload": "{}", "product_key": "PK" }),
        "MissingIdentity"
        ; "missing device name"
    )]
    #[tokio::test]
    async fn translation_failures_are_bad_requests(body: Value, kind: &str) {
        let (status, response) = send(body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["kind"], json!(kind));
        assert!(response["error"].is_string());
    }

    #[tokio::test]
    async fn invalid_json_body_is_a_bad_request() {
        let (status, response) = send_raw("not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["kind"], json!("InvalidRequest"));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let mut app = app();
        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .expect("request builder");

        let response = app.call(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_json_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({ "status": "up" })
        );
    }
}
