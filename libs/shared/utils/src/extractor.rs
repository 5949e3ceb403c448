use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use shared_models::AppError;

/// Request body parsed as a JSON object. Fields are validated by the handler so
/// every bad field can be reported at once. An empty body reads as `{}`.
#[derive(Debug, Clone, Default)]
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonObject(Map::new()));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonObject(map)),
            Ok(_) => Err(AppError::BadRequest("Expected a JSON object.".to_string())),
            Err(e) => Err(AppError::BadRequest(format!("JSON parse error - {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn extract(body: &'static str) -> Result<JsonObject, AppError> {
        let req = axum::http::Request::builder().body(Body::from(body)).unwrap();
        JsonObject::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_object_body() {
        let JsonObject(map) = extract(r#"{"Reason": "Checkup"}"#).await.unwrap();
        assert_eq!(map.get("Reason"), Some(&json!("Checkup")));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let JsonObject(map) = extract("  ").await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_rejected() {
        assert!(matches!(extract("[1, 2]").await, Err(AppError::BadRequest(_))));
        assert!(matches!(extract("{not json").await, Err(AppError::BadRequest(_))));
    }
}
