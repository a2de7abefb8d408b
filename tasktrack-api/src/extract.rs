/// Request extractors
///
/// [`ValidatedJson`] replaces `axum::Json` for every write endpoint: body
/// rejections come back in the standard error envelope instead of plain
/// text, and field rules run before the handler sees the payload.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tasktrack_shared::validation::collect_violations;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed its `validator` rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
            })?;

        value
            .validate()
            .map_err(|errors| ApiError::ValidationError(collect_violations(&errors)))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[serde(default)]
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(request(r#"{"title":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.title, "x");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_a_violation() {
        let err = ValidatedJson::<Payload>::from_request(request("{}"), &())
            .await
            .unwrap_err();

        match err {
            ApiError::ValidationError(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "title");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(request("{not json"), &())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();

        let err = ValidatedJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
