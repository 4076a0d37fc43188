use aliyun_mapper_ext::ConversionError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error(transparent)]
    FromIo(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::Conversion(err) => err.kind(),
        }
    }
}

/// Every failure is reported as a client error, the body telling which kind of error occurred
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_message = self.to_string();
        let kind = self.kind();

        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error_message, "kind": kind })),
        )
            .into_response()
    }
}
