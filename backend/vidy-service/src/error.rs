/// Error types for Vidy Service
///
/// Every failure leaves the service through [`AppError`], which renders the
/// same JSON envelope the success path uses (`statusCode`, `data`, `message`,
/// `success`) plus an `errors` array.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

/// Result type for vidy-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    #[error("Too many requests, slow down")]
    TooManyRequests,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub data: Option<()>,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl AppError {
    /// Message safe to show to API clients. Server-side failures are logged
    /// in full and replaced with a generic message.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let errors = match self {
            AppError::Validation(detail) => detail.split("; ").map(str::to_owned).collect(),
            _ => Vec::new(),
        };

        HttpResponse::build(status).json(ErrorBody {
            status_code: status.as_u16(),
            data: None,
            message: self.public_message(),
            success: false,
            errors,
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::NotFound("Referenced resource not found".to_string());
            }
        }
        AppError::Database(err.to_string())
    }
}

impl From<media_store::MediaError> for AppError {
    fn from(err: media_store::MediaError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
            _ => AppError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let resp = err.error_response();
        let bytes = to_bytes(resp.into_body()).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_envelope_shape() {
        let json = body_json(AppError::NotFound("Video not found".into())).await;
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Video not found");
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["errors"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_server_errors_hide_details() {
        let json = body_json(AppError::Database("relation \"users\" does not exist".into())).await;
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "Something went wrong");
    }

    #[actix_web::test]
    async fn test_validation_errors_are_listed() {
        let json = body_json(AppError::Validation("email is invalid; password is too short".into())).await;
        assert_eq!(json["errors"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_expired_jwt_maps_to_unauthorized() {
        let err: AppError =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::ExpiredSignature)
                .into();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token expired"));
    }
}
