/// Uniform success envelope returned by every handler
use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    /// 200 OK
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        Self::new(StatusCode::OK, data, message).respond()
    }

    /// 201 Created
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        Self::new(StatusCode::CREATED, data, message).respond()
    }

    pub fn respond(self) -> HttpResponse {
        self.builder().json(self)
    }

    /// Builder preloaded with this envelope's status, for attaching cookies
    pub fn builder(&self) -> HttpResponseBuilder {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK),
        )
    }
}
