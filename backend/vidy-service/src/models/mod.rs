/// Data models for vidy-service
///
/// Database rows (`FromRow`) stay close to the table layout. Anything sent to
/// clients goes through a `*View` type that embeds the owner summary and the
/// computed counters, serialized camelCase with ids as `_id`.
pub mod comment;
pub mod dashboard;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::*;
pub use dashboard::*;
pub use like::*;
pub use playlist::*;
pub use subscription::*;
pub use tweet::*;
pub use user::*;
pub use video::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Public identity of a content owner, embedded in list items
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

/// `{content}` body shared by tweets and comments
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContentRequest {
    #[validate(length(max = 5000, message = "Content must be at most 5000 characters"))]
    pub content: String,
}

impl ContentRequest {
    /// Trimmed content, rejecting blank input
    pub fn content(&self) -> crate::Result<&str> {
        required(&self.content, "Content is required")
    }
}

/// `page`/`limit` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalised pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl From<&PageQuery> for Page {
    fn from(query: &PageQuery) -> Self {
        Page::new(query.page, query.limit)
    }
}

/// Trim a required text field, 400 when it is blank
pub fn required<'a>(value: &'a str, message: &str) -> crate::Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::AppError::BadRequest(message.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None);
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_clamps_out_of_range_values() {
        let page = Page::new(Some(0), Some(10_000));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);

        let page = Page::new(Some(3), Some(-5));
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset(), 2);
    }

    #[test]
    fn test_blank_content_rejected() {
        let req = ContentRequest {
            content: "   ".to_string(),
        };
        assert!(req.content().is_err());

        let req = ContentRequest {
            content: "  hello ".to_string(),
        };
        assert_eq!(req.content().expect("content"), "hello");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_oversized_content_fails_validation() {
        let req = ContentRequest {
            content: "x".repeat(5001),
        };
        assert!(req.validate().is_err());
    }
}
