/// HTTP handlers for vidy-service
///
/// One module per resource. Handlers extract and validate input, call a
/// repository or service, and wrap the result in [`ApiResponse`].
///
/// [`ApiResponse`]: crate::response::ApiResponse
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod upload;
pub mod users;
pub mod videos;

use crate::error::{AppError, Result};
use uuid::Uuid;

/// Parse a path identifier, 400 with `Invalid <what> ID` otherwise
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {} ID", what)))
}
