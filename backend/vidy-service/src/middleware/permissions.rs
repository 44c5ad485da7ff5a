/// Ownership checks for videos, tweets, comments and playlists
///
/// Every mutation of an owned entity goes through [`ensure_owner`].
use crate::error::{AppError, Result};
use uuid::Uuid;

/// Check that `user_id` owns the entity owned by `owner_id`
pub fn ensure_owner(owner_id: Uuid, user_id: Uuid, entity: &str) -> Result<()> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You don't have permission to modify this {}",
            entity
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_allowed() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, id, "video").is_ok());
    }

    #[test]
    fn test_non_owner_forbidden() {
        let err = ensure_owner(Uuid::new_v4(), Uuid::new_v4(), "playlist").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.ends_with("this playlist")));
    }
}
