//! Authorize Change Use Case
//!
//! Guard run before a post or comment is edited or deleted.

use std::sync::Arc;

use crate::application::ports::TargetRepository;
use crate::domain::errors::CoreError;
use crate::domain::shared::ProfileId;
use crate::domain::voting::{Target, VoteTarget, ensure_author};

/// Use case enforcing that only the author may change their content.
pub struct AuthorshipUseCase<R: TargetRepository> {
    targets: Arc<R>,
}

impl<R: TargetRepository> AuthorshipUseCase<R> {
    /// Create a new AuthorshipUseCase.
    pub fn new(targets: Arc<R>) -> Self {
        Self { targets }
    }

    /// Load `target` and check that `user_id` wrote it.
    ///
    /// Returns the loaded target so the caller can go on to change it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::TargetNotFound`] if the target does not exist.
    /// - [`CoreError::NotAuthor`] if `user_id` is not the author.
    /// - [`CoreError::Repository`] on storage failure.
    pub async fn authorize_change(
        &self,
        target: &VoteTarget,
        user_id: &ProfileId,
    ) -> Result<Target, CoreError> {
        let loaded = self
            .targets
            .get_by_id(target)
            .await?
            .ok_or_else(|| CoreError::TargetNotFound {
                kind: target.kind,
                target_id: target.id.clone(),
            })?;

        if let Err(e) = ensure_author(&loaded, user_id) {
            tracing::warn!(
                vote_target = %target,
                user_id = %user_id,
                "Change rejected for non-author"
            );
            return Err(e);
        }

        Ok(loaded)
    }
}
