//! Authorship guard for edit and delete operations.

use super::target::Target;
use crate::domain::errors::CoreError;
use crate::domain::shared::ProfileId;

/// Only the author of a post or comment may change it.
///
/// # Errors
///
/// Returns [`CoreError::NotAuthor`] if `user_id` did not write `target`.
pub fn ensure_author(target: &Target, user_id: &ProfileId) -> Result<(), CoreError> {
    if &target.author_id == user_id {
        return Ok(());
    }
    Err(CoreError::NotAuthor {
        user_id: user_id.clone(),
        target_id: target.id().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voting::VoteTarget;

    #[test]
    fn author_passes() {
        let target = Target::new(VoteTarget::comment("c-1"), ProfileId::new("bob"));
        assert!(ensure_author(&target, &ProfileId::new("bob")).is_ok());
    }

    #[test]
    fn other_user_is_rejected() {
        let target = Target::new(VoteTarget::comment("c-1"), ProfileId::new("bob"));
        let err = ensure_author(&target, &ProfileId::new("mallory")).unwrap_err();
        assert!(matches!(err, CoreError::NotAuthor { .. }));
    }
}
