//! Announce Comment Use Case
//!
//! Tells a post author's subscribers that the post received a new comment.

use std::sync::Arc;

use crate::application::ports::{AuthorNotifier, DispatchReport, ProfileRepository, TargetRepository};
use crate::domain::errors::CoreError;
use crate::domain::shared::TargetId;
use crate::domain::voting::{TargetKind, VoteTarget};

/// Message announcing `comment_id` on `post_id`.
#[must_use]
pub fn comment_message(post_id: &TargetId, comment_id: &TargetId) -> String {
    format!("New comment ({comment_id}) on your post ({post_id})")
}

/// Use case for new-comment notifications.
pub struct CommentNotificationUseCase<R, P, N>
where
    R: TargetRepository,
    P: ProfileRepository,
    N: AuthorNotifier,
{
    targets: Arc<R>,
    profiles: Arc<P>,
    notifier: Arc<N>,
}

impl<R, P, N> CommentNotificationUseCase<R, P, N>
where
    R: TargetRepository,
    P: ProfileRepository,
    N: AuthorNotifier,
{
    /// Create a new CommentNotificationUseCase.
    pub fn new(targets: Arc<R>, profiles: Arc<P>, notifier: Arc<N>) -> Self {
        Self {
            targets,
            profiles,
            notifier,
        }
    }

    /// Notify the subscribers of `post_id`'s author about `comment_id`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::TargetNotFound`] if the post does not exist.
    /// - [`CoreError::ProfileNotFound`] if the post's author has no profile.
    /// - [`CoreError::Repository`] on storage failure.
    pub async fn announce_comment(
        &self,
        post_id: &TargetId,
        comment_id: &TargetId,
    ) -> Result<DispatchReport, CoreError> {
        let post = self
            .targets
            .get_by_id(&VoteTarget::post(post_id.clone()))
            .await?
            .ok_or_else(|| CoreError::TargetNotFound {
                kind: TargetKind::Post,
                target_id: post_id.clone(),
            })?;

        let author = self
            .profiles
            .get_by_id(&post.author_id)
            .await?
            .ok_or_else(|| CoreError::ProfileNotFound {
                profile_id: post.author_id.clone(),
            })?;

        let report = self
            .notifier
            .notify(&author, &comment_message(post_id, comment_id))
            .await;

        tracing::info!(
            post_id = %post_id,
            comment_id = %comment_id,
            delivered = report.delivered,
            failed = report.failed,
            "Comment announced"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAuthorNotifier, MockProfileRepository, MockTargetRepository};
    use crate::domain::shared::ProfileId;
    use crate::domain::social::Profile;
    use crate::domain::voting::Target;

    #[test]
    fn message_names_comment_and_post() {
        assert_eq!(
            comment_message(&TargetId::new("p-1"), &TargetId::new("c-9")),
            "New comment (c-9) on your post (p-1)"
        );
    }

    #[tokio::test]
    async fn notifies_post_author_subscribers() {
        let mut targets = MockTargetRepository::new();
        targets
            .expect_get_by_id()
            .withf(|t| *t == VoteTarget::post("p-1"))
            .returning(|t| Ok(Some(Target::new(t.clone(), ProfileId::new("bob")))));
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_get_by_id()
            .returning(|id| Ok(Some(Profile::new(id.clone(), "Bob"))));
        let mut notifier = MockAuthorNotifier::new();
        notifier
            .expect_notify()
            .withf(|author, message| {
                author.id.as_str() == "bob" && message == "New comment (c-9) on your post (p-1)"
            })
            .times(1)
            .returning(|_, _| DispatchReport {
                attempted: 2,
                delivered: 2,
                failed: 0,
            });
        let use_case =
            CommentNotificationUseCase::new(Arc::new(targets), Arc::new(profiles), Arc::new(notifier));

        let report = use_case
            .announce_comment(&TargetId::new("p-1"), &TargetId::new("c-9"))
            .await
            .unwrap();

        assert_eq!(report.delivered, 2);
    }

    #[tokio::test]
    async fn missing_post_is_target_not_found() {
        let mut targets = MockTargetRepository::new();
        targets.expect_get_by_id().returning(|_| Ok(None));
        let mut notifier = MockAuthorNotifier::new();
        notifier.expect_notify().never();
        let use_case = CommentNotificationUseCase::new(
            Arc::new(targets),
            Arc::new(MockProfileRepository::new()),
            Arc::new(notifier),
        );

        let err = use_case
            .announce_comment(&TargetId::new("gone"), &TargetId::new("c-1"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_author_is_profile_not_found() {
        let mut targets = MockTargetRepository::new();
        targets
            .expect_get_by_id()
            .returning(|t| Ok(Some(Target::new(t.clone(), ProfileId::new("bob")))));
        let mut profiles = MockProfileRepository::new();
        profiles.expect_get_by_id().returning(|_| Ok(None));
        let mut notifier = MockAuthorNotifier::new();
        notifier.expect_notify().never();
        let use_case =
            CommentNotificationUseCase::new(Arc::new(targets), Arc::new(profiles), Arc::new(notifier));

        let err = use_case
            .announce_comment(&TargetId::new("p-1"), &TargetId::new("c-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ProfileNotFound { .. }));
    }
}
