//! Profile Repository Port (Driven Port)

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::ProfileId;
use crate::domain::social::Profile;

/// Port for reading profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load a profile by id.
    async fn get_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
}
