//! Profile reference.

use serde::{Deserialize, Serialize};

use crate::domain::shared::ProfileId;

/// A user profile as seen by the core.
///
/// Profiles are owned elsewhere; the core only reads them to address
/// notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    /// Profile identifier.
    pub id: ProfileId,
    /// Display name.
    pub user_name: String,
}

impl Profile {
    /// Create a profile reference.
    #[must_use]
    pub fn new(id: impl Into<ProfileId>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
        }
    }
}
