//! Use Cases
//!
//! Driver-side entry points. Each use case is generic over the ports it
//! needs and holds them as `Arc`s.

mod announce_comment;
mod apply_vote;
mod authorize_change;

pub use announce_comment::{CommentNotificationUseCase, comment_message};
pub use apply_vote::{VotingPolicy, VotingUseCase};
pub use authorize_change::AuthorshipUseCase;
