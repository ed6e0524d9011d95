//! Social Bounded Context
//!
//! Profiles and the directed subscriber -> publisher edges used to route
//! notifications and build personalized feeds.

mod profile;
mod subscription;

pub use profile::Profile;
pub use subscription::Subscription;
