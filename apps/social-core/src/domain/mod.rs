//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Identifiers, timestamps, vote targets
//! - **Entities**: Votes, subscriptions, profiles
//! - **Domain Services**: The vote ledger and the authorship guard
//! - **Errors**: The error taxonomy surfaced by the core
//!
//! # Bounded Contexts
//!
//! - [`voting`]: Vote lifecycle on posts and comments (add, flip, toggle-off)
//! - [`social`]: Profiles and subscriber -> publisher edges

pub mod errors;
pub mod shared;
pub mod social;
pub mod voting;
