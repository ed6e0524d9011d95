//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for storage and notification delivery
//! - **Services**: The subscription registry and notification dispatcher
//! - **Use Cases**: Voting, comment announcements, authorship checks

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
