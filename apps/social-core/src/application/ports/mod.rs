//! Application Ports (Driven)
//!
//! Ports define how the core reaches storage and the real-time layer.
//! Implementations live in the infrastructure layer.

mod notification_transport_port;
mod notifier_port;
mod profile_repository_port;
mod subscription_store_port;
mod target_repository_port;

pub use notification_transport_port::{NotificationTransport, TransportError};
pub use notifier_port::{AuthorNotifier, DispatchReport};
pub use profile_repository_port::ProfileRepository;
pub use subscription_store_port::SubscriptionStore;
pub use target_repository_port::TargetRepository;

#[cfg(test)]
pub use notification_transport_port::MockNotificationTransport;
#[cfg(test)]
pub use notifier_port::MockAuthorNotifier;
#[cfg(test)]
pub use profile_repository_port::MockProfileRepository;
#[cfg(test)]
pub use subscription_store_port::MockSubscriptionStore;
#[cfg(test)]
pub use target_repository_port::MockTargetRepository;
