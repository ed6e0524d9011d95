//! Application Services
//!
//! Stateful services shared by the use cases.
//!
//! - `SubscriptionRegistry`: write-through cache of subscriber -> publisher edges
//! - `NotificationDispatcher`: best-effort fan-out to a publisher's subscribers
//! - `KeyedLock`: per-key async mutual exclusion

mod keyed_lock;
mod notification_dispatcher;
mod subscription_registry;

pub use keyed_lock::{KeyedGuard, KeyedLock};
pub use notification_dispatcher::NotificationDispatcher;
pub use subscription_registry::{RegistryStats, SubscriptionRegistry};
