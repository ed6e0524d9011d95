//! Configuration Module
//!
//! Configuration loading and dependency wiring for the service.

mod container;
mod settings;

pub use container::{Container, ServiceContainer};
pub use settings::{
    ConfigError, CoreConfig, DEFAULT_DB_PATH, DEFAULT_HEALTH_PORT, Environment,
};
