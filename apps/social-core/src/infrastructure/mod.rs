//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: in-memory repositories and the Turso subscription store
//!   - `notification/`: broadcast-channel notification transport
//!
//! - **Driver Adapters (Inbound)**
//!   - `health/`: health, readiness and metrics HTTP endpoints
//!
//! - **Wiring**
//!   - `config/`: environment configuration and the dependency container

pub mod config;
pub mod health;
pub mod notification;
pub mod persistence;
