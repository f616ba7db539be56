//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the store adapters (PostgreSQL and PostgREST) behind the
//! traits the features depend on.

pub mod store;
