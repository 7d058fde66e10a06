//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for the managed backend's data store.

pub mod store;
