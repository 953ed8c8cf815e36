//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the ProxLock Admin API.

pub mod admin_api;
