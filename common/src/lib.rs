//! Shared models for the gordo workspace.
//!
//! Holds the pieces every other crate agrees on: the scan configuration, the target and
//! port range models, and the well-known service catalog.

pub mod config;
pub mod network;
pub mod services;
