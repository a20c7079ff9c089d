// src/models/mod.rs

//! Domain models for the snapshot application.

mod bundle;
mod config;
mod resource;

// Re-export all public types
pub use bundle::{Bundle, BundleEntry, BundleLink};
pub use config::{ClientConfig, Config, SnapshotConfig};
pub use resource::ResourceType;
