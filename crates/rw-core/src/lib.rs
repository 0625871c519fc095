//! Core types, errors, and configuration for redwork.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Route types ([`Method`], [`RoutePath`], [`RouteDescriptor`])
//! - The bundler's [`BuildOutputManifest`]
//! - Configuration structures ([`Config`] and its sections)
//! - Error types for configuration and manifest loading
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{BuildConfig, Config, RoutesConfig, RuntimeConfig, WatchConfig};
pub use error::{ConfigError, ManifestError};
pub use hash::{FxHashMap, FxHashSet};
pub use types::{
    BuildOutputManifest, Method, ParseMethodError, RouteDescriptor, RoutePath, RoutePathError,
};
