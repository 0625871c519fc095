//! Domain types for redwork.
//!
//! - [`method`] - HTTP methods a route may declare
//! - [`route`] - Validated URL path templates and route descriptors
//! - [`manifest`] - The bundler's build output manifest
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use rw_core::{Method, RouteDescriptor, RoutePath};
//! ```

mod manifest;
mod method;
mod route;

pub use manifest::BuildOutputManifest;
pub use method::{Method, ParseMethodError};
pub use route::{RouteDescriptor, RoutePath, RoutePathError};
