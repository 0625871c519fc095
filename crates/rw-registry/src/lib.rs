//! Route registry generation and lookup.
//!
//! - [`RegistryWriter`]: renders a route list into a loadable module of lazy
//!   import thunks and writes it atomically
//! - [`RegistryReader`]: parses a generated registry back into entries
//! - [`ManifestReconciler`]: swaps source route files for bundled outputs
//! - [`RouteTable`]: runtime path lookup with parameter capture
//! - [`Scaffold`]: client/server entry files consuming the registry
//!
//! # Example
//!
//! ```ignore
//! use rw_registry::{RegistryReader, RegistryWriter, RouteTable};
//! use rw_core::Method;
//!
//! RegistryWriter::new("./routes").write(&routes, "./.redwork/generated/routes.ts".into(), None)?;
//!
//! let entries = RegistryReader::load("./.redwork/generated/routes.ts".into())?;
//! let table = RouteTable::from_registry(&entries);
//! if let Some(hit) = table.find(Method::Get, "/users/42") {
//!     println!("{} -> {}", hit.template, hit.value);
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod fs;
mod matcher;
mod reader;
mod reconcile;
mod scaffold;
mod writer;

pub use error::RegistryError;
pub use fs::{import_specifier, write_atomic};
pub use matcher::{Params, RouteMatch, RouteTable, RouteTableCache, match_route};
pub use reader::{RegistryEntry, RegistryReader};
pub use reconcile::{ManifestReconciler, manifest_key_prefix, reconcile, reconcile_strict};
pub use scaffold::{Scaffold, ScaffoldFiles, TEMPLATE_HTML};
pub use writer::{REGISTRY_HEADER, RegistryWriter};
