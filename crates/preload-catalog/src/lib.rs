//! Library names, dependency descriptors, and loader configuration.
//!
//! This crate carries no dynamic-linker code so it can be used by tooling
//! that only needs to read or validate a catalog.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`name`] | `LibraryName` |
//! | [`descriptor`] | `LibraryDescriptor` |
//! | [`catalog`] | `Catalog`, `CatalogBuilder` |
//! | [`config`] | `LoaderConfig`, `CyclePolicy` (TOML) |
//! | [`error`] | `CatalogError` |
//!
//! # Quick start
//!
//! ```rust
//! use preload_catalog::LoaderConfig;
//!
//! let config = LoaderConfig::from_toml_str(r#"
//!     [[library]]
//!     name = "vrcubeworld"
//!     dependencies = ["vrapi"]
//!
//!     [[library]]
//!     name = "vrapi"
//! "#).unwrap();
//!
//! let catalog = config.catalog().unwrap();
//! assert_eq!(catalog.get("vrcubeworld").unwrap().dependencies.len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod name;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::{CyclePolicy, LoaderConfig};
pub use descriptor::LibraryDescriptor;
pub use error::CatalogError;
pub use name::LibraryName;
