//! Dependency-ordered, load-once native library loader.
//!
//! Given a catalog of native libraries and the libraries each one needs,
//! [`Preloader::ensure_loaded`] loads a requested set in dependency order,
//! hands each library to the dynamic linker at most once per process,
//! refuses circular declarations, and never retries a library that already
//! failed.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`graph`] | `DependencyGraph`, `plan`, `LoadPlan` |
//! | [`store`] | `LoadRecordStore`, `LoadRecord`, `LoadState` |
//! | [`driver`] | `Driver` (walks a plan) |
//! | [`platform`] | `PlatformLoader`, `DylibLoader`, `FnLoader` |
//! | [`bootstrap`] | config-file startup helpers |
//! | [`logging`] | `init_logging` |
//!
//! A request flows catalog → graph → plan → driver, with the store as the
//! only state shared between requests.

pub mod bootstrap;
pub mod driver;
pub mod error;
pub mod graph;
pub mod logging;
pub mod platform;
pub mod preloader;
pub mod store;

pub use error::{LoadFailure, NativeError};
pub use preloader::Preloader;
pub use preload_catalog::{Catalog, CyclePolicy, LibraryDescriptor, LibraryName, LoaderConfig};
