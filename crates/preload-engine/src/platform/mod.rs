//! The platform load primitive.
//!
//! The driver only ever talks to [`PlatformLoader`]. [`DylibLoader`] is the
//! real dynamic-linker implementation; [`FnLoader`] adapts a closure, for
//! hosts with their own primitive and for tests.

mod dylib;
#[cfg(all(test, target_os = "linux"))]
pub(crate) mod fixture;
mod func;

use preload_catalog::LibraryName;

use crate::error::NativeError;

pub use dylib::DylibLoader;
pub use func::FnLoader;

/// Loads one native library into the current process.
///
/// Called at most once per library per process; implementations may assume
/// the caller never retries a failed name.
pub trait PlatformLoader: Send + Sync {
    fn load(&self, name: &LibraryName) -> Result<(), NativeError>;
}
