use std::fmt;

use preload_catalog::LibraryName;

use super::PlatformLoader;
use crate::error::NativeError;

/// [`PlatformLoader`] backed by a closure.
///
/// ```rust
/// use preload_engine::platform::{FnLoader, PlatformLoader};
///
/// let loader = FnLoader::new(|name| {
///     println!("System.loadLibrary({name})");
///     Ok(())
/// });
/// loader.load(&"vrapi".into()).unwrap();
/// ```
pub struct FnLoader<F> {
    load: F,
}

impl<F> FnLoader<F>
where
    F: Fn(&LibraryName) -> Result<(), NativeError> + Send + Sync,
{
    pub fn new(load: F) -> Self {
        Self { load }
    }
}

impl<F> PlatformLoader for FnLoader<F>
where
    F: Fn(&LibraryName) -> Result<(), NativeError> + Send + Sync,
{
    fn load(&self, name: &LibraryName) -> Result<(), NativeError> {
        (self.load)(name)
    }
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnLoader")
    }
}
