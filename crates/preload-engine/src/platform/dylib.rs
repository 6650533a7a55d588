use std::ffi::OsString;
use std::path::{Path, PathBuf};

use libloading::Library;
use log::{debug, info};
use parking_lot::Mutex;
use preload_catalog::LibraryName;

use super::PlatformLoader;
use crate::error::NativeError;

/// [`PlatformLoader`] over the system dynamic linker.
///
/// A name maps to a platform file name the way the host platform's
/// `loadLibrary` does (`vrapi` → `libvrapi.so` on Linux and Android). With
/// search paths configured, the first directory holding that file wins, and
/// a name with no candidate file fails without reaching the linker: a failed
/// `dlopen` is remembered by some linkers and would poison later attempts.
/// Without search paths the bare file name is passed to the linker, which
/// applies its own search rules.
///
/// Libraries are kept open for the life of the process: handles go to a
/// process-wide table, so dropping the loader never unmaps anything.
#[derive(Debug, Default)]
pub struct DylibLoader {
    search_paths: Vec<PathBuf>,
    mapped: Mutex<Vec<PathBuf>>,
}

/// Every handle opened by any [`DylibLoader`]. Never drained.
static RETAINED: Mutex<Vec<Library>> = parking_lot::const_mutex(Vec::new());

impl DylibLoader {
    /// Defer file lookup to the system linker.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: paths.into_iter().map(Into::into).collect(),
            mapped: Mutex::new(Vec::new()),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Platform file name for a library (`libvrapi.so`, `vrapi.dll`, ...).
    pub fn file_name(name: &LibraryName) -> OsString {
        libloading::library_filename(name.as_str())
    }

    /// Number of libraries this loader has mapped.
    pub fn loaded_count(&self) -> usize {
        self.mapped.lock().len()
    }

    /// Files this loader has mapped, in load order.
    pub fn mapped_paths(&self) -> Vec<PathBuf> {
        self.mapped.lock().clone()
    }

    /// Path handed to the linker for `name`.
    pub fn resolve(&self, name: &LibraryName) -> Result<PathBuf, NativeError> {
        let literal = Path::new(name.as_str());
        if literal.components().count() > 1 {
            return if literal.is_file() {
                Ok(literal.to_path_buf())
            } else {
                Err(NativeError::new(format!("'{}' does not exist", literal.display())))
            };
        }

        let file = Self::file_name(name);
        if self.search_paths.is_empty() {
            return Ok(PathBuf::from(file));
        }

        self.search_paths
            .iter()
            .map(|dir| dir.join(&file))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                let searched: Vec<String> =
                    self.search_paths.iter().map(|p| p.display().to_string()).collect();
                NativeError::new(format!(
                    "{} not found in search paths [{}]",
                    file.to_string_lossy(),
                    searched.join(", ")
                ))
            })
    }
}

impl PlatformLoader for DylibLoader {
    fn load(&self, name: &LibraryName) -> Result<(), NativeError> {
        let path = self.resolve(name)?;
        debug!("opening '{}' for '{name}'", path.display());

        let library = open(&path)
            .map_err(|err| NativeError::new(format!("{}: {err}", path.display())))?;

        RETAINED.lock().push(library);
        self.mapped.lock().push(path.clone());
        info!("native library '{name}' mapped from '{}'", path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn open(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};

    // Global binding so libraries loaded later can resolve symbols exported
    // by their dependencies.
    //
    // SAFETY: running a library's initialisers is the purpose of this call;
    // the catalog is trusted configuration supplied by the embedding app.
    let library = unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }?;
    Ok(library.into())
}

#[cfg(not(unix))]
fn open(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: as above, initialisers of trusted catalog libraries.
    unsafe { Library::new(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("preload-dylib-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn file_name_follows_platform_convention() {
        assert_eq!(DylibLoader::file_name(&"vrapi".into()), OsString::from("libvrapi.so"));
    }

    #[test]
    fn without_search_paths_the_linker_searches() {
        let loader = DylibLoader::new();
        let path = loader.resolve(&"vrapi".into()).unwrap();
        assert_eq!(path, PathBuf::from(DylibLoader::file_name(&"vrapi".into())));
    }

    #[test]
    fn missing_file_fails_before_the_linker() {
        let dir = scratch_dir("missing");
        let loader = DylibLoader::with_search_paths([&dir]);

        let err = loader.load(&"vrapi".into()).unwrap_err();
        assert!(err.message.contains("not found in search paths"), "{err}");
        assert_eq!(loader.loaded_count(), 0);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn first_search_path_with_the_file_wins() {
        let empty = scratch_dir("order-empty");
        let full = scratch_dir("order-full");
        let file = DylibLoader::file_name(&"vrapi".into());
        fs::write(full.join(&file), b"").unwrap();

        let loader = DylibLoader::with_search_paths([&empty, &full]);
        assert_eq!(loader.resolve(&"vrapi".into()).unwrap(), full.join(&file));

        fs::remove_dir_all(empty).ok();
        fs::remove_dir_all(full).ok();
    }

    #[test]
    fn literal_path_must_exist() {
        let err = DylibLoader::new()
            .resolve(&"/nonexistent/dir/libvrapi.so".into())
            .unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn non_library_file_is_rejected_by_the_linker() {
        let dir = scratch_dir("junk");
        let file = DylibLoader::file_name(&"junk".into());
        fs::write(dir.join(&file), b"definitely not a shared object").unwrap();

        let loader = DylibLoader::with_search_paths([&dir]);
        let err = loader.load(&"junk".into()).unwrap_err();
        assert!(err.message.contains(&*file.to_string_lossy()), "{err}");
        assert_eq!(loader.loaded_count(), 0);

        fs::remove_dir_all(dir).ok();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn library_stays_mapped_after_loader_is_dropped() {
        use crate::platform::fixture;

        let dir = scratch_dir("retained");
        let Some(object) = fixture::shared_object(&dir, "dylib_retained") else {
            eprintln!("no C compiler; skipping");
            return;
        };

        let loader = DylibLoader::with_search_paths([&dir]);
        loader.load(&"dylib_retained".into()).unwrap();
        assert_eq!(loader.mapped_paths(), [object.clone()]);
        drop(loader);

        assert!(fixture::is_mapped(&object), "{} was unmapped", object.display());
        fs::remove_dir_all(dir).ok();
    }
}
