//! Real shared objects for tests that go through the system linker.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::DylibLoader;

/// Compile a one-function shared object for library `name` into `dir`.
///
/// `None` when no C compiler is available.
pub(crate) fn shared_object(dir: &Path, name: &str) -> Option<PathBuf> {
    let source = dir.join(format!("{name}.c"));
    fs::write(&source, format!("int {name}_marker(void) {{ return 42; }}\n")).ok()?;

    let object = dir.join(DylibLoader::file_name(&name.into()));
    let status = Command::new("cc")
        .args(["-shared", "-fPIC", "-o"])
        .arg(&object)
        .arg(&source)
        .status()
        .ok()?;
    status.success().then_some(object)
}

/// Whether `path` is currently mapped into this process.
pub(crate) fn is_mapped(path: &Path) -> bool {
    let Ok(path) = path.canonicalize() else {
        return false;
    };
    let path = path.to_string_lossy();
    fs::read_to_string("/proc/self/maps")
        .map(|maps| maps.lines().any(|line| line.ends_with(&*path)))
        .unwrap_or(false)
}
