//! Process-start helpers for hosts that keep their catalog in a config file.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use preload_catalog::{LibraryName, LoaderConfig};

use crate::platform::DylibLoader;
use crate::preloader::Preloader;

/// Read the loader config at `path` and load `roots` through the system
/// dynamic linker.
///
/// An empty `roots` loads every declared library, in declaration order.
/// Intended to run once, early in process start; calling it again is cheap.
pub fn preload_from_config<N: AsRef<str>>(path: impl AsRef<Path>, roots: &[N]) -> Result<()> {
    let path = path.as_ref();
    let config = LoaderConfig::from_path(path)
        .with_context(|| format!("failed to load preload config {}", path.display()))?;
    preload(&config, roots)
}

/// Load `roots` as described by an already-parsed config.
pub fn preload<N: AsRef<str>>(config: &LoaderConfig, roots: &[N]) -> Result<()> {
    let catalog = config.catalog().context("invalid library catalog")?;
    let platform = DylibLoader::with_search_paths(config.search_paths.iter().cloned());
    let preloader = Preloader::new(catalog, platform).with_cycle_policy(config.cycle_policy);

    let requested: Vec<LibraryName> = if roots.is_empty() {
        preloader.catalog().names().cloned().collect()
    } else {
        roots.iter().map(|name| LibraryName::from(name.as_ref())).collect()
    };

    preloader
        .ensure_loaded(&requested)
        .with_context(|| format!("failed to preload native libraries ({} requested)", requested.len()))?;

    info!("preloaded native libraries ({} requested)", requested.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadFailure;

    #[test]
    fn missing_config_file_has_context() {
        let err = preload_from_config("/nonexistent/preload.toml", &["vrapi"]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/preload.toml"));
    }

    #[test]
    fn empty_config_loads_nothing() {
        preload::<&str>(&LoaderConfig::default(), &[]).unwrap();
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let config = LoaderConfig::from_toml_str(
            r#"
            [[library]]
            name = "bootstrap_dup"

            [[library]]
            name = "bootstrap_dup"
            "#,
        )
        .unwrap();
        let err = preload::<&str>(&config, &[]).unwrap_err();
        assert!(err.to_string().contains("invalid library catalog"));
    }

    #[test]
    fn missing_library_fails_with_typed_cause() {
        let dir = std::env::temp_dir().join(format!("preload-bootstrap-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = LoaderConfig::from_toml_str(&format!(
            r#"
            search_paths = [{:?}]

            [[library]]
            name = "bootstrap_probe_app"
            dependencies = ["bootstrap_probe_dep"]

            [[library]]
            name = "bootstrap_probe_dep"
            "#,
            dir.display().to_string()
        ))
        .unwrap();

        let err = preload(&config, &["bootstrap_probe_app"]).unwrap_err();
        let cause = err.downcast_ref::<LoadFailure>().unwrap();
        assert!(matches!(
            cause,
            LoadFailure::NativeLoadFailure { name, .. } | LoadFailure::DependencyAlreadyFailed { failed: name, .. }
                if name.as_str() == "bootstrap_probe_dep"
        ));

        std::fs::remove_dir_all(dir).ok();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn preloaded_library_outlives_the_call() {
        use crate::platform::fixture;
        use crate::store::{LoadRecordStore, LoadState};

        let dir = std::env::temp_dir().join(format!("preload-bootstrap-mapped-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let Some(object) = fixture::shared_object(&dir, "bootstrap_mapped") else {
            eprintln!("no C compiler; skipping");
            return;
        };
        let config = LoaderConfig::from_toml_str(&format!(
            r#"
            search_paths = [{:?}]

            [[library]]
            name = "bootstrap_mapped"
            "#,
            dir.display().to_string()
        ))
        .unwrap();

        preload(&config, &["bootstrap_mapped"]).unwrap();

        let record = LoadRecordStore::global().lookup("bootstrap_mapped").unwrap();
        assert_eq!(record.state, LoadState::Loaded);
        assert!(fixture::is_mapped(&object), "{} was unmapped", object.display());

        std::fs::remove_dir_all(dir).ok();
    }
}
