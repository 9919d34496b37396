//! Selects the cache layout registry the commands operate on.

use cairn_layout::{load_layout, CacheLayoutRegistry, LayoutError, StandardLayout};

use crate::GlobalArgs;

/// Returns the registry from `--config`, or the built-in layout.
pub fn load_registry(global: &GlobalArgs) -> Result<CacheLayoutRegistry, LayoutError> {
    match global.config {
        Some(ref path) => Ok(load_layout(path)?.registry),
        None => StandardLayout::registry(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    #[test]
    fn defaults_to_standard_layout() {
        let registry = load_registry(&global(None)).unwrap();
        assert_eq!(registry.len(), StandardLayout::ALL.len());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(
            &path,
            "[layouts.root]\nname = \"store\"\nhistory = [{ version = 3, release = \"1.0\" }]\n",
        )
        .unwrap();
        let registry = load_registry(&global(Some(path))).unwrap();
        assert_eq!(registry.lookup("store").map(|id| registry.key(id)), Some("store-3".to_string()));
    }

    #[test]
    fn missing_config_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_registry(&global(Some(dir.path().join("nope.toml"))));
        assert!(matches!(result, Err(LayoutError::Io(_))));
    }
}
