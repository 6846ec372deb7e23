use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable that overrides the data directory
pub const HOME_ENV_VAR: &str = "CASEFILE_HOME";

const APP_DIR_NAME: &str = "casefile";
const CASES_DIR_NAME: &str = "cases";
const EXPORTS_DIR_NAME: &str = "exports";

/// Where cases and exported archives live on this device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Root of the case tree: `<home>/cases`
    pub storage_root: PathBuf,
    /// Output directory for archives: `<home>/exports`
    pub export_dir: PathBuf,
}

impl AppPaths {
    pub fn under(home: &Path) -> Self {
        Self { storage_root: home.join(CASES_DIR_NAME), export_dir: home.join(EXPORTS_DIR_NAME) }
    }

    /// Resolve paths from an explicit override, `CASEFILE_HOME`, or the platform data dir
    pub fn resolve(home_override: Option<&Path>) -> Result<Self> {
        let home = match home_override {
            Some(home) => home.to_path_buf(),
            None => get_app_home()?,
        };
        Ok(Self::under(&home))
    }
}

/// Get the application data directory
///
/// `CASEFILE_HOME` wins when set and non-empty; otherwise the platform data directory
/// (`~/.local/share/casefile`, `~/Library/Application Support/casefile`, ...).
pub fn get_app_home() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let data_dir = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(data_dir.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_app_paths_under_home() {
        let paths = AppPaths::under(Path::new("/data/casefile"));
        assert_eq!(paths.storage_root, PathBuf::from("/data/casefile/cases"));
        assert_eq!(paths.export_dir, PathBuf::from("/data/casefile/exports"));
    }

    #[test]
    fn test_resolve_prefers_override() {
        let paths = AppPaths::resolve(Some(Path::new("/tmp/override"))).unwrap();
        assert_eq!(paths.storage_root, PathBuf::from("/tmp/override/cases"));
    }

    #[test]
    fn test_get_app_home_from_env() {
        let original = env::var_os(HOME_ENV_VAR);

        // SAFETY: Setting environment variables in tests is safe as long as:
        // 1. No other test reads CASEFILE_HOME concurrently
        // 2. We restore the original value afterwards
        unsafe {
            env::set_var(HOME_ENV_VAR, "/srv/casefile");
        }

        let result = get_app_home();
        assert_eq!(result.unwrap(), PathBuf::from("/srv/casefile"));

        unsafe {
            match original {
                Some(value) => env::set_var(HOME_ENV_VAR, value),
                None => env::remove_var(HOME_ENV_VAR),
            }
        }
    }
}
