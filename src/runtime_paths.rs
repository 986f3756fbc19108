use std::{env, path::PathBuf};

use crate::{DEFAULT_DATA_DIR, ROOT_DIR_ENV};

fn resolve_data_root(root_override: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    if let Some(root) = root_override {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    home_dir
        .map(|home| home.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Directory holding storage items, error logs and the desktop log.
pub(crate) fn default_data_root() -> PathBuf {
    resolve_data_root(env::var(ROOT_DIR_ENV).ok(), home::home_dir())
}
