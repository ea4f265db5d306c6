use std::{
    env,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = "bugzilla-operator.toml";

/// Load config file content, returning it with the path it was read from
///
/// Searches in order:
/// 1. The explicitly given path (no fallback when it cannot be read)
/// 2. `bugzilla-operator.toml` in the current working directory
/// 3. `~/.bugzilla-operator.toml`
pub fn load_config_file(explicit: Option<&Path>) -> Option<(PathBuf, String)> {
    if let Some(path) = explicit {
        return match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some((path.to_path_buf(), content))
            }
            Err(e) => {
                log::warn!("Cannot read config file {}: {}", path.display(), e);
                None
            }
        };
    }

    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some((PathBuf::from(CONFIG_FILE), content));
    }

    // Try home directory
    if let Some(home_config) = get_home_config_path() {
        if let Ok(content) = std::fs::read_to_string(&home_config) {
            log::debug!("Loaded config from {}", home_config.display());
            return Some((home_config, content));
        }
    }

    None
}

/// Returns ~/.bugzilla-operator.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(format!(".{}", CONFIG_FILE)))
}
