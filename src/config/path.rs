//! Module for searching for joypwm config files

use std::path::PathBuf;

/// Name of the configuration file inside each config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// System fallback path to use if one cannot be found with XDG
const FALLBACK_CONFIG_PATH: &str = "/etc/joypwm/config.yaml";

/// Returns a list of config file paths in load order.
/// E.g. ["~/.config/joypwm/config.yaml", "/etc/xdg/joypwm/config.yaml", "/etc/joypwm/config.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    match xdg::BaseDirectories::with_prefix("joypwm") {
        Ok(base_dirs) => {
            paths.push(base_dirs.get_config_file(CONFIG_FILE_NAME));
            for dir in base_dirs.get_config_dirs() {
                paths.push(dir.join("joypwm").join(CONFIG_FILE_NAME));
            }
        }
        Err(e) => {
            log::warn!("Unable to determine config base path: {e}. Using fallback path.");
        }
    }
    paths.push(PathBuf::from(FALLBACK_CONFIG_PATH));

    paths
}

/// Returns the first config file that exists, if any
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking {path:?} for config file");
        path.is_file()
    })
}
