//! Locating and reading `rackstock.json5` layers.

use super::{ConfigLayerSource, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILE, schema};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read and schema-check one layer. The label names the layer in errors.
pub(super) fn read_layer(source: ConfigLayerSource, path: &Path) -> Result<Value, ConfigError> {
    debug!(
        "reading config layer (source={:?}, path={})",
        source,
        path.display()
    );
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound if source == ConfigLayerSource::Runtime => {
            ConfigError::MissingOverride(path.to_path_buf())
        }
        _ => ConfigError::Io(err),
    })?;
    let value: Value = json5::from_str(&contents)?;
    schema::validate_layer_schema(&value, &format!("{}({})", source.label(), path.display()))?;
    Ok(value)
}

/// `~/.rackstock/rackstock.json5`, when a home directory is known.
pub(super) fn default_user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}

/// Absolute form of `cwd`; a directory that does not exist yet is kept as given.
pub(super) fn resolve_cwd(cwd: &Path) -> Result<PathBuf, ConfigError> {
    match cwd.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(cwd.to_path_buf()),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

/// Identity used to skip a file reached through two layer locations.
pub(super) fn layer_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Nearest ancestor of `cwd` holding one of `markers`.
pub(super) fn project_root<'a>(cwd: &'a Path, markers: &[String]) -> Option<&'a Path> {
    cwd.ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
}
