//! Settings loader.
//!
//! Reads the TOML settings file once at startup. Unlike ordinary config
//! with defaults, a missing or unparseable file here is fatal: without
//! tenant credentials and topic routing ids the process cannot do
//! anything useful, so it refuses to start.

use std::path::Path;

use gridhook_types::config::AppSettings;
use gridhook_types::error::SettingsError;

/// Load [`AppSettings`] from `path`. Fails fast; there is no fallback.
pub async fn load_settings(path: &Path) -> Result<AppSettings, SettingsError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
