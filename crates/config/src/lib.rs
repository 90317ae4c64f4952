//! On-disk configuration: RPC credentials and the sync bounds file.

use runtally_primitives::BlockNumber;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error when reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The credentials file does not exist.
    ///
    /// Carries the path the file is expected at so the CLI can tell the user
    /// where to put it.
    #[error("Credentials file missing, expected at {}", .path.display())]
    MissingCredentials {
        /// Where the file was looked for.
        path: PathBuf,
    },
    /// A configuration file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },
    /// A configuration file could not be parsed.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// RPC credentials, read from `~/.wallet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Alchemy API key for the Polygon endpoint.
    pub polygon_alchemy_key: String,
}

impl Credentials {
    /// The default credentials path: `.wallet` in the user's home directory.
    pub fn default_path() -> PathBuf {
        dirs_next::home_dir().unwrap_or_default().join(".wallet")
    }

    /// Loads credentials from `path`.
    ///
    /// A missing file yields [`ConfigError::MissingCredentials`] so callers
    /// can distinguish "not set up yet" from a broken file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingCredentials { path: path.to_path_buf() })
        }
        read_json(path)
    }
}

/// The block interval to scan, read from the bounds file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyncBounds {
    /// First block height to scan.
    pub start: BlockNumber,
    /// Fixed end height, exclusive. When absent the sync pass runs to the
    /// ledger's current head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<BlockNumber>,
}

impl SyncBounds {
    /// Loads sync bounds from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn missing_credentials_name_the_expected_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wallet");

        let err = Credentials::load(&path).unwrap_err();

        assert_matches!(err, ConfigError::MissingCredentials { path: reported } => {
            assert_eq!(reported, path)
        });
    }

    #[test]
    fn credentials_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".wallet");
        std::fs::write(&path, r#"{"polygon_alchemy_key":"test-key"}"#).unwrap();

        let credentials = Credentials::load(&path).unwrap();
        assert_eq!(credentials.polygon_alchemy_key, "test-key");
    }

    #[test]
    fn bounds_without_end_default_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bounds.json");
        std::fs::write(&path, r#"{"start":25310000}"#).unwrap();

        let bounds = SyncBounds::load(&path).unwrap();
        assert_eq!(bounds.start, 25_310_000);
        assert_eq!(bounds.end, None);
    }

    #[test]
    fn corrupt_bounds_surface_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bounds.json");
        std::fs::write(&path, "start=0").unwrap();

        assert_matches!(SyncBounds::load(&path).unwrap_err(), ConfigError::Parse { .. });
    }
}
