use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing an inbound notification body into an envelope.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("notification body is not a valid envelope: {0}")]
    Malformed(String),
}

/// Errors from decoding an envelope's `data` field into a typed record.
///
/// Raised only when `data` is present but mis-shaped; an absent `data`
/// field is not an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("change payload does not match the expected shape: {0}")]
    Shape(String),
}

/// Errors from the remote directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("directory service returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl DirectoryError {
    /// Whether this failure means the looked-up entity no longer exists.
    ///
    /// The dispatcher reinterprets a not-found lookup during an update
    /// notification as a soft-delete signal rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}

/// Failure of a single notification's dispatch.
///
/// Contained at the per-notification boundary: the webhook handler logs
/// the error and still acknowledges with 202.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Errors from loading application settings. Fatal at startup.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse settings file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_not_found_classification() {
        let err = DirectoryError::NotFound("users/abc".to_string());
        assert!(err.is_not_found());

        let err = DirectoryError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_dispatch_error_wraps_directory_error() {
        let err: DispatchError = DirectoryError::Auth("bad credentials".to_string()).into();
        assert_eq!(err.to_string(), "authentication failed: bad credentials");
    }

    #[test]
    fn test_settings_error_display_includes_path() {
        let err = SettingsError::Parse {
            path: PathBuf::from("/etc/gridhook.toml"),
            message: "expected a table".to_string(),
        };
        assert!(err.to_string().contains("/etc/gridhook.toml"));
        assert!(err.to_string().contains("expected a table"));
    }
}
