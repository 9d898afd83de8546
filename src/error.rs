//! Domain-specific error types for the homeenv engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`ConflictError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! EnvError
//! ├── Config(ConfigError)     — descriptor parsing, selector shape, declarations
//! │   └── Selector(SelectorError)
//! └── Conflict(ConflictError) — install target exists with unexpected content
//! ```
//!
//! Both configuration and conflict errors are fatal only for the profile
//! (or the single effect) they concern: scanning collects per-profile
//! [`ConfigError`]s and continues, and installation collects every
//! [`ConflictError`] of a run before reporting them together.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the homeenv engine.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at CLI command boundaries.
#[derive(Error, Debug)]
pub enum EnvError {
    /// Configuration-related error (parsing, selectors, declarations).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An install target already exists with unexpected content.
    #[error("Conflict: {0}")]
    Conflict(#[from] ConflictError),
}

/// Errors that arise from descriptor loading and profile declarations.
///
/// Every variant names the profile at fault; a `ConfigError` never aborts
/// the scan of other profiles.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a descriptor or the config root.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor file contains a syntax or structure error.
    #[error("profile '{profile}': invalid profile.json: {message}")]
    Parse { profile: String, message: String },

    /// The descriptor's `selectors` value does not parse into an expression.
    #[error("profile '{profile}': invalid selector: {source}")]
    Selector {
        /// Profile whose descriptor declared the selector.
        profile: String,
        /// The specific shape violation.
        source: SelectorError,
    },

    /// The same target path is declared in both `symlinks` and `copies`.
    #[error("profile '{profile}': '{target}' is declared in both symlinks and copies")]
    AmbiguousTarget { profile: String, target: String },

    /// A declared path references an environment variable that is not set.
    #[error("profile '{profile}': cannot expand '{value}': ${var} is not set")]
    Expand {
        profile: String,
        value: String,
        var: String,
    },

    /// An install target resolves outside (or to) the home directory.
    #[error("profile '{profile}': target {target} is not inside the home directory")]
    OutsideHome { profile: String, target: PathBuf },

    /// The same environment variable is declared both as a string and a list.
    #[error("profile '{profile}': variable '{var}' is declared both as a string and as a list")]
    EnvShape { profile: String, var: String },
}

/// Errors that arise from parsing a selector expression.
///
/// Selector problems are surfaced as [`ConfigError::Selector`] so that a
/// typo deactivates exactly one profile instead of silently changing which
/// profiles activate.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// The expression uses a selector key this engine does not know.
    #[error("unknown selector '{0}'")]
    UnknownKey(String),

    /// A selector key holds a value of the wrong JSON shape.
    #[error("invalid value for '{key}' selector: expected {expected}")]
    InvalidValue {
        /// The selector key whose value is malformed.
        key: String,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },

    /// A `not` body held zero or several selectors.
    #[error("'not' takes exactly one selector; use 'and' or 'or' to combine several")]
    NotArity,
}

/// Errors that arise when an install target already exists.
///
/// The pre-existing target is never modified; conflicts are collected and
/// reported together at the end of the run.
#[derive(Error, Debug)]
pub enum ConflictError {
    /// The symlink target exists and is not a link to the declared source.
    #[error("profile '{profile}': {target} exists and is not a link to {declared_source}")]
    TargetExists {
        profile: String,
        target: PathBuf,
        declared_source: PathBuf,
    },

    /// The copy target exists with content differing from the source.
    #[error("profile '{profile}': {target} exists with different content")]
    ContentDiffers { profile: String, target: PathBuf },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // ConfigError
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: PathBuf::from("/cfg/work/profile.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/cfg/work/profile.json"));
        assert!(e.to_string().contains("IO error reading"));
    }

    #[test]
    fn config_error_parse_display() {
        let e = ConfigError::Parse {
            profile: "work".to_string(),
            message: "expected value at line 3".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "profile 'work': invalid profile.json: expected value at line 3"
        );
    }

    #[test]
    fn config_error_selector_names_profile_and_key() {
        let e = ConfigError::Selector {
            profile: "work".to_string(),
            source: SelectorError::UnknownKey("hots".to_string()),
        };
        assert!(e.to_string().contains("work"));
        assert!(e.to_string().contains("unknown selector 'hots'"));
    }

    #[test]
    fn config_error_ambiguous_target_display() {
        let e = ConfigError::AmbiguousTarget {
            profile: "work".to_string(),
            target: ".vimrc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "profile 'work': '.vimrc' is declared in both symlinks and copies"
        );
    }

    #[test]
    fn config_error_expand_names_variable() {
        let e = ConfigError::Expand {
            profile: "work".to_string(),
            value: "$PROJECTS/bin".to_string(),
            var: "PROJECTS".to_string(),
        };
        assert!(e.to_string().contains("$PROJECTS is not set"));
    }

    #[test]
    fn config_error_env_shape_display() {
        let e = ConfigError::EnvShape {
            profile: "work".to_string(),
            var: "PYTHONPATH".to_string(),
        };
        assert!(e.to_string().contains("PYTHONPATH"));
        assert!(e.to_string().contains("both as a string and as a list"));
    }

    // -----------------------------------------------------------------------
    // SelectorError
    // -----------------------------------------------------------------------

    #[test]
    fn selector_error_unknown_key_display() {
        let e = SelectorError::UnknownKey("cmd".to_string());
        assert_eq!(e.to_string(), "unknown selector 'cmd'");
    }

    #[test]
    fn selector_error_invalid_value_display() {
        let e = SelectorError::InvalidValue {
            key: "host".to_string(),
            expected: "a string or an array of strings",
        };
        assert_eq!(
            e.to_string(),
            "invalid value for 'host' selector: expected a string or an array of strings"
        );
    }

    #[test]
    fn selector_error_not_arity_display() {
        let e = SelectorError::NotArity;
        assert!(e.to_string().contains("exactly one selector"));
    }

    // -----------------------------------------------------------------------
    // ConflictError
    // -----------------------------------------------------------------------

    #[test]
    fn conflict_error_target_exists_display() {
        let e = ConflictError::TargetExists {
            profile: "work".to_string(),
            target: PathBuf::from("/home/u/.vimrc"),
            declared_source: PathBuf::from("/home/u/.homeenv/work/vimrc"),
        };
        assert!(e.to_string().contains("/home/u/.vimrc"));
        assert!(e.to_string().contains("is not a link to"));
    }

    #[test]
    fn conflict_error_content_differs_display() {
        let e = ConflictError::ContentDiffers {
            profile: "work".to_string(),
            target: PathBuf::from("/home/u/.gitconfig"),
        };
        assert!(e.to_string().contains("different content"));
    }

    // -----------------------------------------------------------------------
    // EnvError conversions
    // -----------------------------------------------------------------------

    #[test]
    fn env_error_from_config_error() {
        let config_err = ConfigError::Parse {
            profile: "bad".to_string(),
            message: "oops".to_string(),
        };
        let e: EnvError = config_err.into();
        assert!(e.to_string().contains("Configuration error"));
        assert!(e.to_string().contains("bad"));
    }

    #[test]
    fn env_error_from_conflict_error() {
        let conflict = ConflictError::ContentDiffers {
            profile: "work".to_string(),
            target: PathBuf::from("/home/u/.gitconfig"),
        };
        let e: EnvError = conflict.into();
        assert!(e.to_string().contains("Conflict"));
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<EnvError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<SelectorError>();
        assert_send_sync::<ConflictError>();
    }

    // -----------------------------------------------------------------------
    // anyhow conversion
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::AmbiguousTarget {
            profile: "work".to_string(),
            target: ".vimrc".to_string(),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }

    #[test]
    fn conflict_error_converts_to_anyhow() {
        let e = ConflictError::ContentDiffers {
            profile: "work".to_string(),
            target: PathBuf::from("/x"),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
