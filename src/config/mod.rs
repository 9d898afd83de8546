//! Profile descriptors: the on-disk model of a profile.
//!
//! A profile is a directory under the configuration root containing a
//! `profile.json` descriptor. Every descriptor key is optional; unknown
//! top-level keys are ignored so newer descriptors keep loading on older
//! engines (the descriptor schema is the only wire contract).
pub mod scan;
pub mod selector;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::Context;
use crate::error::ConfigError;
use self::selector::Selector;

/// Name of the descriptor file expected inside each profile directory.
pub const DESCRIPTOR_FILE: &str = "profile.json";

/// An environment variable value as declared in a descriptor.
///
/// A plain string holds a single value; if several profiles set the same
/// variable the last one in enumeration order wins. A list declares an
/// ordered set of path fragments that accumulate across profiles and are
/// joined with `:` on emission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// Scalar value, e.g. `"EDITOR": "vim"`.
    Literal(String),
    /// Path list, e.g. `"PYTHONPATH": ["lib", "src"]`.
    Paths(Vec<String>),
}

/// A profile: a named bundle of declared effects and an activation
/// condition, reconstructed fresh from its descriptor on every invocation.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Directory name under the configuration root.
    pub name: String,
    /// Absolute path of the profile directory.
    pub dir: PathBuf,
    /// Home-relative target → profile-relative source, symlink semantics.
    pub symlinks: BTreeMap<String, String>,
    /// Home-relative target → profile-relative source, copy semantics.
    pub copies: BTreeMap<String, String>,
    /// Environment variables to export for the login shell.
    pub env: BTreeMap<String, EnvValue>,
    /// Profile-relative directories to prepend to PATH, in order.
    pub path: Vec<String>,
    /// Activation condition; `None` means always active.
    pub selector: Option<Selector>,
    /// Commands the login shell runs once the environment is set up.
    pub onlogin: Vec<String>,
}

/// Raw shape of `profile.json`. Unknown keys deserialize without error.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    symlinks: BTreeMap<String, String>,
    #[serde(default)]
    copies: BTreeMap<String, String>,
    #[serde(default)]
    env: BTreeMap<String, EnvValue>,
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    selectors: Option<serde_json::Value>,
    #[serde(default)]
    onlogin: Vec<String>,
}

impl Profile {
    /// Load the profile stored in `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the descriptor cannot be read or
    /// parsed, the selector expression is malformed, or a target path is
    /// declared in both `symlinks` and `copies` (ambiguous declaration —
    /// there is no sensible winner to guess).
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let name = dir
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let descriptor = dir.join(DESCRIPTOR_FILE);

        let content = std::fs::read_to_string(&descriptor).map_err(|source| ConfigError::Io {
            path: descriptor.clone(),
            source,
        })?;

        let raw: RawDescriptor =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                profile: name.clone(),
                message: e.to_string(),
            })?;

        if let Some(target) = raw.symlinks.keys().find(|t| raw.copies.contains_key(*t)) {
            return Err(ConfigError::AmbiguousTarget {
                profile: name,
                target: target.clone(),
            });
        }

        let selector = raw
            .selectors
            .as_ref()
            .map(Selector::parse)
            .transpose()
            .map_err(|source| ConfigError::Selector {
                profile: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            dir: dir.to_path_buf(),
            symlinks: raw.symlinks,
            copies: raw.copies,
            env: raw.env,
            path: raw.path,
            selector,
            onlogin: raw.onlogin,
        })
    }

    /// Whether the profile's selector holds in `ctx`.
    ///
    /// A profile without a selector is always active.
    #[must_use]
    pub fn is_active(&self, ctx: &dyn Context) -> bool {
        self.selector.as_ref().is_none_or(|s| s.evaluate(ctx))
    }
}
