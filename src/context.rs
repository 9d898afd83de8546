//! Process-context abstraction for selector evaluation and installation.
//!
//! Provides the [`Context`] trait so that the selector evaluator and the
//! effect installer never read hostname, username, home directory, or
//! environment variables ad hoc from the process. Production code uses
//! [`SystemContext`]; tests use [`FakeContext`] with synthetic facts.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Environmental facts consumed by the engine.
///
/// Implement this trait to evaluate selectors against a synthetic
/// environment, keeping the evaluator pure and testable. The production
/// implementation is [`SystemContext`].
pub trait Context {
    /// Full hostname of the current machine.
    fn hostname(&self) -> &str;

    /// Name of the current user.
    fn username(&self) -> &str;

    /// The user's home directory.
    fn home(&self) -> &Path;

    /// Look up an environment variable, `None` when unset.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Returns `true` if `path` exists as a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if `path` exists as a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Production [`Context`] backed by the real process environment.
#[derive(Debug)]
pub struct SystemContext {
    hostname: String,
    username: String,
    home: PathBuf,
}

impl SystemContext {
    /// Capture the current process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined (HOME,
    /// or USERPROFILE on Windows, unset and no platform fallback).
    pub fn new() -> Result<Self> {
        let home = if cfg!(target_os = "windows") {
            std::env::var("USERPROFILE")
                .or_else(|_| std::env::var("HOME"))
                .map(PathBuf::from)
                .ok()
        } else {
            std::env::var("HOME").map(PathBuf::from).ok()
        };
        let home = home
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("cannot determine the home directory"))?;

        Ok(Self {
            hostname: whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string()),
            username: whoami::username(),
            home,
        })
    }
}

impl Context for SystemContext {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn home(&self) -> &Path {
        &self.home
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Synthetic [`Context`] for tests.
///
/// Pre-configure facts with the builder-style methods. Paths registered
/// via [`with_file`](Self::with_file) / [`with_dir`](Self::with_dir) are
/// reported as existing; anything else falls through to the real
/// filesystem so tempdir-backed fixtures keep working.
#[derive(Debug)]
pub struct FakeContext {
    hostname: String,
    username: String,
    home: PathBuf,
    env: HashMap<String, String>,
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl Default for FakeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeContext {
    /// Create a context with neutral defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hostname: "testhost".to_string(),
            username: "tester".to_string(),
            home: PathBuf::from("/home/tester"),
            env: HashMap::new(),
            files: HashSet::new(),
            dirs: HashSet::new(),
        }
    }

    /// Set the reported hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    /// Set the reported username.
    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    /// Set the reported home directory.
    #[must_use]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    /// Define an environment variable.
    #[must_use]
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    /// Mark `path` as an existing regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Mark `path` as an existing directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }
}

impl Context for FakeContext {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn home(&self) -> &Path {
        &self.home
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path) || path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path) || path.is_dir()
    }
}
