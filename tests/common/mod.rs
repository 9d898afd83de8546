// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed configuration root plus a fake
// home directory, so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use homeenv_cli::config::DESCRIPTOR_FILE;
use homeenv_cli::context::FakeContext;

/// An isolated environment: a configuration root with profiles and a
/// home directory, both inside one [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TestEnv {
    tmp: tempfile::TempDir,
}

impl TestEnv {
    /// Create an empty environment with `home/` and `root/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home dir");
        std::fs::create_dir_all(tmp.path().join("root")).expect("create config root");
        Self { tmp }
    }

    /// Path of the fake home directory.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Path of the configuration root.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("root")
    }

    /// A context reporting hostname `devbox`, username `dev`, and this
    /// environment's home directory.
    pub fn context(&self) -> FakeContext {
        FakeContext::new()
            .with_hostname("devbox")
            .with_username("dev")
            .with_home(self.home())
    }

    /// Create a profile directory with the given descriptor content.
    pub fn add_profile(&self, name: &str, descriptor: &str) -> PathBuf {
        let dir = self.root().join(name);
        std::fs::create_dir_all(&dir).expect("create profile dir");
        std::fs::write(dir.join(DESCRIPTOR_FILE), descriptor).expect("write descriptor");
        dir
    }

    /// Write a source file inside an existing profile directory.
    pub fn add_profile_file(&self, profile: &str, rel: &str, content: &str) {
        let path = self.root().join(profile).join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
    }

    /// Write a file inside the fake home directory.
    pub fn add_home_file(&self, rel: &str, content: &str) {
        let path = self.home().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(&path, content).expect("write home file");
    }
}

/// Assert that `path` is a symlink pointing at `expected`.
pub fn assert_links_to(path: &Path, expected: &Path) {
    let link = std::fs::read_link(path)
        .unwrap_or_else(|e| panic!("{} should be a symlink: {e}", path.display()));
    assert_eq!(link, expected, "wrong link value for {}", path.display());
}
