//! Symlink effect.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Effect, EffectState, ensure_parent_dir};
use crate::error::ConflictError;

/// A declared symlink: `target` (in `$HOME`) pointing at `source` (in the
/// profile directory).
#[derive(Debug, Clone)]
pub struct SymlinkEffect {
    /// Absolute source path the link points to.
    pub source: PathBuf,
    /// Absolute target path where the link is created.
    pub target: PathBuf,
}

impl SymlinkEffect {
    /// Create a new symlink effect.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Effect for SymlinkEffect {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<EffectState> {
        if !self.source.exists() {
            return Ok(EffectState::Skipped {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        match std::fs::read_link(&self.target) {
            Ok(existing) => {
                if existing == self.source {
                    Ok(EffectState::Correct)
                } else {
                    Ok(EffectState::Conflict {
                        current: format!("links to {}", existing.display()),
                    })
                }
            }
            // Not a symlink: distinguish "absent" from "occupied".
            Err(_) => match std::fs::symlink_metadata(&self.target) {
                Ok(meta) if meta.is_dir() => Ok(EffectState::Conflict {
                    current: "is a directory".to_string(),
                }),
                Ok(_) => Ok(EffectState::Conflict {
                    current: "is a regular file".to_string(),
                }),
                Err(_) => Ok(EffectState::Missing),
            },
        }
    }

    fn apply(&self) -> Result<()> {
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))
    }

    fn conflict(&self, profile: &str) -> ConflictError {
        ConflictError::TargetExists {
            profile: profile.to_string(),
            target: self.target.clone(),
            declared_source: self.source.clone(),
        }
    }
}

/// Create a symlink (platform-specific).
fn create_symlink(source: &Path, target: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, target)?;
    }

    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, target)?;
        } else {
            std::os::windows::fs::symlink_file(source, target)?;
        }
    }

    Ok(())
}
