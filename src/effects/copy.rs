//! Copy effect, for targets that cannot be symlinks.
//!
//! The idempotence check compares SHA-256 digests: a pre-existing target
//! with identical content is `Correct`, anything else that exists is a
//! conflict.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};

use super::{Effect, EffectState, ensure_parent_dir};
use crate::error::ConflictError;

/// A declared file copy: `source` (in the profile directory) copied to
/// `target` (in `$HOME`).
#[derive(Debug, Clone)]
pub struct CopyEffect {
    /// Absolute source path to copy from.
    pub source: PathBuf,
    /// Absolute target path to copy to.
    pub target: PathBuf,
}

impl CopyEffect {
    /// Create a new copy effect.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Effect for CopyEffect {
    fn description(&self) -> String {
        format!("{} <= {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<EffectState> {
        if !self.source.is_file() {
            return Ok(EffectState::Skipped {
                reason: format!("source is not a file: {}", self.source.display()),
            });
        }

        let Ok(meta) = std::fs::symlink_metadata(&self.target) else {
            return Ok(EffectState::Missing);
        };
        if meta.is_symlink() {
            return Ok(EffectState::Conflict {
                current: "is a symlink".to_string(),
            });
        }
        if meta.is_dir() {
            return Ok(EffectState::Conflict {
                current: "is a directory".to_string(),
            });
        }

        if file_digest(&self.source)? == file_digest(&self.target)? {
            Ok(EffectState::Correct)
        } else {
            Ok(EffectState::Conflict {
                current: "content differs".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<()> {
        ensure_parent_dir(&self.target)?;
        std::fs::copy(&self.source, &self.target)
            .with_context(|| format!("copy to: {}", self.target.display()))?;
        Ok(())
    }

    fn conflict(&self, profile: &str) -> ConflictError {
        ConflictError::ContentDiffers {
            profile: profile.to_string(),
            target: self.target.clone(),
        }
    }
}

/// SHA-256 digest of a file's content.
fn file_digest(path: &Path) -> Result<[u8; 32]> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read for digest: {}", path.display()))?;
    Ok(Sha256::digest(&bytes).into())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn skipped_when_source_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let effect = CopyEffect::new(tmp.path().join("nope"), tmp.path().join("target"));
        assert!(matches!(
            effect.current_state().unwrap(),
            EffectState::Skipped { .. }
        ));
    }

    #[test]
    fn missing_when_target_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        std::fs::write(&source, "content").unwrap();
        let effect = CopyEffect::new(source, tmp.path().join("target"));
        assert_eq!(effect.current_state().unwrap(), EffectState::Missing);
    }

    #[test]
    fn correct_when_content_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        std::fs::write(&source, "same bytes").unwrap();
        std::fs::write(&target, "same bytes").unwrap();

        let effect = CopyEffect::new(source, target);
        assert_eq!(effect.current_state().unwrap(), EffectState::Correct);
    }

    #[test]
    fn conflict_when_content_differs_and_target_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        std::fs::write(&source, "new").unwrap();
        std::fs::write(&target, "precious user data").unwrap();

        let effect = CopyEffect::new(source, target.clone());
        assert!(matches!(
            effect.current_state().unwrap(),
            EffectState::Conflict { ref current } if current == "content differs"
        ));
        assert_eq!(std::fs::read(&target).unwrap(), b"precious user data");
    }

    #[test]
    fn conflict_when_target_is_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::fs::create_dir(&target).unwrap();

        let effect = CopyEffect::new(source, target);
        assert!(matches!(
            effect.current_state().unwrap(),
            EffectState::Conflict { ref current } if current == "is a directory"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn conflict_when_target_is_symlink_even_to_identical_content() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        std::fs::write(&source, "x").unwrap();
        std::os::unix::fs::symlink(&source, &target).unwrap();

        let effect = CopyEffect::new(source, target);
        assert!(matches!(
            effect.current_state().unwrap(),
            EffectState::Conflict { ref current } if current == "is a symlink"
        ));
    }

    #[test]
    fn apply_copies_content_and_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("nested/target");
        std::fs::write(&source, "payload").unwrap();

        let effect = CopyEffect::new(source, target.clone());
        effect.apply().unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
        assert_eq!(effect.current_state().unwrap(), EffectState::Correct);
    }

    #[test]
    fn conflict_error_names_profile_and_target() {
        let effect = CopyEffect::new(PathBuf::from("/src"), PathBuf::from("/tgt"));
        let err = effect.conflict("work");
        assert!(err.to_string().contains("work"));
        assert!(err.to_string().contains("/tgt"));
    }
}
