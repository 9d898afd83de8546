//! Idempotent effect primitives (check + apply pattern).
//!
//! Every filesystem effect follows the same shape: inspect the target,
//! then act only when it is missing. A target that already matches the
//! declaration is left alone; a target with unexpected content is a
//! conflict and is never overwritten — user data beats declarations.
pub mod copy;
pub mod symlink;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::error::ConflictError;

/// Observed state of an effect's target before any change is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectState {
    /// Target absent; the effect can be applied.
    Missing,
    /// Target already matches the declaration (no change needed).
    Correct,
    /// Target exists with unexpected content; never overwritten.
    Conflict {
        /// What the target currently is.
        current: String,
    },
    /// Effect cannot be applied (e.g. missing source); reported, not fatal.
    Skipped {
        /// Reason why the effect was skipped.
        reason: String,
    },
}

/// A declared filesystem effect that can be checked and applied.
pub trait Effect {
    /// Human-readable description of this effect.
    fn description(&self) -> String;

    /// Inspect the target without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the target state cannot be determined due to
    /// I/O failures.
    fn current_state(&self) -> Result<EffectState>;

    /// Apply the effect. Only call when [`current_state`](Self::current_state)
    /// returned [`EffectState::Missing`].
    ///
    /// # Errors
    ///
    /// Returns an error if parent directories or the target itself cannot
    /// be created.
    fn apply(&self) -> Result<()>;

    /// The conflict this effect reports when its target already exists
    /// with unexpected content.
    fn conflict(&self, profile: &str) -> ConflictError;
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// Creating an already-existing directory is not an error.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}
