//! The `edit` command: scaffold a profile and open its descriptor.
use anyhow::{Context as _, Result, bail};

use crate::cli::{EditOpts, GlobalOpts};
use crate::config::DESCRIPTOR_FILE;
use crate::context::{Context as _, SystemContext};
use crate::logging::Logger;

/// Run the edit command.
///
/// Creates the profile directory and an empty descriptor when missing,
/// then opens the descriptor in `$EDITOR` (falling back to `vi`). With
/// `--create`, an already-existing profile is an error.
///
/// # Errors
///
/// Returns an error for an invalid profile name, a pre-existing profile
/// under `--create`, or an editor that cannot be launched or exits
/// non-zero.
pub fn run(global: &GlobalOpts, opts: &EditOpts, log: &Logger) -> Result<()> {
    if opts.profile.is_empty() || opts.profile.contains(|c: char| matches!(c, '/' | '\\')) {
        bail!("invalid profile name: '{}'", opts.profile);
    }

    let ctx = SystemContext::new()?;
    let root = super::resolve_root(global, &ctx);
    let dir = root.join(&opts.profile);
    let descriptor = dir.join(DESCRIPTOR_FILE);

    if opts.create && descriptor.exists() {
        bail!("profile '{}' already exists", opts.profile);
    }

    if !descriptor.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create profile directory: {}", dir.display()))?;
        std::fs::write(&descriptor, "{\n}\n")
            .with_context(|| format!("write descriptor: {}", descriptor.display()))?;
        log.info(&format!("created {}", descriptor.display()));
    }

    let editor = ctx
        .env_var("EDITOR")
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "vi".to_string());
    log.debug(&format!("running {editor} {}", descriptor.display()));

    let status = std::process::Command::new(&editor)
        .arg(&descriptor)
        .status()
        .with_context(|| format!("launching editor '{editor}'"))?;
    if !status.success() {
        bail!("editor exited with {status}");
    }
    Ok(())
}
