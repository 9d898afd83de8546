//! Apply one profile's declared effects onto the home directory.
//!
//! Installation targets the *current* profile — the one the operator
//! explicitly named — as opposed to the *active* set the emitter works
//! with. Every effect is resolved and attempted; conflicts and
//! per-declaration configuration errors are collected into the report
//! instead of aborting the run, so the operator sees all problems at
//! once.

use std::path::PathBuf;

use crate::config::Profile;
use crate::context::Context;
use crate::effects::copy::CopyEffect;
use crate::effects::symlink::SymlinkEffect;
use crate::effects::{Effect, EffectState};
use crate::error::{ConfigError, ConflictError};
use crate::expand;
use crate::logging::Logger;

/// Outcome of installing one profile.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Effects created by this run.
    pub applied: u32,
    /// Effects that were already correct.
    pub unchanged: u32,
    /// Effects skipped (missing source or failed apply).
    pub skipped: u32,
    /// Targets that exist with unexpected content; nothing was modified.
    pub conflicts: Vec<ConflictError>,
    /// Per-declaration configuration errors (expansion, placement).
    pub errors: Vec<ConfigError>,
}

impl InstallReport {
    /// Whether the run completed without conflicts or declaration errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.errors.is_empty()
    }

    /// Total number of problems to report.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.conflicts.len() + self.errors.len()
    }
}

/// Apply the profile's symlinks and copies to the context's home
/// directory.
///
/// Idempotent: a second run against unchanged state applies nothing and
/// reports no conflicts. With `dry_run` set, nothing on the filesystem is
/// touched and would-be actions are logged instead.
pub fn install(profile: &Profile, ctx: &dyn Context, log: &Logger, dry_run: bool) -> InstallReport {
    let mut report = InstallReport::default();

    for (target, source) in &profile.symlinks {
        if let Some((source, target)) = resolve(profile, ctx, target, source, &mut report) {
            run_effect(
                &SymlinkEffect::new(source, target),
                profile,
                log,
                dry_run,
                &mut report,
            );
        }
    }

    for (target, source) in &profile.copies {
        if let Some((source, target)) = resolve(profile, ctx, target, source, &mut report) {
            run_effect(
                &CopyEffect::new(source, target),
                profile,
                log,
                dry_run,
                &mut report,
            );
        }
    }

    report
}

/// Resolve one declaration into absolute `(source, target)` paths.
///
/// The target is expanded and anchored under the home directory; the
/// source is expanded and anchored under the profile directory. A target
/// resolving outside (or onto) the home directory is rejected — a profile
/// must not reach past the environment it manages.
fn resolve(
    profile: &Profile,
    ctx: &dyn Context,
    target: &str,
    source: &str,
    report: &mut InstallReport,
) -> Option<(PathBuf, PathBuf)> {
    let target_abs = match expand::expand(target, ctx) {
        Ok(expanded) => {
            let path = PathBuf::from(expanded);
            if path.is_absolute() {
                path
            } else {
                ctx.home().join(path)
            }
        }
        Err(unset) => {
            report.errors.push(ConfigError::Expand {
                profile: profile.name.clone(),
                value: target.to_string(),
                var: unset.0,
            });
            return None;
        }
    };

    if !target_abs.starts_with(ctx.home()) || target_abs == ctx.home() {
        report.errors.push(ConfigError::OutsideHome {
            profile: profile.name.clone(),
            target: target_abs,
        });
        return None;
    }

    let source_abs = match expand::expand(source, ctx) {
        Ok(expanded) => profile.dir.join(expanded),
        Err(unset) => {
            report.errors.push(ConfigError::Expand {
                profile: profile.name.clone(),
                value: source.to_string(),
                var: unset.0,
            });
            return None;
        }
    };

    Some((source_abs, target_abs))
}

/// Drive one effect through the check-then-apply state machine.
fn run_effect(
    effect: &dyn Effect,
    profile: &Profile,
    log: &Logger,
    dry_run: bool,
    report: &mut InstallReport,
) {
    match effect.current_state() {
        Ok(EffectState::Correct) => {
            log.debug(&format!("ok: {}", effect.description()));
            report.unchanged += 1;
        }
        Ok(EffectState::Skipped { reason }) => {
            log.warn(&format!("skipping {}: {reason}", effect.description()));
            report.skipped += 1;
        }
        Ok(EffectState::Conflict { current }) => {
            log.debug(&format!("conflict: {} ({current})", effect.description()));
            report.conflicts.push(effect.conflict(&profile.name));
        }
        Ok(EffectState::Missing) => {
            if dry_run {
                log.dry_run(&format!("would create {}", effect.description()));
                report.applied += 1;
                return;
            }
            match effect.apply() {
                Ok(()) => {
                    log.debug(&format!("created {}", effect.description()));
                    report.applied += 1;
                }
                Err(err) => {
                    log.error(&format!("{}: {err:#}", effect.description()));
                    report.skipped += 1;
                }
            }
        }
        Err(err) => {
            log.error(&format!("{}: {err:#}", effect.description()));
            report.skipped += 1;
        }
    }
}
