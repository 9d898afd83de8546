//! The `install` command: apply the named profile's effects to `$HOME`.
use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::scan;
use crate::context::SystemContext;
use crate::install;
use crate::logging::Logger;

/// Run the install command.
///
/// The named profile is the *current* profile — installation is explicit,
/// independent of selector activation. All conflicts of the run are
/// reported together at the end.
///
/// # Errors
///
/// Returns an error if the process context cannot be captured, the named
/// profile does not exist, or any effect conflicted.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let ctx = SystemContext::new()?;
    let root = super::resolve_root(global, &ctx);

    log.stage("Loading profiles");
    let outcome = scan::list_profiles(&root);
    for err in &outcome.errors {
        log.warn(&err.to_string());
    }

    let Some(profile) = outcome.profiles.iter().find(|p| p.name == opts.profile) else {
        let available = outcome
            .profiles
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!(
            "unknown profile: {} (available: {available})",
            opts.profile
        );
    };

    log.stage(&format!("Installing profile '{}'", profile.name));
    let report = install::install(profile, &ctx, log, global.dry_run);

    log.info(&format!(
        "{} created, {} already ok, {} skipped",
        report.applied, report.unchanged, report.skipped
    ));
    for conflict in &report.conflicts {
        log.error(&conflict.to_string());
    }
    for err in &report.errors {
        log.error(&err.to_string());
    }

    if !report.is_clean() {
        anyhow::bail!("{} effect(s) could not be applied", report.problem_count());
    }
    Ok(())
}
