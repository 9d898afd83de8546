//! The `list` command: show every profile and its activation state.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::scan;
use crate::context::SystemContext;
use crate::logging::Logger;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the process context cannot be captured, or if the
/// scan produced nothing but errors.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let ctx = SystemContext::new()?;
    let root = super::resolve_root(global, &ctx);

    let outcome = scan::list_profiles(&root);
    for err in &outcome.errors {
        log.warn(&err.to_string());
    }

    for profile in &outcome.profiles {
        let state = if profile.is_active(&ctx) {
            "active"
        } else {
            "inactive"
        };
        println!("{:<24} {state}", profile.name);
    }

    if outcome.profiles.is_empty() {
        if outcome.errors.is_empty() {
            log.info(&format!("no profiles under {}", root.display()));
        } else {
            anyhow::bail!("no loadable profiles under {}", root.display());
        }
    }
    Ok(())
}
