//! The `profile` command: emit shell statements for the active profiles.
//!
//! Designed to be evaluated by the login shell:
//!
//! ```sh
//! eval "$(homeenv profile)"
//! ```
//!
//! Statements go to stdout; all diagnostics stay on stderr.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::scan;
use crate::context::{Context as _, SystemContext};
use crate::emit;
use crate::logging::Logger;

/// Run the profile command.
///
/// # Errors
///
/// Returns an error if the process context cannot be captured or the
/// active profiles declare an incoherent environment (one variable as
/// both a string and a list).
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let ctx = SystemContext::new()?;
    let root = super::resolve_root(global, &ctx);

    let outcome = scan::active_profiles(&root, &ctx);
    for err in &outcome.errors {
        log.warn(&err.to_string());
    }

    let names = outcome
        .profiles
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    log.debug(&format!("host {}: active profiles: {names}", ctx.hostname()));

    let lines = emit::emit_shell_env(&outcome.profiles, &ctx)?;
    for line in &lines {
        println!("{line}");
    }
    Ok(())
}
