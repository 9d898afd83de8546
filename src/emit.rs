//! Shell statement emission for active profiles.
//!
//! `homeenv profile` is evaluated by the login shell, so everything here
//! is pure text generation: no filesystem mutation, and byte-identical
//! output for the same active-profile set. Statement order is PATH first,
//! then env exports, then `onlogin` commands — login commands observe the
//! fully prepared environment.

use std::path::PathBuf;

use crate::config::{EnvValue, Profile};
use crate::context::Context;
use crate::error::ConfigError;
use crate::expand;

/// Merged value of one environment variable across profiles.
#[derive(Debug)]
enum MergedValue {
    /// Scalar: later profiles overwrite earlier ones (last-write-wins).
    Scalar(String),
    /// Path list: later profiles append to earlier ones.
    Paths(Vec<String>),
}

/// Render the shell statements for the given active profiles, in
/// enumeration order.
///
/// PATH handling: each profile's `path` entries resolve to absolute
/// directories under the profile, and a single
/// `export PATH="p1:p2:$PATH"` statement prepends them all, keeping the
/// first-listed profile's directories first. (Emitting one prepend per
/// profile would invert that order at evaluation time.)
///
/// Env handling: scalar variables are single-quoted and last-write-wins
/// across profiles; list variables accumulate across profiles and append
/// to the variable's pre-existing value from the invoking environment.
///
/// # Errors
///
/// Returns [`ConfigError::EnvShape`] when one variable is declared as a
/// scalar in one profile and a list in another — there is no coherent
/// merge for that.
pub fn emit_shell_env(
    profiles: &[Profile],
    ctx: &dyn Context,
) -> Result<Vec<String>, ConfigError> {
    let mut lines = Vec::new();

    let path_dirs = collect_path_dirs(profiles, ctx);
    if !path_dirs.is_empty() {
        lines.push(format!("export PATH=\"{}:$PATH\"", path_dirs.join(":")));
    }

    for (name, value) in merge_env(profiles, ctx)? {
        match value {
            MergedValue::Scalar(v) => {
                lines.push(format!("export {name}='{}'", v.replace('\'', r"'\''")));
            }
            MergedValue::Paths(items) => {
                let joined = items.join(":");
                let line = match ctx.env_var(&name) {
                    Some(current) if !current.is_empty() => {
                        format!("export {name}=\"{current}:{joined}\"")
                    }
                    _ => format!("export {name}=\"{joined}\""),
                };
                lines.push(line);
            }
        }
    }

    for profile in profiles {
        for command in &profile.onlogin {
            lines.push(command.clone());
        }
    }

    Ok(lines)
}

/// Resolve every `path` entry to an absolute directory, first-listed
/// profile first. An entry whose expansion fails (unset variable) is
/// dropped, matching the selector engine's view of such paths.
fn collect_path_dirs(profiles: &[Profile], ctx: &dyn Context) -> Vec<String> {
    let mut dirs = Vec::new();
    for profile in profiles {
        for entry in &profile.path {
            let Ok(expanded) = expand::expand(entry, ctx) else {
                continue;
            };
            let path = PathBuf::from(expanded);
            let abs = if path.is_absolute() {
                path
            } else {
                profile.dir.join(path)
            };
            dirs.push(abs.to_string_lossy().into_owned());
        }
    }
    dirs
}

/// Merge env declarations across profiles, preserving first-appearance
/// order of variable names.
fn merge_env(
    profiles: &[Profile],
    ctx: &dyn Context,
) -> Result<Vec<(String, MergedValue)>, ConfigError> {
    let mut merged: Vec<(String, MergedValue)> = Vec::new();

    for profile in profiles {
        for (name, value) in &profile.env {
            let resolved = match value {
                EnvValue::Literal(v) => MergedValue::Scalar(v.clone()),
                EnvValue::Paths(items) => {
                    let mut resolved = Vec::with_capacity(items.len());
                    for item in items {
                        let Ok(expanded) = expand::expand(item, ctx) else {
                            continue;
                        };
                        let path = PathBuf::from(expanded);
                        let abs = if path.is_absolute() {
                            path
                        } else {
                            profile.dir.join(path)
                        };
                        resolved.push(abs.to_string_lossy().into_owned());
                    }
                    MergedValue::Paths(resolved)
                }
            };

            let shape_error = || ConfigError::EnvShape {
                profile: profile.name.clone(),
                var: name.clone(),
            };
            let existing = merged.iter().position(|(n, _)| n == name);
            let Some(idx) = existing else {
                merged.push((name.clone(), resolved));
                continue;
            };
            let Some((_, slot)) = merged.get_mut(idx) else {
                continue;
            };
            match slot {
                // last-write-wins for scalars
                MergedValue::Scalar(_) => {
                    let MergedValue::Scalar(v) = resolved else {
                        return Err(shape_error());
                    };
                    *slot = MergedValue::Scalar(v);
                }
                // lists accumulate
                MergedValue::Paths(list) => {
                    let MergedValue::Paths(mut items) = resolved else {
                        return Err(shape_error());
                    };
                    list.append(&mut items);
                }
            }
        }
    }

    Ok(merged)
}
