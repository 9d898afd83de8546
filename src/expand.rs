//! Home-directory and environment-variable expansion for declared paths.
//!
//! Descriptor values may reference `~`, `$VAR`, or `${VAR}`. Expansion is
//! driven entirely by the supplied [`Context`] so the engine stays pure:
//! an unset variable yields [`UnsetVar`], which the selector evaluator
//! maps to "nonexistent path" (false) and the installer reports as a
//! configuration error.

use thiserror::Error;

use crate::context::Context;

/// A referenced environment variable is not set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("environment variable '{0}' is not set")]
pub struct UnsetVar(pub String);

/// Expand `~` and `$VAR` / `${VAR}` references in `input`.
///
/// A leading `~` (alone or followed by `/`) becomes the context's home
/// directory. `$` followed by anything that does not form a variable name
/// is kept literally.
///
/// # Errors
///
/// Returns [`UnsetVar`] when a referenced variable has no value in the
/// context.
pub fn expand(input: &str, ctx: &dyn Context) -> Result<String, UnsetVar> {
    let home = ctx.home().to_string_lossy().into_owned();

    let tilde_expanded = if input == "~" {
        home
    } else if let Some(rest) = input.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else {
        input.to_string()
    };

    expand_vars(&tilde_expanded, ctx)
}

/// Substitute `$VAR` and `${VAR}` tokens.
fn expand_vars(input: &str, ctx: &dyn Context) -> Result<String, UnsetVar> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let braced = matches!(chars.peek(), Some((_, '{')));
        if braced {
            chars.next();
        }

        let mut name = String::new();
        while let Some((_, nc)) = chars.peek().copied() {
            let valid = if name.is_empty() {
                nc.is_ascii_alphabetic() || nc == '_'
            } else {
                nc.is_ascii_alphanumeric() || nc == '_'
            };
            if !valid {
                break;
            }
            name.push(nc);
            chars.next();
        }

        if braced {
            match chars.peek().copied() {
                Some((_, '}')) if !name.is_empty() => {
                    chars.next();
                }
                _ => {
                    // malformed ${...}; keep it literal
                    out.push('$');
                    out.push('{');
                    out.push_str(&name);
                    continue;
                }
            }
        } else if name.is_empty() {
            out.push('$');
            continue;
        }

        match ctx.env_var(&name) {
            Some(value) => out.push_str(&value),
            None => return Err(UnsetVar(name)),
        }
    }

    Ok(out)
}
