//! Top-level subcommand orchestration (thin glue over the engine).
pub mod edit;
pub mod install;
pub mod list;
pub mod profile;

use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::context::Context;

/// Resolve the configuration root directory.
///
/// Precedence: `--root` flag, then the `HOMEENV_ROOT` environment
/// variable, then `~/.homeenv`.
#[must_use]
pub fn resolve_root(global: &GlobalOpts, ctx: &dyn Context) -> PathBuf {
    if let Some(ref root) = global.root {
        return root.clone();
    }
    if let Some(root) = ctx.env_var("HOMEENV_ROOT")
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }
    ctx.home().join(".homeenv")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::FakeContext;

    fn global(root: Option<&str>) -> GlobalOpts {
        GlobalOpts {
            root: root.map(PathBuf::from),
            dry_run: false,
        }
    }

    #[test]
    fn resolve_root_uses_explicit_flag_first() {
        let ctx = FakeContext::new().with_env("HOMEENV_ROOT", "/from/env");
        let root = resolve_root(&global(Some("/explicit")), &ctx);
        assert_eq!(root, PathBuf::from("/explicit"));
    }

    #[test]
    fn resolve_root_falls_back_to_env_var() {
        let ctx = FakeContext::new().with_env("HOMEENV_ROOT", "/from/env");
        let root = resolve_root(&global(None), &ctx);
        assert_eq!(root, PathBuf::from("/from/env"));
    }

    #[test]
    fn resolve_root_ignores_empty_env_var() {
        let ctx = FakeContext::new()
            .with_home("/home/sam")
            .with_env("HOMEENV_ROOT", "");
        let root = resolve_root(&global(None), &ctx);
        assert_eq!(root, PathBuf::from("/home/sam/.homeenv"));
    }

    #[test]
    fn resolve_root_defaults_to_dot_homeenv() {
        let ctx = FakeContext::new().with_home("/home/sam");
        let root = resolve_root(&global(None), &ctx);
        assert_eq!(root, PathBuf::from("/home/sam/.homeenv"));
    }
}
