use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the homeenv engine.
#[derive(Parser, Debug)]
#[command(
    name = "homeenv",
    about = "Profile-based home environment management engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the configuration root directory (default: ~/.homeenv)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply the named profile's symlinks and copies to the home directory
    Install(InstallOpts),
    /// Print shell statements for all active profiles (evaluate from your login shell)
    Profile,
    /// List profiles and whether their selectors currently hold
    List,
    /// Create a profile if needed and open its descriptor in $EDITOR
    Edit(EditOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Profile to install
    pub profile: String,
}

/// Options for the `edit` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct EditOpts {
    /// Profile to edit
    pub profile: String,

    /// Fail if the profile already exists
    #[arg(long)]
    pub create: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_with_profile() {
        let cli = Cli::parse_from(["homeenv", "install", "work"]);
        assert!(
            matches!(&cli.command, Command::Install(_)),
            "Expected Install command"
        );
        if let Command::Install(opts) = cli.command {
            assert_eq!(opts.profile, "work");
        }
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["homeenv", "--dry-run", "install", "work"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["homeenv", "-d", "install", "work"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_profile() {
        let cli = Cli::parse_from(["homeenv", "profile"]);
        assert!(matches!(cli.command, Command::Profile));
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["homeenv", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parse_edit_with_create() {
        let cli = Cli::parse_from(["homeenv", "edit", "--create", "scratch"]);
        assert!(
            matches!(&cli.command, Command::Edit(_)),
            "Expected Edit command"
        );
        if let Command::Edit(opts) = cli.command {
            assert_eq!(opts.profile, "scratch");
            assert!(opts.create);
        }
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["homeenv", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["homeenv", "-v", "profile"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_root_override() {
        let cli = Cli::parse_from(["homeenv", "--root", "/tmp/envroot", "list"]);
        assert_eq!(
            cli.global.root,
            Some(std::path::PathBuf::from("/tmp/envroot"))
        );
    }
}
