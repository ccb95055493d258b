//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Browse the catalog and download packages.
#[derive(Debug, Parser)]
#[command(name = "appshelf")]
#[command(about = "Browse a package catalog and download artifacts")]
#[command(version)]
pub struct Cli {
    /// Override the data directory for this invocation
    #[arg(long = "data-dir", global = true, env = "APPSHELF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PermissionsCommand;
    use appshelf_core::Permission;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["appshelf", "--verbose", "--data-dir", "/tmp/shelf", "list"]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/shelf")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_download_args() {
        let cli = Cli::parse_from(["appshelf", "download", "com.example.notes", "--no-install"]);
        match cli.command {
            Some(Commands::Download { key, no_install }) => {
                assert_eq!(key, "com.example.notes");
                assert!(no_install);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_permission_grant_parses_alias() {
        let cli = Cli::parse_from(["appshelf", "permissions", "grant", "notifications"]);
        match cli.command {
            Some(Commands::Permissions {
                command: Some(PermissionsCommand::Grant { permission }),
            }) => assert_eq!(permission, Permission::NotificationPost),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_permission_is_rejected() {
        let result = Cli::try_parse_from(["appshelf", "permissions", "grant", "camera"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_permissions_defaults_to_status() {
        let cli = Cli::parse_from(["appshelf", "permissions"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Permissions { command: None })
        ));
    }
}
