use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, SearchCommands};

/// Top-level CLI parser for the `lko` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lko",
    version,
    about = "Lookout - identity lookups across public sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (no live results or spinner)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use lookout_core::QueryKind;

    use super::{Cli, Commands, OutputFormat, SearchCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["lko", "--format", "json", "--verbose", "credits"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Credits));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["lko", "status", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["lko", "--format", "xml", "status"]).is_err());
    }

    #[test]
    fn search_username_with_source_filter() {
        let cli = Cli::try_parse_from([
            "lko", "search", "username", "octocat", "--only", "github,reddit",
        ])
        .expect("cli should parse");

        let Commands::Search { target } = cli.command else {
            panic!("expected search");
        };
        let SearchCommands::Username(args) = target else {
            panic!("expected username search");
        };
        assert_eq!(args.value, "octocat");
        assert_eq!(args.sources.only, vec!["github", "reddit"]);
    }

    #[test]
    fn search_phone_takes_country_code() {
        let cli = Cli::try_parse_from([
            "lko",
            "search",
            "phone",
            "06 12 34 56 78",
            "--country-code",
            "33",
        ])
        .expect("cli should parse");

        let Commands::Search {
            target: SearchCommands::Phone(args),
        } = cli.command
        else {
            panic!("expected phone search");
        };
        assert_eq!(args.country_code.as_deref(), Some("33"));
    }

    #[test]
    fn search_fullname_defaults_to_insee() {
        let cli = Cli::try_parse_from(["lko", "search", "fullname", "Jean Dupont"])
            .expect("cli should parse");

        let Commands::Search {
            target: SearchCommands::Fullname(args),
        } = cli.command
        else {
            panic!("expected fullname search");
        };
        assert_eq!(args.r#type, "insee");
        assert_eq!(args.postal_code, None);
    }

    #[test]
    fn trigger_parses_kind() {
        let cli = Cli::try_parse_from(["lko", "trigger", "someone@example.com", "--as", "email"])
            .expect("cli should parse");

        let Commands::Trigger(args) = cli.command else {
            panic!("expected trigger");
        };
        assert_eq!(args.kind, QueryKind::Email);
    }

    #[test]
    fn register_takes_account_fields() {
        let cli = Cli::try_parse_from([
            "lko",
            "register",
            "--username",
            "neo",
            "--email",
            "neo@example.com",
            "--password",
            "zion",
            "--confirm-password",
            "zion",
            "--accept-terms",
        ])
        .expect("cli should parse");

        let Commands::Register(args) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.username, "neo");
        assert!(args.accept_terms);
    }

    #[test]
    fn login_requires_token() {
        assert!(Cli::try_parse_from(["lko", "login"]).is_err());
        assert!(Cli::try_parse_from(["lko", "login", "--token", "abc"]).is_ok());
    }
}
