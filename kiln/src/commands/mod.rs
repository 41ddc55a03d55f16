mod check;
mod completions;
mod explain;
mod generate;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use explain::ExplainCommand;
use eyre::Result;
use generate::GenerateCommand;

use crate::logging::Verbosity;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for kiln_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "kiln")]
#[command(version)]
#[command(about = "Generate backend entities, repositories, services and controllers from kiln.toml")]
pub(crate) struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Explain(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate backend code from kiln.toml
    Generate(GenerateCommand),

    /// Validate kiln.toml without generating code
    Check(CheckCommand),

    /// Show the pipeline and what it resolves for every class
    Explain(ExplainCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::parse_from(["kiln", "-vv", "check"]);
        assert_eq!(cli.verbosity(), Verbosity::Verbose(2));

        let cli = Cli::parse_from(["kiln", "check", "--quiet"]);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }
}
