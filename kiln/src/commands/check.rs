use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kiln_manifest::KilnToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let kiln_toml = KilnToml::open(&self.config).unwrap_or_exit();
        let report = ops::check(kiln_toml.manifest(), &self.config)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
