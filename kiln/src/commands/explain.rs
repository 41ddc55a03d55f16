use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kiln_manifest::{KilnToml, Stack};

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Stack to show output paths for (overrides the kiln.toml setting)
    #[arg(short, long)]
    pub stack: Option<Stack>,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let kiln_toml = KilnToml::open(&self.config).unwrap_or_exit();
        let manifest = kiln_toml.manifest();
        let stack = self.stack.unwrap_or(manifest.project.stack);

        let report = ops::explain(manifest, &self.config, stack)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
