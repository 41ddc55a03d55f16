use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use kiln_core::Overwrite;
use kiln_manifest::{KilnToml, Stack};

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to kiln.toml (defaults to ./kiln.toml)
    #[arg(short, long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Target stack (overrides the kiln.toml setting)
    #[arg(short, long)]
    pub stack: Option<Stack>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Leave files that already exist untouched
    #[arg(long)]
    pub keep_existing: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let kiln_toml = KilnToml::open(&self.config).unwrap_or_exit();
        let manifest = kiln_toml.manifest();

        let opts = GenerateOptions {
            output_dir: &self.output,
            stack: self.stack.unwrap_or(manifest.project.stack),
            dry_run: self.dry_run,
            overwrite: if self.keep_existing {
                Overwrite::IfMissing
            } else {
                Overwrite::Always
            },
        };
        let report = ops::generate(manifest, opts)?;
        report.render(&mut TerminalOutput::new());

        // Every other class is already written
        if !report.is_complete() {
            std::process::exit(1);
        }
        Ok(())
    }
}
