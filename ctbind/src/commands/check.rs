use std::path::PathBuf;

use clap::Args;
use ctbind_manifest::CtbindToml;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to ctbind.toml (defaults to ./ctbind.toml)
    #[arg(short, long, default_value = "ctbind.toml")]
    pub config: PathBuf,

    /// Also resolve the rules against this translation unit JSON
    #[arg(short, long)]
    pub ast: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let toml = CtbindToml::open(&self.config).unwrap_or_exit();
        let report = ops::check(toml.manifest(), &self.config, self.ast.as_deref())?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
