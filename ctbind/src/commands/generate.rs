use std::path::PathBuf;

use clap::Args;
use ctbind_manifest::{CtbindToml, Manifest};
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Translation unit JSON written by a parser adapter
    #[arg(short, long)]
    pub ast: PathBuf,

    /// Path to ctbind.toml; without it every declaration of the main header is emitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output module (defaults to module.output from ctbind.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the module to stdout without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Do not overwrite an existing output file
    #[arg(long)]
    pub keep_existing: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let toml = self
            .config
            .as_ref()
            .map(|path| CtbindToml::open(path).unwrap_or_exit());
        let manifest = toml
            .as_ref()
            .map(CtbindToml::manifest)
            .cloned()
            .unwrap_or_default();

        let output = self.output_path(&manifest, toml.as_ref());
        if output.is_none() && !self.dry_run {
            eyre::bail!("no output path; pass --output, set module.output, or use --dry-run");
        }

        let report = ops::generate(
            &manifest,
            GenerateOptions {
                ast: &self.ast,
                output: if self.dry_run { None } else { output.as_deref() },
                keep_existing: self.keep_existing,
            },
        )?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }

    /// `--output`, else `module.output` relative to the manifest.
    fn output_path(&self, manifest: &Manifest, toml: Option<&CtbindToml>) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let configured = manifest.module.output.as_ref()?;
        Some(match toml {
            Some(toml) => toml.base_dir().join(configured),
            None => configured.clone(),
        })
    }
}
