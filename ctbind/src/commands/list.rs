use std::path::PathBuf;

use clap::Args;
use ctbind_core::DeclKind;
use eyre::Result;

use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {
    /// Translation unit JSON written by a parser adapter
    #[arg(short, long)]
    pub ast: PathBuf,

    /// Only list declarations of this kind (struct, union, enum, typedef, function, macro)
    #[arg(short, long)]
    pub kind: Option<DeclKind>,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::list(&self.ast, self.kind)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
