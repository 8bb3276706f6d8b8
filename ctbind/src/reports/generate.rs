//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from module generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Path of the module; `None` for previews.
    pub output: Option<PathBuf>,
    /// Whether the module was written (false when an existing file was kept).
    pub written: bool,
    /// Module text, for previews.
    pub code: Option<String>,
    /// Unexposed dependency warnings.
    pub warnings: Vec<String>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if let Some(code) = &self.code {
            out.preformatted(code.trim_end_matches('\n'));
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        if let Some(output) = &self.output {
            if self.written {
                out.preformatted(&format!("Generated: {}", output.display()));
            } else {
                out.preformatted(&format!("Kept existing: {}", output.display()));
            }
        }
    }
}
