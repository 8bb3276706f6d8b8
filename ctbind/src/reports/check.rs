//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};
use crate::ops::apply::ApplySummary;

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Main header, if set.
    pub header: Option<String>,
    /// `handle = path` of the native library, if set.
    pub library: Option<String>,
    /// One line per rule, in application order.
    pub rules: Vec<String>,
    /// Result of resolving the rules against a header, when one was given.
    pub resolved: Option<ApplySummary>,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();

        if let Some(header) = &self.header {
            out.key_value_indented("header", header);
        }
        if let Some(library) = &self.library {
            out.key_value_indented("library", library);
        }

        let count = self.rules.len();
        out.section(&format!(
            "  {} rule{}",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for rule in &self.rules {
            out.list_item(rule);
        }

        if let Some(resolved) = &self.resolved {
            out.newline();
            out.preformatted(&format!(
                "  resolved: {} included, {} forward, {} opaque",
                resolved.included, resolved.forwards, resolved.opaques
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::RecordedOutput;

    #[test]
    fn test_render() {
        let report = CheckReport {
            config_path: PathBuf::from("ctbind.toml"),
            header: Some("zlib.h".to_string()),
            library: None,
            rules: vec!["include all macros".to_string()],
            resolved: Some(ApplySummary {
                included: 12,
                forwards: 0,
                opaques: 0,
            }),
        };
        let mut out = RecordedOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.stdout,
            vec![
                "✓ ctbind.toml is valid",
                "",
                "  header: zlib.h",
                "  1 rule:",
                "  - include all macros",
                "",
                "  resolved: 12 included, 0 forward, 0 opaque",
            ]
        );
    }
}
