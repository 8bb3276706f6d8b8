//! List command report data structures.

use ctbind_core::DeclKind;

use super::output::{Output, Report};

/// One top-level declaration.
#[derive(Debug, Clone)]
pub struct DeclarationInfo {
    pub kind: DeclKind,
    pub name: String,
    /// `file:line:column`
    pub location: String,
    pub definition: bool,
}

/// Report data from listing a header's declarations.
#[derive(Debug)]
pub struct ListReport {
    /// Main file of the translation unit.
    pub header: String,
    pub declarations: Vec<DeclarationInfo>,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.declarations.is_empty() {
            out.preformatted(&format!("No declarations in {}", self.header));
            return;
        }

        out.section(&format!("Declarations in {}", self.header));
        let width = self
            .declarations
            .iter()
            .map(|decl| decl.kind.as_str().len())
            .max()
            .unwrap_or(0);
        for decl in &self.declarations {
            let name = if decl.name.is_empty() {
                "<anonymous>"
            } else {
                decl.name.as_str()
            };
            let marker = if decl.definition || !decl.kind.is_record() {
                ""
            } else {
                " (declaration only)"
            };
            out.preformatted(&format!(
                "  {:width$}  {}{}  {}",
                decl.kind.as_str(),
                name,
                marker,
                decl.location,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::RecordedOutput;

    #[test]
    fn test_render_aligns_kinds() {
        let report = ListReport {
            header: "t.h".to_string(),
            declarations: vec![
                DeclarationInfo {
                    kind: DeclKind::Macro,
                    name: "LIMIT".to_string(),
                    location: "t.h:1:9".to_string(),
                    definition: false,
                },
                DeclarationInfo {
                    kind: DeclKind::Struct,
                    name: "pool".to_string(),
                    location: "t.h:2:1".to_string(),
                    definition: false,
                },
            ],
        };
        let mut out = RecordedOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.stdout,
            vec![
                "Declarations in t.h:",
                "  macro   LIMIT  t.h:1:9",
                "  struct  pool (declaration only)  t.h:2:1",
            ]
        );
    }

    #[test]
    fn test_render_empty() {
        let report = ListReport {
            header: "t.h".to_string(),
            declarations: Vec::new(),
        };
        let mut out = RecordedOutput::default();
        report.render(&mut out);
        assert_eq!(out.stdout, vec!["No declarations in t.h"]);
    }
}
