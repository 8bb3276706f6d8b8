//! Diagnostics reported alongside a generated module.
//!
//! Diagnostics never change the generated code; they describe problems the
//! generated module may hit at run time.

use std::{collections::BTreeSet, fmt};

use ctbind_core::DeclKind;
use serde::Serialize;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// A fatal error that prevents further processing.
    Error,
    /// A warning that doesn't prevent processing but should be addressed.
    Warning,
    /// Informational message about the generation process.
    Info,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a generation phase.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The phase that produced this diagnostic.
    pub phase: String,
    /// The diagnostic message.
    pub message: String,
    /// Optional source location (e.g., "jpeglib.h:12:1").
    pub location: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            phase: phase.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            phase: phase.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Create a new info diagnostic.
    pub fn info(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            phase: phase.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Add a location to this diagnostic.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

/// A declaration that is not emitted although emitted code refers to it.
///
/// Loading the generated module fails with a `NameError` when the name is
/// evaluated at import time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnexposedDependency {
    /// Name of the missing declaration.
    pub name: String,
    pub kind: DeclKind,
    /// Where the missing declaration is written.
    pub location: String,
    /// Names of the emitted declarations referring to it, sorted.
    pub referrers: BTreeSet<String>,
}

impl UnexposedDependency {
    pub const CODE: &'static str = "W1040";

    /// The warning as a pipeline diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let referrers: Vec<&str> = self.referrers.iter().map(String::as_str).collect();
        Diagnostic::warning(
            "emit",
            format!(
                "{} '{}' is not exposed but is referred to by [{}]",
                self.kind,
                self.name,
                referrers.join(", ")
            ),
        )
        .at(self.location.clone())
    }
}

impl fmt::Display for UnexposedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let referrers: Vec<&str> = self.referrers.iter().map(String::as_str).collect();
        writeln!(f, "WARNING: {} [{}]", self.name, self.kind)?;
        writeln!(
            f,
            "> execution error {}: This declaration is unexposed, but there are other",
            Self::CODE
        )?;
        writeln!(f, "> declarations that refer to it. This could cause")?;
        writeln!(f, "> \"NameError: name is not defined\" run time error.")?;
        write!(f, "> Declarations: [{}]", referrers.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UnexposedDependency {
        UnexposedDependency {
            name: "jpeg_error_mgr".to_string(),
            kind: DeclKind::Struct,
            location: "jpeglib.h:12:1".to_string(),
            referrers: ["err_ptr".to_string(), "cinfo".to_string()].into(),
        }
    }

    #[test]
    fn test_diagnostic_with_location() {
        let diag = Diagnostic::error("emit", "no library configured").at("t.h:3:1");
        assert!(diag.severity.is_error());
        assert_eq!(diag.to_string(), "error: no library configured (at t.h:3:1)");
    }

    #[test]
    fn test_unexposed_warning_text() {
        assert_eq!(
            sample().to_string(),
            "WARNING: jpeg_error_mgr [struct]\n\
             > execution error W1040: This declaration is unexposed, but there are other\n\
             > declarations that refer to it. This could cause\n\
             > \"NameError: name is not defined\" run time error.\n\
             > Declarations: [cinfo, err_ptr]"
        );
    }

    #[test]
    fn test_unexposed_as_diagnostic() {
        let diag = sample().to_diagnostic();
        assert!(diag.severity.is_warning());
        assert_eq!(diag.phase, "emit");
        assert_eq!(
            diag.message,
            "struct 'jpeg_error_mgr' is not exposed but is referred to by [cinfo, err_ptr]"
        );
        assert_eq!(diag.location.as_deref(), Some("jpeglib.h:12:1"));
    }
}
