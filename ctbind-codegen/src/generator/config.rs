use crate::builder::Indent;

/// The native library functions are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeLibrary {
    /// Python variable holding the loaded library.
    pub handle: String,
    /// Argument passed to `cdll.LoadLibrary`.
    pub path: String,
}

impl NativeLibrary {
    pub fn new(handle: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            path: path.into(),
        }
    }

    /// The statement loading the library.
    pub fn load_statement(&self) -> String {
        let path = self.path.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{} = cdll.LoadLibrary(\"{}\")", self.handle, path)
    }
}

/// Settings for one generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Required when any function is included.
    pub library: Option<NativeLibrary>,
    pub indent: Indent,
}

impl GeneratorConfig {
    pub fn with_library(mut self, library: NativeLibrary) -> Self {
        self.library = Some(library);
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_statement_escapes_path() {
        let library = NativeLibrary::new("_lib", r#"C:\libs\jpeg "8".dll"#);
        assert_eq!(
            library.load_statement(),
            r#"_lib = cdll.LoadLibrary("C:\\libs\\jpeg \"8\".dll")"#
        );
    }
}
