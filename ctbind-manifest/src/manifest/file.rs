use std::path::{Path, PathBuf};

use super::Manifest;
use crate::Result;

/// A ctbind.toml file with both raw content and parsed manifest.
#[derive(Debug)]
pub struct CtbindToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl CtbindToml {
    /// Open and parse a ctbind.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(crate::Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory holding the file; relative paths in the manifest resolve
    /// against it.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_open() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[module]\nheader = \"zlib.h\"\n\n[[include]]\nkind = \"macro\"").unwrap();

        let toml = CtbindToml::open(file.path()).unwrap();
        assert_eq!(toml.manifest().module.header.as_deref(), Some("zlib.h"));
        assert!(toml.content().contains("[[include]]"));
        assert_eq!(toml.path(), file.path());
        assert_eq!(Some(toml.base_dir()), file.path().parent());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CtbindToml::open(dir.path().join("ctbind.toml")).unwrap_err();
        assert!(matches!(*err, crate::Error::Io { .. }));
    }
}
