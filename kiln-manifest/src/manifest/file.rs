use std::path::{Path, PathBuf};

use super::Manifest;
use crate::Result;

/// A kiln.toml file with both raw content and parsed manifest.
pub struct KilnToml {
    path: PathBuf,
    manifest: Manifest,
}

impl KilnToml {
    /// Open and parse a kiln.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(crate::Error::Read {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self { path, manifest })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory containing the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.toml");
        std::fs::write(
            &path,
            "[project]\nname = \"shop\"\nstack = \"spring\"\n\n[classes.Order]\n",
        )
        .unwrap();

        let file = KilnToml::open(&path).unwrap();
        assert_eq!(file.manifest().project.name, "shop");
        assert!(file.manifest().has_class("Order"));
        assert_eq!(file.dir(), temp.path());
    }
}
