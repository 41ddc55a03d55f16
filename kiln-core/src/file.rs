use std::{fs, path::Path};

use eyre::{Result, WrapErr};

/// What to do when a generated file already exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Regenerate the file.
    #[default]
    Always,
    /// Keep the file on disk, e.g. after hand edits.
    IfMissing,
}

impl Overwrite {
    /// Whether a file at `path` may be (re)written.
    pub fn permits(&self, path: &Path) -> bool {
        match self {
            Overwrite::Always => true,
            Overwrite::IfMissing => !path.exists(),
        }
    }
}

/// Outcome of writing one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    /// Left alone under [`Overwrite::IfMissing`].
    Skipped,
}

/// Write `content` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create directory {}", dir.display()))?;
    }
    fs::write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// Write a generated file unless the overwrite policy keeps the existing one.
pub fn write_generated(path: &Path, content: &str, overwrite: Overwrite) -> Result<WriteResult> {
    if !overwrite.permits(path) {
        return Ok(WriteResult::Skipped);
    }
    write_file(path, content)?;
    Ok(WriteResult::Written)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_creates_package_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src/main/java/com/example/entity/Order.java");

        write_file(&path, "class Order {}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "class Order {}");
    }

    #[test]
    fn test_if_missing_only_creates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shop/models/order.py");

        assert_eq!(
            write_generated(&path, "first", Overwrite::IfMissing).unwrap(),
            WriteResult::Written
        );
        assert_eq!(
            write_generated(&path, "second", Overwrite::IfMissing).unwrap(),
            WriteResult::Skipped
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_write_error_names_the_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("src");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_file(&blocker.join("entities/order.entity.ts"), "").unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }
}
