//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string if it exists.
pub fn read_if_exists(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write several files into `dir` as one step.
///
/// Every target is checked first: a target that is a directory or a
/// read-only file fails the call before anything is written. The contents are
/// then written to temporary files in `dir`, and only when all of them were
/// written are they renamed over their targets. A rename that still fails
/// after these checks (e.g. the directory was changed underneath us) can leave
/// earlier targets already replaced.
pub fn write_files_staged<'a, I>(dir: &Path, files: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    ensure_dir(dir)?;

    let files: Vec<(PathBuf, &str)> = files
        .into_iter()
        .map(|(name, contents)| (dir.join(name), contents))
        .collect();

    for (target, _) in &files {
        check_replaceable(target)?;
    }

    let mut staged = Vec::with_capacity(files.len());
    for (target, contents) in files {
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {}", target.display()))?;
        tmp.flush()?;
        staged.push((tmp, target));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, target) in staged {
        tmp.persist(&target)
            .with_context(|| format!("failed to write file: {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}

/// Fail if `target` exists and cannot be replaced by a regular file.
fn check_replaceable(target: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(_) => return Ok(()),
    };

    if meta.is_dir() {
        bail!("cannot write file: {} is a directory", target.display());
    }
    if meta.permissions().readonly() {
        bail!("cannot write file: {} is read-only", target.display());
    }
    Ok(())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Display a path relative to the working directory when possible.
pub fn display_path(path: &Path) -> PathBuf {
    if path.is_relative() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) if path.starts_with(&cwd) => relative_path(&cwd, path),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_files_staged_creates_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a").join("b");

        let written =
            write_files_staged(&out, [("one.txt", "1\n"), ("two.txt", "2\n")]).unwrap();

        assert_eq!(written, vec![out.join("one.txt"), out.join("two.txt")]);
        assert_eq!(fs::read_to_string(out.join("one.txt")).unwrap(), "1\n");
        assert_eq!(fs::read_to_string(out.join("two.txt")).unwrap(), "2\n");
    }

    #[test]
    fn test_write_files_staged_overwrites_and_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.txt"), "old").unwrap();

        write_files_staged(tmp.path(), [("one.txt", "new")]).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join("one.txt")).unwrap(), "new");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_files_staged_directory_target_leaves_siblings_stale() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "old").unwrap();
        fs::write(tmp.path().join("b.txt"), "old").unwrap();
        fs::create_dir(tmp.path().join("c.txt")).unwrap();
        fs::write(tmp.path().join("c.txt").join("inner"), "x").unwrap();

        let err = write_files_staged(
            tmp.path(),
            [("a.txt", "new"), ("b.txt", "new"), ("c.txt", "new")],
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("is a directory"));
        assert_eq!(fs::read_to_string(tmp.path().join("a.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(tmp.path().join("b.txt")).unwrap(), "old");
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_read_if_exists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("f.txt");
        assert_eq!(read_if_exists(&path).unwrap(), None);
        fs::write(&path, "x").unwrap();
        assert_eq!(read_if_exists(&path).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c/d.h")),
            PathBuf::from("c/d.h")
        );
    }
}
