//! Asset copy-through.
//!
//! Copy entries in the project manifest name either a single file or a
//! whole directory. A directory copy is attempted first; when the source
//! turns out to be a plain file the attempt fails with a not-a-directory
//! condition and falls back to a single-file copy.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Copy `src` to `dst`, directory-or-file transparently. Any failure other
/// than the not-a-directory fallback propagates to the caller.
pub fn copy_entry(src: &Path, dst: &Path) -> io::Result<()> {
    match copy_dir(src, dst) {
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput
            ) =>
        {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(src, dst).map(|_| ())
        }
        other => other,
    }
}

/// Recursively copy the directory `src` to `dst`, reproducing its full
/// subtree. Fails with `NotADirectory` when `src` is a plain file.
fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    // Classifies the source up front: plain files surface NotADirectory
    // here, which copy_entry turns into the single-file fallback.
    fs::read_dir(src)?;

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn plain_file_falls_back_to_single_copy() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("notes.txt");
        write(&src, "hello");

        let dst = dir.path().join("out/notes.txt");
        copy_entry(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst).unwrap(), "hello");
    }

    #[test]
    fn file_copy_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("static/logo.svg");
        write(&src, "<svg/>");

        let dst = dir.path().join("out/static/logo.svg");
        copy_entry(&src, &dst).unwrap();
        assert!(dst.is_file());
    }

    #[test]
    fn directory_copy_reproduces_the_subtree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("static");
        write(&src.join("css/site.css"), "body{}");
        write(&src.join("img/icons/a.svg"), "<svg/>");
        write(&src.join("robots.txt"), "ok");
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = dir.path().join("out/static");
        copy_entry(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("css/site.css")).unwrap(), "body{}");
        assert_eq!(
            fs::read_to_string(dst.join("img/icons/a.svg")).unwrap(),
            "<svg/>"
        );
        assert_eq!(fs::read_to_string(dst.join("robots.txt")).unwrap(), "ok");
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn missing_source_propagates() {
        let dir = TempDir::new().unwrap();
        let err = copy_entry(
            &dir.path().join("nowhere"),
            &PathBuf::from(dir.path().join("out/nowhere")),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
