use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Lists the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into. Symlinks count if they point at a
/// regular file.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let discover = |source| Error::Discover {
        path: dir.to_owned(),
        source,
    };

    let mut files = Vec::new();
    for entry in dir.read_dir().map_err(discover)? {
        let path = entry.map_err(discover)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::list_sources;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn lists_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b\n").unwrap();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "c\n").unwrap();

        let files = list_sources(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        match list_sources(&missing) {
            Err(Error::Discover { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a discover error, got {:?}", other),
        }
    }
}
