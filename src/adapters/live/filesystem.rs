//! Live filesystem adapter using `std::fs`.

use std::fs;
use std::path::Path;

use crate::ports::filesystem::FileSystem;
use crate::ports::PortResult;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk(&self, root: &Path, skip_dirs: &[String]) -> PortResult<Vec<String>> {
        let mut files = Vec::new();
        collect(root, "", skip_dirs, &mut files)?;
        files.sort();
        Ok(files)
    }
}

/// Depth-first collection of regular files, `prefix` being the path of `dir`
/// relative to the walk root.
fn collect(dir: &Path, prefix: &str, skip_dirs: &[String], out: &mut Vec<String>) -> PortResult<()> {
    for entry in fs::read_dir(dir).map_err(|e| format!("read_dir {}: {e}", dir.display()))? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        let rel = if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if name == ".git" || skip_dirs.iter().any(|s| *s == name) {
                continue;
            }
            collect(&entry.path(), &rel, skip_dirs, out)?;
        } else if file_type.is_file() {
            out.push(rel);
        }
    }
    Ok(())
}
