//! Knowledge-base directory resolution
//!
//! Search order, first existing directory wins:
//!
//! 1. `--data-dir` / `TRIZ_DATA_DIR` (no fallback when given)
//! 2. `<executable dir>/data` (packaged layout)
//! 3. `<workspace>/data` (development layout)
//! 4. `./data`

use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "data";

/// No candidate directory existed
#[derive(Debug)]
pub struct DataDirNotFound {
    pub tried: Vec<PathBuf>,
}

impl std::fmt::Display for DataDirNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "knowledge base directory not found (tried:")?;
        for path in &self.tried {
            write!(f, " {}", path.display())?;
        }
        write!(f, ")")
    }
}

pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, DataDirNotFound> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => default_candidates(),
    };
    candidates
        .iter()
        .find(|path| path.is_dir())
        .cloned()
        .ok_or(DataDirNotFound { tried: candidates })
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(DATA_DIR_NAME));
    }
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(DATA_DIR_NAME));
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(DATA_DIR_NAME));
    }
    candidates
}
