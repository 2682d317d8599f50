use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const TEXT_EXTENSION: &str = "txt";

/// Text files directly inside `dir`, sorted by path.
pub fn list_text_units(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut paths = vec![];
  for entry in fs::read_dir(dir).map_err(|e| Error::io_at(dir, e))? {
    let path = entry?.path();
    if path.is_file() && path.extension().map_or(false, |e| e == TEXT_EXTENSION) {
      paths.push(path);
    }
  }
  paths.sort();
  Ok(paths)
}

/// The key a text unit is cached under: its file name without extension.
pub fn unit_key(path: &Path) -> String {
  path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}
