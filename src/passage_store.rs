//! On-disk cache of computed passages.
//!
//! Each passage is stored as JSON wrapped in an envelope carrying
//! [`STORE_SCHEMA_VERSION`]. Entries written under a different version are
//! reported as [`Error::CacheVersion`] instead of being deserialized.

use crate::error::{Error, Result};
use crate::passage::Passage;
use serde::{Serialize, Deserialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const STORE_SCHEMA_VERSION: u32 = 1;
pub const CACHE_DIR_NAME: &str = "cached";

pub trait PassageStore {
  fn has(&self, key: &str) -> bool;
  fn load(&self, key: &str) -> Result<Passage>;
  fn save(&self, key: &str, passage: &Passage) -> Result<()>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
  version: u32,
  passage: &'a Passage
}

#[derive(Deserialize)]
struct VersionProbe {
  version: u32
}

#[derive(Deserialize)]
struct Envelope {
  passage: Passage
}

/// Stores passages as `<dir>/<key>.json`.
pub struct JsonPassageStore {
  dir: PathBuf
}

impl JsonPassageStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    JsonPassageStore { dir: dir.into() }
  }

  /// Store in the `cached` subdirectory of a corpus directory.
  pub fn for_corpus(corpus_dir: &Path) -> Self {
    Self::new(corpus_dir.join(CACHE_DIR_NAME))
  }

  pub fn path_for(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{}.json", key))
  }
}

impl PassageStore for JsonPassageStore {
  fn has(&self, key: &str) -> bool {
    self.path_for(key).is_file()
  }

  fn load(&self, key: &str) -> Result<Passage> {
    let path = self.path_for(key);
    let bytes = fs::read(&path).map_err(|e| Error::io_at(&path, e))?;

    let probe: VersionProbe = serde_json::from_slice(&bytes)?;
    if probe.version != STORE_SCHEMA_VERSION {
      return Err(Error::CacheVersion { path, found: probe.version, expected: STORE_SCHEMA_VERSION });
    }

    let envelope: Envelope = serde_json::from_slice(&bytes)?;
    Ok(envelope.passage)
  }

  fn save(&self, key: &str, passage: &Passage) -> Result<()> {
    fs::create_dir_all(&self.dir).map_err(|e| Error::io_at(&self.dir, e))?;

    let temp_file = NamedTempFile::new_in(&self.dir)?;
    {
      let mut writer = BufWriter::new(&temp_file);
      serde_json::to_writer(&mut writer, &EnvelopeRef { version: STORE_SCHEMA_VERSION, passage })?;
      writer.flush()?;
    }

    let path = self.path_for(key);
    temp_file.persist(&path).map_err(|e| Error::io_at(&path, e.error))?;
    Ok(())
  }
}
