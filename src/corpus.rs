use crate::error::{Error, Result};
use crate::lookup_cache::LookupCache;
use crate::passage::Passage;
use crate::passage_store::{JsonPassageStore, PassageStore};
use crate::text_source::{list_text_units, unit_key};
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const OOV_FILE_NAME: &str = "oovs.txt";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorpusOptions {
  /// Strip stress digits from vowels before counting.
  pub ignore_stress: bool,
  /// Save freshly computed passages to the store.
  pub use_cache: bool,
  /// Reuse passages found in the store.
  pub load_from_cache: bool,
  /// Transcribe fresh passages on the rayon thread pool. Lookups of words
  /// already cached run concurrently; first lookups are serialized.
  pub parallel: bool
}

impl Default for CorpusOptions {
  fn default() -> Self {
    CorpusOptions {
      ignore_stress: true,
      use_cache: true,
      load_from_cache: true,
      parallel: false
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
  Written { path: PathBuf, count: usize },
  NothingToExport
}

pub struct Corpus {
  directory: PathBuf,
  options: CorpusOptions,
  passages: Vec<Passage>,
  oovs: Vec<String>
}

impl Corpus {
  /// Builds a corpus from every text file in `directory`, caching passages
  /// in its `cached` subdirectory.
  pub fn build(directory: &Path, options: CorpusOptions, cache: &LookupCache) -> Result<Corpus> {
    let store = JsonPassageStore::for_corpus(directory);
    Self::build_with_store(directory, options, cache, &store)
  }

  pub fn build_with_store<S: PassageStore + ?Sized>(directory: &Path, options: CorpusOptions, cache: &LookupCache, store: &S) -> Result<Corpus> {
    let units = list_text_units(directory)?;

    let mut slots: Vec<Option<Passage>> = Vec::with_capacity(units.len());
    let mut fresh: Vec<(usize, &PathBuf)> = vec![];

    for (i, path) in units.iter().enumerate() {
      match Self::load_cached(path, &options, store)? {
        Some(passage) => slots.push(Some(passage)),
        None => {
          slots.push(None);
          fresh.push((i, path));
        }
      }
    }

    if !fresh.is_empty() {
      tracing::info!("Loading and analyzing {} passage(s)", fresh.len());
    }

    let built: Vec<(usize, Passage)> = if options.parallel {
      fresh.par_iter()
        .map(|&(i, path)| Passage::from_file(path, None, options.ignore_stress, cache).map(|p| (i, p)))
        .collect::<Result<_>>()?
    } else {
      fresh.iter()
        .map(|&(i, path)| Passage::from_file(path, None, options.ignore_stress, cache).map(|p| (i, p)))
        .collect::<Result<_>>()?
    };

    for (i, passage) in built {
      tracing::info!("Analyzed {}: {} words, {} phonemes", units[i].display(), passage.n_words(), passage.n_phonemes());
      if options.use_cache {
        store.save(&unit_key(&units[i]), &passage)?;
      }
      slots[i] = Some(passage);
    }

    let passages: Vec<Passage> = slots.into_iter().flatten().collect();
    let oovs = find_oovs(&passages);

    Ok(Corpus {
      directory: directory.to_owned(),
      options,
      passages,
      oovs
    })
  }

  fn load_cached<S: PassageStore + ?Sized>(path: &Path, options: &CorpusOptions, store: &S) -> Result<Option<Passage>> {
    let key = unit_key(path);
    if !options.load_from_cache || !store.has(&key) {
      return Ok(None);
    }

    match store.load(&key) {
      Ok(passage) if passage.ignore_stress() == options.ignore_stress => {
        tracing::info!("Loading passage data for {} from cache", path.display());
        Ok(Some(passage))
      }
      Ok(_) => {
        tracing::info!("Cached passage for {} used a different stress setting, rebuilding", path.display());
        Ok(None)
      }
      Err(Error::CacheVersion { path: entry, found, expected }) => {
        tracing::warn!("Ignoring {} (schema version {}, expected {})", entry.display(), found, expected);
        Ok(None)
      }
      Err(e) => Err(e)
    }
  }

  pub fn oovs(&self) -> Vec<String> {
    self.oovs.clone()
  }

  pub fn passages(&self) -> &[Passage] {
    &self.passages
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  pub fn options(&self) -> CorpusOptions {
    self.options
  }

  /// Writes the OOV words one per line to `outpath`, or to `oovs.txt` in the
  /// corpus directory. Writes nothing when every word was found.
  pub fn export_oovs(&self, outpath: Option<&Path>) -> Result<ExportOutcome> {
    if self.oovs.is_empty() {
      tracing::info!("No OOV words in the corpus.");
      return Ok(ExportOutcome::NothingToExport);
    }

    let path = outpath.map(|p| p.to_owned()).unwrap_or_else(|| self.directory.join(OOV_FILE_NAME));
    fs::write(&path, self.oovs.iter().join("\n")).map_err(|e| Error::io_at(&path, e))?;
    tracing::info!("Exported {} OOV words to {}", self.oovs.len(), path.display());

    Ok(ExportOutcome::Written { path, count: self.oovs.len() })
  }
}

/// Distinct OOV words across all passages.
fn find_oovs(passages: &[Passage]) -> Vec<String> {
  let all: HashSet<String> = passages.iter().flat_map(|p| p.oovs()).collect();
  all.into_iter().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lookup_cache::tests::{sample_dictionary, CountingDictionary};
  use crate::passage_store::STORE_SCHEMA_VERSION;

  fn write_corpus(dir: &Path) {
    fs::write(dir.join("one.txt"), "The cat sat on the mat.").unwrap();
    fs::write(dir.join("two.txt"), "A blorp sat.\nBlorp, blorp!").unwrap();
    fs::write(dir.join("three.txt"), "Banana glark, the zing.").unwrap();
    fs::write(dir.join("readme.md"), "not a passage").unwrap();
  }

  fn no_cache() -> CorpusOptions {
    CorpusOptions { use_cache: false, load_from_cache: false, ..CorpusOptions::default() }
  }

  fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
  }

  #[test]
  fn test_build_and_oov_union() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    let corpus = Corpus::build(dir.path(), no_cache(), &cache).unwrap();

    let names: Vec<&str> = corpus.passages().iter().map(|p| p.name().unwrap()).collect();
    assert_eq!(names, vec!["one.txt", "three.txt", "two.txt"]);

    let union: HashSet<String> = corpus.passages().iter().flat_map(|p| p.oovs()).collect();
    let oovs = corpus.oovs();
    assert_eq!(oovs.len(), union.len());
    assert_eq!(oovs.iter().cloned().collect::<HashSet<_>>(), union);
    assert_eq!(sorted(oovs), vec!["blorp", "glark", "zing"]);
    assert!(!dir.path().join("cached").exists());
  }

  #[test]
  fn test_parallel_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let dict = CountingDictionary::new(sample_dictionary());
    let cache = LookupCache::new(&dict);
    let sequential = Corpus::build(dir.path(), no_cache(), &cache).unwrap();
    let parallel = Corpus::build(dir.path(), CorpusOptions { parallel: true, ..no_cache() }, &cache).unwrap();
    assert_eq!(sequential.passages(), parallel.passages());
    assert_eq!(sorted(sequential.oovs()), sorted(parallel.oovs()));
    assert_eq!(dict.calls_for("blorp"), 1);
  }

  #[test]
  fn test_cached_passages_are_reused() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let dict = CountingDictionary::new(sample_dictionary());

    let first = {
      let cache = LookupCache::new(&dict);
      Corpus::build(dir.path(), CorpusOptions::default(), &cache).unwrap()
    };
    assert!(dir.path().join("cached").join("one.json").is_file());
    let queries_after_first = dict.calls_for("cat");

    let cache = LookupCache::new(&dict);
    let second = Corpus::build(dir.path(), CorpusOptions::default(), &cache).unwrap();
    assert_eq!(first.passages(), second.passages());
    assert_eq!(cache.query_count(), 0);
    assert_eq!(dict.calls_for("cat"), queries_after_first);
  }

  #[test]
  fn test_stress_mismatch_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    Corpus::build(dir.path(), CorpusOptions::default(), &cache).unwrap();

    let kept = CorpusOptions { ignore_stress: false, ..CorpusOptions::default() };
    let corpus = Corpus::build(dir.path(), kept, &cache).unwrap();
    assert!(corpus.passages().iter().all(|p| !p.ignore_stress()));
    assert!(corpus.passages()[0].phoneme_count().contains_key("AE1"));
  }

  #[test]
  fn test_stale_cache_entry_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let cached = dir.path().join("cached");
    fs::create_dir(&cached).unwrap();
    fs::write(cached.join("one.json"), format!(r#"{{"version": {}, "passage": null}}"#, STORE_SCHEMA_VERSION + 1)).unwrap();

    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    let corpus = Corpus::build(dir.path(), CorpusOptions::default(), &cache).unwrap();
    assert_eq!(corpus.passages()[0].name(), Some("one.txt"));
    assert_eq!(corpus.passages()[0].n_words(), 6);
  }

  #[test]
  fn test_export_oovs() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    let corpus = Corpus::build(dir.path(), no_cache(), &cache).unwrap();

    let outcome = corpus.export_oovs(None).unwrap();
    let path = dir.path().join(OOV_FILE_NAME);
    assert_eq!(outcome, ExportOutcome::Written { path: path.clone(), count: 3 });
    let written: Vec<String> = fs::read_to_string(&path).unwrap().lines().map(|l| l.to_owned()).collect();
    assert_eq!(sorted(written), vec!["blorp", "glark", "zing"]);

    let other = dir.path().join("elsewhere.txt");
    corpus.export_oovs(Some(&other)).unwrap();
    assert!(other.is_file());
  }

  #[test]
  fn test_export_without_oovs_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), "The cat sat on the mat.").unwrap();
    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    let corpus = Corpus::build(dir.path(), no_cache(), &cache).unwrap();

    assert!(corpus.oovs().is_empty());
    assert_eq!(corpus.export_oovs(None).unwrap(), ExportOutcome::NothingToExport);
    assert!(!dir.path().join(OOV_FILE_NAME).exists());
  }

  #[test]
  fn test_missing_directory() {
    let dict = sample_dictionary();
    let cache = LookupCache::new(&dict);
    assert!(Corpus::build(Path::new("/no/such/corpus"), no_cache(), &cache).is_err());
  }
}
