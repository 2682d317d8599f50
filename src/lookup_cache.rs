use crate::pronunciation::{Pronunciation, PronunciationDictionary};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
  Found(Pronunciation),
  /// The dictionary has no entry. Carries no phonemes.
  Miss
}

impl Lookup {
  pub fn into_phonemes(self) -> Pronunciation {
    match self {
      Lookup::Found(p) => p,
      Lookup::Miss => vec![]
    }
  }

  pub fn is_miss(&self) -> bool {
    matches!(self, Lookup::Miss)
  }
}

/// Memoizes dictionary lookups for the lifetime of a run.
///
/// Only the first pronunciation variant of a word is kept. Misses are cached
/// as empty pronunciations so the dictionary is asked about each word once.
/// Cached words are served under a shared read lock. A miss takes the write
/// lock and checks again before querying, so concurrent first lookups of the
/// same word still produce a single query.
pub struct LookupCache<'d> {
  dictionary: &'d (dyn PronunciationDictionary + Sync),
  entries: RwLock<HashMap<String, Pronunciation>>,
  queries: AtomicUsize
}

impl<'d> LookupCache<'d> {
  pub fn new(dictionary: &'d (dyn PronunciationDictionary + Sync)) -> Self {
    LookupCache {
      dictionary,
      entries: RwLock::new(HashMap::new()),
      queries: AtomicUsize::new(0)
    }
  }

  pub fn lookup(&self, word: &str) -> Lookup {
    let cached = self.entries.read().unwrap_or_else(|e| e.into_inner()).get(word).cloned();
    let phonemes = match cached {
      Some(p) => p,
      None => self.query(word)
    };

    if phonemes.is_empty() { Lookup::Miss } else { Lookup::Found(phonemes) }
  }

  fn query(&self, word: &str) -> Pronunciation {
    let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
    if let Some(p) = entries.get(word) {
      return p.clone();
    }

    self.queries.fetch_add(1, Ordering::Relaxed);
    let first = self.dictionary.lookup_all(word).into_iter().next().unwrap_or_default();
    if first.is_empty() {
      tracing::debug!("No pronunciation for {:?}", word);
    }
    entries.insert(word.to_owned(), first.clone());
    first
  }

  /// Number of times the underlying dictionary has been queried.
  pub fn query_count(&self) -> usize {
    self.queries.load(Ordering::Relaxed)
  }

  /// Number of distinct words cached, misses included.
  pub fn len(&self) -> usize {
    self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
