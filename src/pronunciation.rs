//! Pronunciation dictionaries.
//!
//! Entries follow the CMU pronouncing dictionary format, one pronunciation per
//! line with alternates marked by a numeric suffix:
//!
//! ```text
//! abandon AH0 B AE1 N D AH0 N
//! read R EH1 D
//! read(2) R IY1 D
//! ```
//!
//! Vowels carry a stress digit (0, 1 or 2).

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub type Pronunciation = Vec<String>;

pub trait PronunciationDictionary {
  /// All known pronunciations of a normalized word, in dictionary order.
  fn lookup_all(&self, word: &str) -> Vec<Pronunciation>;
}

/// In-memory dictionary keyed by word.
#[derive(Clone, Debug, Default)]
pub struct MapDictionary {
  entries: HashMap<String, Vec<Pronunciation>>
}

impl MapDictionary {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a variant after any already known for the word.
  pub fn insert(&mut self, word: &str, phonemes: &[&str]) {
    self.push(word.to_owned(), phonemes.iter().map(|p| (*p).to_owned()).collect());
  }

  fn push(&mut self, word: String, pronunciation: Pronunciation) {
    self.entries.entry(word).or_default().push(pronunciation);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl PronunciationDictionary for MapDictionary {
  fn lookup_all(&self, word: &str) -> Vec<Pronunciation> {
    self.entries.get(word).cloned().unwrap_or_default()
  }
}

/// The CMU pronouncing dictionary loaded from a `cmudict.dict` style file.
#[derive(Clone, Debug)]
pub struct CmuDict {
  inner: MapDictionary
}

impl CmuDict {
  pub fn load(path: &Path) -> Result<CmuDict> {
    let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
    let dict = Self::parse(BufReader::new(file))?;
    tracing::info!("Loaded {} words from {}", dict.inner.len(), path.display());
    Ok(dict)
  }

  pub fn parse<R: BufRead>(reader: R) -> Result<CmuDict> {
    lazy_static! {
      static ref COMMENT_STRIPPING_RE: Regex = Regex::new(r"\s*#.*").unwrap();
      static ref VARIANT_SUFFIX_RE: Regex = Regex::new(r"\(\d+\)$").unwrap();
    }

    let mut inner = MapDictionary::new();

    for (i, line) in reader.lines().enumerate() {
      let line = line?;
      if line.starts_with(";;;") {
        continue;
      }
      let line = COMMENT_STRIPPING_RE.replace(&line, "");
      let mut tokens = line.split_whitespace();
      let Some(term) = tokens.next() else { continue; };
      let pronunciation: Pronunciation = tokens.map(|t| t.to_owned()).collect();
      if pronunciation.is_empty() {
        return Err(Error::DictionaryFormat { line: i + 1, content: line.into_owned() });
      }
      let word = VARIANT_SUFFIX_RE.replace(term, "").to_lowercase();
      inner.push(word, pronunciation);
    }

    Ok(CmuDict { inner })
  }

  pub fn len(&self) -> usize {
    self.inner.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }
}

impl PronunciationDictionary for CmuDict {
  fn lookup_all(&self, word: &str) -> Vec<Pronunciation> {
    self.inner.lookup_all(word)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "\
;;; header comment
abandon AH0 B AE1 N D AH0 N
read R EH1 D
read(2) R IY1 D
achill AE1 K IH0 L # place, irish

DON'T  D OW1 N T
";

  #[test]
  fn test_parse_variants_in_order() {
    let dict = CmuDict::parse(SAMPLE.as_bytes()).unwrap();
    assert_eq!(dict.len(), 4);
    assert_eq!(dict.lookup_all("read"), vec![
      vec!["R".to_owned(), "EH1".to_owned(), "D".to_owned()],
      vec!["R".to_owned(), "IY1".to_owned(), "D".to_owned()],
    ]);
  }

  #[test]
  fn test_parse_strips_comments_and_lowercases() {
    let dict = CmuDict::parse(SAMPLE.as_bytes()).unwrap();
    assert_eq!(dict.lookup_all("achill"), vec![vec!["AE1", "K", "IH0", "L"]]);
    assert_eq!(dict.lookup_all("don't"), vec![vec!["D", "OW1", "N", "T"]]);
    assert!(dict.lookup_all("missing").is_empty());
  }

  #[test]
  fn test_parse_rejects_word_without_phonemes() {
    match CmuDict::parse("ok OW1 K EY1\nbroken\n".as_bytes()) {
      Err(Error::DictionaryFormat { line, .. }) => assert_eq!(line, 2),
      other => panic!("unexpected: {:?}", other.map(|d| d.len())),
    }
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmudict.dict");
    std::fs::write(&path, SAMPLE).unwrap();
    let dict = CmuDict::load(&path).unwrap();
    assert_eq!(dict.len(), 4);
    assert_eq!(dict.lookup_all("abandon")[0], vec!["AH0", "B", "AE1", "N", "D", "AH0", "N"]);
  }

  #[test]
  fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.dict");
    match CmuDict::load(&path) {
      Err(Error::IoAt { path: reported, .. }) => assert_eq!(reported, path),
      other => panic!("unexpected: {:?}", other.map(|d| d.len())),
    }
  }

  #[test]
  fn test_map_dictionary() {
    let mut dict = MapDictionary::new();
    dict.insert("the", &["DH", "AH0"]);
    dict.insert("the", &["DH", "IY0"]);
    assert_eq!(dict.lookup_all("the").len(), 2);
    assert_eq!(dict.lookup_all("the")[0], vec!["DH", "AH0"]);
  }
}
