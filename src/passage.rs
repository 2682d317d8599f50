use crate::counting::{self, PhonemeCount, PositionalPhonemeCount};
use crate::error::{Error, Result};
use crate::lookup_cache::LookupCache;
use crate::normalize::normalize;
use crate::transcribe::{transcribe, Transcription};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

/// Copy of a passage's phoneme frequencies, either totals or by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhonemeFreqs {
  Total(PhonemeCount),
  ByPosition(PositionalPhonemeCount)
}

/// One text unit with its transcription and phoneme statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
  name: Option<String>,
  raw_text: String,
  text: String,
  ignore_stress: bool,
  transcription: Transcription,
  phoneme_count: PhonemeCount,
  phoneme_count_by_pos: PositionalPhonemeCount,
  oovs: Vec<String>,
  n_phonemes: usize,
  n_unique_phonemes: usize,
  n_words: usize
}

impl Passage {
  pub fn from_text(text: &str, name: Option<&str>, ignore_stress: bool, cache: &LookupCache) -> Result<Passage> {
    Self::build(text.to_owned(), name.map(|n| n.to_owned()), ignore_stress, cache)
  }

  /// Reads a UTF-8 text file. Without an explicit name the passage is named
  /// after the file.
  pub fn from_file(path: &Path, name: Option<&str>, ignore_stress: bool, cache: &LookupCache) -> Result<Passage> {
    let raw_text = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    let name = name.map(|n| n.to_owned()).or_else(|| {
      path.file_name().map(|f| f.to_string_lossy().into_owned())
    });
    Self::build(raw_text, name, ignore_stress, cache)
  }

  fn build(raw_text: String, name: Option<String>, ignore_stress: bool, cache: &LookupCache) -> Result<Passage> {
    let text = normalize(&raw_text);
    let (transcription, oovs) = transcribe(&text, cache);
    let (phoneme_count, phoneme_count_by_pos) = counting::count(&transcription, ignore_stress);

    check_counts(&phoneme_count, &phoneme_count_by_pos)?;

    let n_phonemes = phoneme_count.values().sum();
    let n_unique_phonemes = phoneme_count.len();
    let n_words = transcription.len();

    Ok(Passage {
      name,
      raw_text,
      text,
      ignore_stress,
      transcription,
      phoneme_count,
      phoneme_count_by_pos,
      oovs,
      n_phonemes,
      n_unique_phonemes,
      n_words
    })
  }

  pub fn rename(&mut self, new_name: &str) {
    self.name = Some(new_name.to_owned());
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn oovs(&self) -> Vec<String> {
    self.oovs.clone()
  }

  pub fn n_phonemes(&self) -> usize {
    self.n_phonemes
  }

  pub fn n_unique_phonemes(&self) -> usize {
    self.n_unique_phonemes
  }

  pub fn n_words(&self) -> usize {
    self.n_words
  }

  pub fn phoneme_freqs(&self, by_position: bool) -> PhonemeFreqs {
    if by_position {
      PhonemeFreqs::ByPosition(self.phoneme_count_by_pos.clone())
    } else {
      PhonemeFreqs::Total(self.phoneme_count.clone())
    }
  }

  pub fn phoneme_count(&self) -> PhonemeCount {
    self.phoneme_count.clone()
  }

  pub fn positional_count(&self) -> PositionalPhonemeCount {
    self.phoneme_count_by_pos.clone()
  }

  pub fn transcription(&self) -> &Transcription {
    &self.transcription
  }

  /// Normalized text.
  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn raw_text(&self) -> &str {
    &self.raw_text
  }

  pub fn ignore_stress(&self) -> bool {
    self.ignore_stress
  }
}

fn check_counts(totals: &PhonemeCount, by_position: &PositionalPhonemeCount) -> Result<()> {
  for (phoneme, &total) in totals {
    let positional: usize = by_position.get(phoneme).map(|s| s.iter().sum()).unwrap_or(0);
    if total < positional {
      return Err(Error::Validation { phoneme: phoneme.clone(), total, positional });
    }
  }
  Ok(())
}
