use crate::transcribe::Transcription;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub type PhonemeCount = BTreeMap<String, usize>;

/// Per phoneme: `[initial, medial, final]`.
pub type PositionalPhonemeCount = BTreeMap<String, [usize; 3]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
  Initial,
  Medial,
  Final
}

impl Position {
  /// Position of phoneme `i` in a word of `n` phonemes. Words shorter than
  /// two phonemes have no position.
  pub fn of(i: usize, n: usize) -> Option<Position> {
    if n < 2 {
      None
    } else if i == 0 {
      Some(Position::Initial)
    } else if i == n - 1 {
      Some(Position::Final)
    } else {
      Some(Position::Medial)
    }
  }

  pub fn index(self) -> usize {
    match self {
      Position::Initial => 0,
      Position::Medial => 1,
      Position::Final => 2
    }
  }
}

pub fn strip_stress(phoneme: &str) -> Cow<'_, str> {
  lazy_static! {
    static ref STRESS_RE: Regex = Regex::new(r"\d$").unwrap();
  }
  STRESS_RE.replace(phoneme, "")
}

pub fn count(transcription: &Transcription, ignore_stress: bool) -> (PhonemeCount, PositionalPhonemeCount) {
  let mut totals = PhonemeCount::new();
  let mut by_position = PositionalPhonemeCount::new();

  for entry in transcription {
    let n = entry.phonemes.len();
    for (i, p) in entry.phonemes.iter().enumerate() {
      let p = if ignore_stress { strip_stress(p) } else { Cow::Borrowed(p.as_str()) };

      *totals.entry(p.to_string()).or_insert(0) += 1;
      let slots = by_position.entry(p.into_owned()).or_insert([0, 0, 0]);

      if let Some(pos) = Position::of(i, n) {
        slots[pos.index()] += 1;
      }
    }
  }

  (totals, by_position)
}
