use crate::lookup_cache::LookupCache;
use crate::pronunciation::Pronunciation;
use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscribedWord {
  pub word: String,
  /// Empty for out-of-vocabulary words.
  pub phonemes: Pronunciation
}

pub type Transcription = Vec<TranscribedWord>;

/// Looks up every space-separated token of normalized text.
///
/// Returns the transcription in token order along with the distinct tokens
/// the dictionary did not know, in order of first appearance.
pub fn transcribe(text: &str, cache: &LookupCache) -> (Transcription, Vec<String>) {
  let mut transcription = vec![];
  let mut oovs: Vec<String> = vec![];

  if text.is_empty() {
    return (transcription, oovs);
  }

  for word in text.split(' ') {
    let lookup = cache.lookup(word);
    if lookup.is_miss() && !oovs.iter().any(|w| w == word) {
      oovs.push(word.to_owned());
    }
    transcription.push(TranscribedWord {
      word: word.to_owned(),
      phonemes: lookup.into_phonemes()
    });
  }

  (transcription, oovs)
}
