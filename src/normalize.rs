use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  // Letters, numbers and `_` count as word characters; combining marks do not.
  static ref PUNCTUATION_RE: Regex = Regex::new(r"[^\p{L}\p{N}_\s\x1c-\x1f']").unwrap();
  static ref WHITESPACE_RE: Regex = Regex::new(r"[\s\x1c-\x1f]+").unwrap();
}

/// Lowercases the text and strips everything but word characters, whitespace
/// and apostrophes, leaving single spaces between tokens.
pub fn normalize(raw: &str) -> String {
  let text = raw.to_lowercase().replace('\n', " ").replace('\u{2019}', "'");
  let text = PUNCTUATION_RE.replace_all(&text, "");
  WHITESPACE_RE.replace_all(&text, " ").trim().to_owned()
}
