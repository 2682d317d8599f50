pub mod error;
pub mod normalize;
pub mod pronunciation;
pub mod lookup_cache;
pub mod transcribe;
pub mod counting;
pub mod passage;
pub mod passage_store;
pub mod text_source;
pub mod corpus;

pub use corpus::{Corpus, CorpusOptions, ExportOutcome};
pub use error::{Error, Result};
pub use lookup_cache::LookupCache;
pub use passage::{Passage, PhonemeFreqs};
pub use pronunciation::{CmuDict, MapDictionary, PronunciationDictionary};
