pub mod analysis;
pub mod annotations;
pub mod furigana;
pub mod keyed;
pub mod sentence;

pub use analysis::{Bunsetsu, Clozes, DictionarySearch, Run, RunHits, ScoreHit, SentenceAnalysis};
pub use annotations::*;
pub use furigana::{Furigana, token_strings, token_text};
pub use keyed::{remove_by_key, upsert_by_key};
pub use sentence::{SentenceDb, SentenceEntry, SimplifiedBunsetsu, StoredSentence, sentence_hash};
