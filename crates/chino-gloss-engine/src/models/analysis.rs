//! Shape of the NLP service's sentence analysis, as far as it is consumed.
//!
//! Fields this workspace never interprets are kept as raw JSON so a record
//! built from an analysis round-trips unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cloze::Cloze;
use crate::models::annotations::{ConjugatedPhrase, Particle, Span, Word};
use crate::models::furigana::{Furigana, token_strings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bunsetsu {
    pub idx: i64,
    pub parent: i64,
    #[serde(default)]
    pub morphemes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clozes {
    #[serde(default)]
    pub conjugated_phrases: Vec<ConjugatedPhrase>,
    #[serde(default)]
    pub particles: Vec<Particle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text a dictionary search ran on. Runs that straddle a conjugation come
/// back as a cloze instead of plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Run {
    Text(String),
    Cloze(Cloze),
}

impl Run {
    pub fn text(&self) -> Option<&str> {
        match self {
            Run::Text(text) => Some(text),
            Run::Cloze(_) => None,
        }
    }
}

/// One dictionary result for a run, best first within its run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHit {
    pub word_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<Word>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHits {
    pub end_idx: usize,
    pub run: Run,
    #[serde(default)]
    pub results: Vec<ScoreHit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dictionary searches for every run starting at `start_idx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionarySearch {
    pub start_idx: usize,
    #[serde(default)]
    pub results: Vec<RunHits>,
}

impl RunHits {
    pub fn span(&self, start_idx: usize) -> Span {
        Span::new(start_idx, self.end_idx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    #[serde(default)]
    pub hits: Vec<DictionarySearch>,
    #[serde(default)]
    pub furigana: Vec<Vec<Furigana>>,
    #[serde(default)]
    pub clozes: Option<Clozes>,
    #[serde(default)]
    pub tags: Option<Map<String, Value>>,
    #[serde(default)]
    pub kanjidic: Map<String, Value>,
    #[serde(default)]
    pub bunsetsus: Vec<Bunsetsu>,
}

impl SentenceAnalysis {
    pub fn tokens(&self) -> Vec<String> {
        token_strings(&self.furigana)
    }

    pub fn conjugated_phrases(&self) -> &[ConjugatedPhrase] {
        self.clozes
            .as_ref()
            .map(|c| c.conjugated_phrases.as_slice())
            .unwrap_or(&[])
    }

    pub fn particles(&self) -> &[Particle] {
        self.clozes
            .as_ref()
            .map(|c| c.particles.as_slice())
            .unwrap_or(&[])
    }
}
