use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::models::analysis::Bunsetsu;
use crate::models::annotations::{AnnotatedConjugatedPhrase, AnnotatedParticle, DictHit};
use crate::models::furigana::{Furigana, token_strings};

/// Dependency-tree node reduced to what rendering needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedBunsetsu {
    pub idx: i64,
    pub parent: i64,
    pub num_morphemes: usize,
}

impl From<&Bunsetsu> for SimplifiedBunsetsu {
    fn from(b: &Bunsetsu) -> Self {
        Self {
            idx: b.idx,
            parent: b.parent,
            num_morphemes: b.morphemes.len(),
        }
    }
}

/// Everything annotated for one sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceEntry {
    #[serde(default)]
    pub furigana: Vec<Vec<Furigana>>,
    #[serde(default)]
    pub dict_hits: Vec<DictHit>,
    #[serde(default)]
    pub conj_hits: Vec<AnnotatedConjugatedPhrase>,
    #[serde(default)]
    pub particles: Vec<AnnotatedParticle>,
    #[serde(default)]
    pub kanjidic: Map<String, Value>,
    #[serde(default)]
    pub bunsetsus: Vec<SimplifiedBunsetsu>,
}

impl SentenceEntry {
    /// Morpheme surface strings of this entry's tokenization.
    pub fn tokens(&self) -> Vec<String> {
        token_strings(&self.furigana)
    }

    /// Nothing worth keeping: such entries are deleted rather than written.
    pub fn is_empty(&self) -> bool {
        self.dict_hits.is_empty()
            && self.conj_hits.is_empty()
            && self.particles.is_empty()
            && self.furigana.is_empty()
            && self.kanjidic.is_empty()
    }

    pub fn annotation_count(&self) -> usize {
        self.dict_hits.len() + self.conj_hits.len() + self.particles.len()
    }
}

/// A sentence entry as persisted, keyed by the sentence's literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSentence {
    pub sentence: String,
    pub data: SentenceEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl StoredSentence {
    pub fn new(sentence: impl Into<String>, data: SentenceEntry) -> Self {
        let sentence = sentence.into();
        let hash = Some(sentence_hash(&sentence));
        Self {
            sentence,
            data,
            hash,
        }
    }
}

/// All stored sentences, keyed by sentence text.
pub type SentenceDb = BTreeMap<String, StoredSentence>;

/// Content hash naming a sentence's record: lowercase hex SHA-256.
pub fn sentence_hash(sentence: &str) -> String {
    format!("{:x}", Sha256::digest(sentence.as_bytes()))
}
