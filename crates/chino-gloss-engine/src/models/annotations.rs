use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cloze::{Cloze, tokens_cloze};
use crate::models::furigana::{Furigana, token_strings};
use crate::outline::SectionNumber;

/// Half-open morpheme range `[start_idx, end_idx)` in one tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl Span {
    pub fn new(start_idx: usize, end_idx: usize) -> Self {
        Self { start_idx, end_idx }
    }

    /// Non-empty and within a tokenization of `token_count` morphemes.
    pub fn fits(&self, token_count: usize) -> bool {
        self.start_idx < self.end_idx && self.end_idx <= token_count
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start_idx && idx < self.end_idx
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start_idx..self.end_idx
    }
}

/// Dictionary entry as the NLP service returns it. Only `id` and the
/// `text` of its kana and kanji listings are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Word {
    /// `text` is exactly one of the word's kana or kanji spellings.
    pub fn has_listing(&self, text: &str) -> bool {
        ["kana", "kanji"]
            .iter()
            .filter_map(|field| self.rest.get(*field).and_then(Value::as_array))
            .flatten()
            .any(|listing| listing.get("text").and_then(Value::as_str) == Some(text))
    }
}

/// A dictionary sense chosen for a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictHit {
    #[serde(flatten)]
    pub span: Span,
    pub word: Word,
    pub sense: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictHitKey {
    pub span: Span,
    pub word_id: String,
    pub sense: u32,
}

impl DictHit {
    pub fn new(span: Span, word: Word, sense: u32) -> Self {
        Self { span, word, sense }
    }

    pub fn key(&self) -> DictHitKey {
        DictHitKey {
            span: self.span,
            word_id: self.word.id.clone(),
            sense: self.sense,
        }
    }
}

/// Particle classification candidate: top-level outline group and its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChinoCandidate(pub u32, pub String);

/// A particle occurrence found by the NLP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    #[serde(flatten)]
    pub span: Span,
    pub cloze: Cloze,
    #[serde(default)]
    pub morphemes: Vec<Value>,
    #[serde(default)]
    pub chino: Vec<ChinoCandidate>,
}

impl Particle {
    /// Outline groups the classifier proposed, in its order.
    pub fn candidate_groups(&self) -> Vec<u32> {
        self.chino.iter().map(|c| c.0).collect()
    }
}

/// A particle tagged with an outline section by the annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedParticle {
    #[serde(flatten)]
    pub particle: Particle,
    pub chino_tag: SectionNumber,
}

impl AnnotatedParticle {
    pub fn new(particle: Particle, chino_tag: SectionNumber) -> Self {
        Self {
            particle,
            chino_tag,
        }
    }

    /// A particle the NLP service missed, tagged by hand over `span`.
    ///
    /// Returns `None` when `span` does not fit the tokenization.
    pub fn manual(
        furigana: &[Vec<Furigana>],
        span: Span,
        morphemes: Vec<Value>,
        chino_tag: SectionNumber,
    ) -> Option<Self> {
        let cloze = tokens_cloze(&token_strings(furigana), span)?;
        Some(Self {
            particle: Particle {
                span,
                cloze,
                morphemes,
                chino: vec![],
            },
            chino_tag,
        })
    }

    pub fn span(&self) -> Span {
        self.particle.span
    }

    /// Manual particles carry no classifier candidates.
    pub fn is_manual(&self) -> bool {
        self.particle.chino.is_empty()
    }
}

/// One way of reading a conjugated phrase back to its dictionary form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deconjugation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliaries: Option<Vec<String>>,
    #[serde(default)]
    pub conjugation: String,
    #[serde(default)]
    pub result: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Deconjugation {
    /// `aux1 + aux2 + conjugation` for verbs, bare conjugation for adjectives.
    pub fn render(&self) -> String {
        match &self.auxiliaries {
            Some(auxiliaries) => format!("{} + {}", auxiliaries.join(" + "), self.conjugation),
            None => self.conjugation.clone(),
        }
    }
}

/// A conjugated verb/adjective phrase with its candidate deconjugations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConjugatedPhrase {
    #[serde(flatten)]
    pub span: Span,
    pub cloze: Cloze,
    #[serde(default)]
    pub lemmas: Value,
    #[serde(default)]
    pub deconj: Vec<Deconjugation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphemes: Option<Vec<Value>>,
}

impl ConjugatedPhrase {
    /// The candidate that renders the same as `choice`, if any.
    pub fn offered(&self, choice: &Deconjugation) -> Option<&Deconjugation> {
        let wanted = choice.render();
        self.deconj.iter().find(|d| d.render() == wanted)
    }
}

/// A conjugated phrase with the deconjugation the annotator picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedConjugatedPhrase {
    #[serde(flatten)]
    pub phrase: ConjugatedPhrase,
    pub selected_deconj: Deconjugation,
}

impl AnnotatedConjugatedPhrase {
    pub fn new(phrase: ConjugatedPhrase, selected_deconj: Deconjugation) -> Self {
        Self {
            phrase,
            selected_deconj,
        }
    }

    /// A conjugation entered by hand for a phrase the NLP service missed.
    pub fn manual(
        furigana: &[Vec<Furigana>],
        span: Span,
        lemma: &str,
        deconj: Deconjugation,
    ) -> Option<Self> {
        let cloze = tokens_cloze(&token_strings(furigana), span)?;
        Some(Self {
            phrase: ConjugatedPhrase {
                span,
                cloze,
                lemmas: Value::from(vec![vec![lemma.to_string()]]),
                deconj: vec![deconj.clone()],
                morphemes: None,
            },
            selected_deconj: deconj,
        })
    }

    pub fn span(&self) -> Span {
        self.phrase.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{furigana, word};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn span_bounds() {
        assert!(Span::new(0, 1).fits(1));
        assert!(!Span::new(1, 1).fits(3));
        assert!(!Span::new(2, 4).fits(3));
        assert!(Span::new(2, 4).contains(3));
        assert!(!Span::new(2, 4).contains(4));
        assert_eq!(Span::new(2, 4).indices().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn dict_hit_uses_camel_case_indices() {
        let hit = DictHit::new(Span::new(2, 3), word("1595910"), 0);
        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["startIdx"], json!(2));
        assert_eq!(value["endIdx"], json!(3));
        assert_eq!(value["word"]["id"], json!("1595910"));
    }

    #[test]
    fn word_keeps_unknown_fields() {
        let raw = json!({"id": "1", "kanji": [{"text": "晴れる"}], "sense": []});
        let word: Word = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&word).unwrap(), raw);
    }

    #[test]
    fn listings_match_whole_spellings_only() {
        let word: Word = serde_json::from_value(json!({
            "id": "1",
            "kanji": [{"text": "晴れる", "common": true}],
            "kana": [{"text": "はれる"}]
        }))
        .unwrap();
        assert!(word.has_listing("晴れる"));
        assert!(word.has_listing("はれる"));
        assert!(!word.has_listing("晴れ"));
        assert!(!crate::tests::word("2").has_listing(""));
    }

    #[test]
    fn annotated_particle_round_trips() {
        let raw = json!({
            "startIdx": 1,
            "endIdx": 2,
            "cloze": {"left": "", "cloze": "は", "right": ""},
            "morphemes": [],
            "chino": [[2, "は topic"]],
            "chinoTag": "2.1"
        });
        let particle: AnnotatedParticle = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(particle.chino_tag.to_string(), "2.1");
        assert_eq!(particle.particle.candidate_groups(), vec![2]);
        assert!(!particle.is_manual());
        assert_eq!(serde_json::to_value(&particle).unwrap(), raw);
    }

    #[test]
    fn manual_particle_builds_cloze() {
        let furi = furigana(&["私", "の", "本", "と", "彼", "の", "本"]);
        let tag: SectionNumber = "3".parse().unwrap();
        let particle = AnnotatedParticle::manual(&furi, Span::new(5, 6), vec![], tag).unwrap();
        assert_eq!(particle.particle.cloze.left, "彼");
        assert_eq!(particle.particle.cloze.right, "本");
        assert!(particle.is_manual());

        assert!(
            AnnotatedParticle::manual(&furi, Span::new(6, 9), vec![], "3".parse().unwrap())
                .is_none()
        );
    }

    #[test]
    fn deconjugation_rendering() {
        let verb: Deconjugation = serde_json::from_value(json!({
            "auxiliaries": ["Potential", "Masu"],
            "conjugation": "Ta",
            "result": ["食べられました"]
        }))
        .unwrap();
        let adj: Deconjugation = serde_json::from_value(json!({
            "conjugation": "Negative",
            "result": ["高くない"]
        }))
        .unwrap();
        assert_eq!(verb.render(), "Potential + Masu + Ta");
        assert_eq!(adj.render(), "Negative");
    }

    #[test]
    fn manual_conjugation_selects_its_only_deconjugation() {
        let furi = furigana(&["食べ", "た"]);
        let deconj: Deconjugation = serde_json::from_value(json!({
            "auxiliaries": [],
            "conjugation": "Ta",
            "result": ["食べた"]
        }))
        .unwrap();
        let conj =
            AnnotatedConjugatedPhrase::manual(&furi, Span::new(0, 2), "食べる", deconj.clone())
                .unwrap();
        assert_eq!(conj.phrase.lemmas, json!([["食べる"]]));
        assert_eq!(conj.selected_deconj, deconj);
        assert_eq!(conj.phrase.offered(&deconj), Some(&deconj));
    }
}
