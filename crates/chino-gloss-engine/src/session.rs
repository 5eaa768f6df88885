//! Editing state for one sentence's annotations.

use crate::autopick::{self, KnownSenses};
use crate::models::{
    AnnotatedConjugatedPhrase, AnnotatedParticle, ConjugatedPhrase, Deconjugation, DictHit,
    DictHitKey, Particle, SentenceAnalysis, SentenceEntry, SimplifiedBunsetsu, Span,
    StoredSentence, remove_by_key, upsert_by_key,
};
use crate::picker::Selection;
use crate::relocate::Relocator;

/// How many annotations of each kind a carry-over produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryOverReport {
    pub dict_hits: usize,
    pub particles: usize,
    pub conj_hits: usize,
}

impl CarryOverReport {
    pub fn total(&self) -> usize {
        self.dict_hits + self.particles + self.conj_hits
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationSession {
    sentence: String,
    entry: SentenceEntry,
    started: bool,
}

impl AnnotationSession {
    pub fn new(sentence: impl Into<String>) -> Self {
        Self::from_entry(sentence, SentenceEntry::default())
    }

    pub fn from_entry(sentence: impl Into<String>, entry: SentenceEntry) -> Self {
        Self {
            sentence: sentence.into(),
            entry,
            started: false,
        }
    }

    /// Resumes from a stored record, or starts empty when there is none.
    pub fn from_record(sentence: impl Into<String>, record: Option<StoredSentence>) -> Self {
        Self::from_entry(sentence, record.map(|r| r.data).unwrap_or_default())
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn entry(&self) -> &SentenceEntry {
        &self.entry
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Applies the sentence's analysis and, the first time only, carries
    /// annotations over from `old`.
    ///
    /// Furigana already in the session are kept since they may have been
    /// corrected by hand. Each annotation kind is carried over only when the
    /// session has none of that kind and `old` is a different sentence.
    /// Returns `None` when editing had already begun.
    pub fn begin_editing(
        &mut self,
        old: Option<&StoredSentence>,
        analysis: &SentenceAnalysis,
    ) -> Option<CarryOverReport> {
        if self.started {
            return None;
        }
        self.started = true;

        if self.entry.furigana.is_empty() {
            self.entry.furigana = analysis.furigana.clone();
        }
        self.entry.kanjidic = analysis.kanjidic.clone();
        self.entry.bunsetsus = analysis.bunsetsus.iter().map(SimplifiedBunsetsu::from).collect();

        let mut report = CarryOverReport::default();
        let Some(old) = old.filter(|old| old.sentence != self.sentence) else {
            return Some(report);
        };

        let old_tokens = old.data.tokens();
        let new_tokens = analysis.tokens();
        let relocator = Relocator::new(&old_tokens, &new_tokens, &self.sentence);

        if self.entry.dict_hits.is_empty() {
            self.entry.dict_hits = relocator.dict_hits(&old.data.dict_hits);
            report.dict_hits = self.entry.dict_hits.len();
        }
        if self.entry.particles.is_empty() {
            self.entry.particles = relocator.particles(&old.data.particles);
            report.particles = self.entry.particles.len();
        }
        if self.entry.conj_hits.is_empty() {
            self.entry.conj_hits =
                relocator.conjugated_phrases(&old.data.conj_hits, analysis.conjugated_phrases());
            report.conj_hits = self.entry.conj_hits.len();
        }

        log::info!(
            "carried {} of {} annotations from {:?} to {:?}",
            report.total(),
            old.data.annotation_count(),
            old.sentence,
            self.sentence
        );
        Some(report)
    }

    /// Dictionary senses to pre-select on spans no annotation covers yet,
    /// taken from words annotated in other sentences.
    pub fn propose_dict_hits(
        &self,
        analysis: &SentenceAnalysis,
        known: &KnownSenses,
    ) -> Vec<DictHit> {
        autopick::propose(&self.entry, analysis, known)
    }

    /// Returns `true` when an identical hit was already present.
    pub fn upsert_dict_hit(&mut self, hit: DictHit) -> bool {
        upsert_by_key(&mut self.entry.dict_hits, hit, DictHit::key)
    }

    pub fn remove_dict_hit(&mut self, key: &DictHitKey) -> usize {
        remove_by_key(&mut self.entry.dict_hits, key, DictHit::key)
    }

    /// Tags `particle` with `selection`; the empty selection untags it.
    pub fn tag_particle(&mut self, particle: &Particle, selection: Selection) {
        match selection {
            Selection::Section(tag) => {
                let tagged = AnnotatedParticle::new(particle.clone(), tag);
                upsert_by_key(&mut self.entry.particles, tagged, AnnotatedParticle::span);
            }
            Selection::None => {
                remove_by_key(&mut self.entry.particles, &particle.span, AnnotatedParticle::span);
            }
        }
    }

    pub fn add_particle(&mut self, particle: AnnotatedParticle) {
        upsert_by_key(&mut self.entry.particles, particle, AnnotatedParticle::span);
    }

    /// Current tag for the particle at `span`.
    pub fn particle_selection(&self, span: Span) -> Selection {
        self.entry
            .particles
            .iter()
            .find(|p| p.span() == span)
            .map(|p| Selection::Section(p.chino_tag.clone()))
            .unwrap_or_default()
    }

    /// Picks one of `phrase`'s deconjugations, or clears the pick with `None`.
    pub fn select_deconjugation(
        &mut self,
        phrase: &ConjugatedPhrase,
        choice: Option<Deconjugation>,
    ) {
        match choice {
            Some(deconj) => {
                let annotated = AnnotatedConjugatedPhrase::new(phrase.clone(), deconj);
                upsert_by_key(
                    &mut self.entry.conj_hits,
                    annotated,
                    AnnotatedConjugatedPhrase::span,
                );
            }
            None => {
                remove_by_key(
                    &mut self.entry.conj_hits,
                    &phrase.span,
                    AnnotatedConjugatedPhrase::span,
                );
            }
        }
    }

    pub fn add_conjugated_phrase(&mut self, phrase: AnnotatedConjugatedPhrase) {
        upsert_by_key(&mut self.entry.conj_hits, phrase, AnnotatedConjugatedPhrase::span);
    }

    pub fn to_record(&self) -> StoredSentence {
        StoredSentence::new(self.sentence.clone(), self.entry.clone())
    }
}
