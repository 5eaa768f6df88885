//! Proposes dictionary senses for words already annotated elsewhere.
//!
//! A search result is proposed only when the annotator picked a sense for
//! the same dictionary word in some stored sentence, and the searched run is
//! literally one of the word's kana or kanji listings. Inflected runs never
//! qualify.

use std::collections::{HashMap, HashSet};

use crate::models::{DictHit, SentenceAnalysis, SentenceDb, SentenceEntry, Span, Word};

/// Results looked at per searched run, best first.
pub const RESULTS_PER_RUN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct KnownSense {
    pub sense: u32,
    pub word: Word,
}

/// Word id to the sense the annotator chose for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownSenses(HashMap<String, KnownSense>);

impl KnownSenses {
    /// Collects every picked sense in `db`. When a word was annotated more
    /// than once, the last hit in sentence order wins.
    pub fn from_db(db: &SentenceDb) -> Self {
        db.values()
            .flat_map(|record| &record.data.dict_hits)
            .collect()
    }

    pub fn get(&self, word_id: &str) -> Option<&KnownSense> {
        self.0.get(word_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a DictHit> for KnownSenses {
    fn from_iter<I: IntoIterator<Item = &'a DictHit>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|hit| {
                    let known = KnownSense {
                        sense: hit.sense,
                        word: hit.word.clone(),
                    };
                    (hit.word.id.clone(), known)
                })
                .collect(),
        )
    }
}

/// Morphemes an existing annotation already accounts for.
///
/// A conjugated phrase covers all but its first morpheme so the head of the
/// phrase can still get a dictionary sense.
fn covered_morphemes(entry: &SentenceEntry) -> HashSet<usize> {
    let dict = entry.dict_hits.iter().map(|h| h.span.indices());
    let particles = entry.particles.iter().map(|p| p.span().indices());
    let conj_tails = entry.conj_hits.iter().map(|c| {
        let span = c.span();
        span.start_idx + 1..span.end_idx
    });
    dict.chain(particles).chain(conj_tails).flatten().collect()
}

/// Dictionary hits worth pre-selecting for `entry`, in the analysis's order.
pub fn propose(
    entry: &SentenceEntry,
    analysis: &SentenceAnalysis,
    known: &KnownSenses,
) -> Vec<DictHit> {
    let covered = covered_morphemes(entry);
    let mut proposals = Vec::new();

    for search in &analysis.hits {
        for run in &search.results {
            let span = run.span(search.start_idx);
            if span.indices().all(|idx| covered.contains(&idx)) {
                continue;
            }
            let Some(text) = run.run.text() else {
                continue;
            };

            for hit in run.results.iter().take(RESULTS_PER_RUN) {
                let (Some(picked), Some(word)) = (known.get(&hit.word_id), &hit.word) else {
                    continue;
                };
                if word.has_listing(text) {
                    proposals.push(DictHit::new(span, word.clone(), picked.sense));
                }
            }
        }
    }

    log::debug!(
        "proposed {} dictionary senses from {} known words",
        proposals.len(),
        known.len()
    );
    proposals
}
