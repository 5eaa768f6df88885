//! Carrying span annotations from an old tokenization onto an edited one.
//!
//! Every annotation is relocated on its own. One that cannot be placed is
//! dropped and logged; nothing here fails as a whole.

pub mod acceptance;

pub use acceptance::{AcceptanceRule, BoundaryAdjacency};

use crate::cloze::{locate_cloze, tokens_cloze};
use crate::models::{AnnotatedConjugatedPhrase, AnnotatedParticle, ConjugatedPhrase, DictHit, Span};

/// Relocates annotations made against `old_tokens` onto `new_tokens`.
///
/// `new_line` is the edited sentence as typed; the acceptance rule checks
/// against it rather than against the new tokens.
#[derive(Debug, Clone)]
pub struct Relocator<'a, R = BoundaryAdjacency> {
    old_tokens: &'a [String],
    new_tokens: &'a [String],
    new_line: &'a str,
    rule: R,
}

impl<'a> Relocator<'a> {
    pub fn new(old_tokens: &'a [String], new_tokens: &'a [String], new_line: &'a str) -> Self {
        Self {
            old_tokens,
            new_tokens,
            new_line,
            rule: BoundaryAdjacency,
        }
    }
}

impl<'a, R: AcceptanceRule> Relocator<'a, R> {
    pub fn with_rule<S: AcceptanceRule>(self, rule: S) -> Relocator<'a, S> {
        Relocator {
            old_tokens: self.old_tokens,
            new_tokens: self.new_tokens,
            new_line: self.new_line,
            rule,
        }
    }

    /// New range for an old `span`, if its cloze is accepted and found on
    /// token boundaries.
    pub fn relocate_span(&self, span: Span) -> Option<Span> {
        let Some(cloze) = tokens_cloze(self.old_tokens, span) else {
            log::debug!("dropping {span:?}: outside the old tokenization");
            return None;
        };
        if !self.rule.accepts(self.new_line, &cloze) {
            log::debug!("dropping {span:?}: {:?} no longer adjacent", cloze.context());
            return None;
        }
        let found = locate_cloze(self.new_tokens, &cloze);
        if found.is_none() {
            log::debug!("dropping {span:?}: {:?} not on token boundaries", cloze.cloze);
        }
        found
    }

    pub fn dict_hits(&self, old: &[DictHit]) -> Vec<DictHit> {
        old.iter()
            .filter_map(|hit| {
                let span = self.relocate_span(hit.span)?;
                Some(DictHit {
                    span,
                    ..hit.clone()
                })
            })
            .collect()
    }

    /// Particles keep their tag and classifier data; the cloze is rebuilt
    /// for the new tokenization.
    pub fn particles(&self, old: &[AnnotatedParticle]) -> Vec<AnnotatedParticle> {
        old.iter()
            .filter_map(|annotated| {
                let span = self.relocate_span(annotated.span())?;
                let cloze = tokens_cloze(self.new_tokens, span)?;
                let mut moved = annotated.clone();
                moved.particle.span = span;
                moved.particle.cloze = cloze;
                Some(moved)
            })
            .collect()
    }

    /// Conjugated phrases skip the acceptance rule. Phrase data comes from
    /// `candidates` (the new analysis) at the relocated range, and the old
    /// choice survives only if one of the new deconjugations renders the same.
    pub fn conjugated_phrases(
        &self,
        old: &[AnnotatedConjugatedPhrase],
        candidates: &[ConjugatedPhrase],
    ) -> Vec<AnnotatedConjugatedPhrase> {
        old.iter()
            .filter_map(|annotated| self.conjugated_phrase(annotated, candidates))
            .collect()
    }

    fn conjugated_phrase(
        &self,
        annotated: &AnnotatedConjugatedPhrase,
        candidates: &[ConjugatedPhrase],
    ) -> Option<AnnotatedConjugatedPhrase> {
        let old_span = annotated.span();
        let cloze = tokens_cloze(self.old_tokens, old_span)?;
        let Some(span) = locate_cloze(self.new_tokens, &cloze) else {
            log::debug!("dropping conjugation {:?}: not in the new line", cloze.cloze);
            return None;
        };
        let Some(phrase) = candidates.iter().find(|c| c.span == span) else {
            log::debug!("dropping conjugation {:?}: no phrase at {span:?}", cloze.cloze);
            return None;
        };
        let Some(selected) = phrase.offered(&annotated.selected_deconj) else {
            log::debug!(
                "dropping conjugation {:?}: {:?} no longer offered",
                cloze.cloze,
                annotated.selected_deconj.render()
            );
            return None;
        };
        Some(AnnotatedConjugatedPhrase::new(phrase.clone(), selected.clone()))
    }
}
