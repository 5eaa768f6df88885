//! Choosing which outline entries an annotator may pick for a particle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Particle;
use crate::outline::{OutlineEntry, ParseSectionError, ParticleOutline, SectionNumber};

/// Wire value of the empty selection. No section number is ever empty.
pub const NO_SELECTION: &str = "";

/// Prompt shown in place of the empty selection.
pub const PICK_PROMPT: &str = "Pick as detailed a particle as possible";

/// The annotator's single choice for a particle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Section(SectionNumber),
}

impl Selection {
    pub fn from_value(value: &str) -> Result<Self, ParseSectionError> {
        if value == NO_SELECTION {
            return Ok(Selection::None);
        }
        value.parse().map(Selection::Section)
    }

    pub fn value(&self) -> String {
        match self {
            Selection::None => NO_SELECTION.to_string(),
            Selection::Section(section) => section.to_string(),
        }
    }

    pub fn section(&self) -> Option<&SectionNumber> {
        match self {
            Selection::None => None,
            Selection::Section(section) => Some(section),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Top-level group of the selected section, as a one-part section number.
    fn group_section(&self) -> Option<SectionNumber> {
        let group = self.section()?.group()?;
        Some(SectionNumber::new(vec![group]))
    }
}

impl From<SectionNumber> for Selection {
    fn from(section: SectionNumber) -> Self {
        Selection::Section(section)
    }
}

/// Extra surface forms to search for when a manual candidate is typed.
///
/// Only the forms listed here are searched; nothing is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlternateForms(BTreeMap<String, Vec<String>>);

impl AlternateForms {
    pub fn new(forms: BTreeMap<String, Vec<String>>) -> Self {
        Self(forms)
    }

    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, candidate: impl Into<String>, alternates: Vec<String>) {
        self.0.insert(candidate.into(), alternates);
    }

    pub fn alternates(&self, candidate: &str) -> &[String] {
        self.0.get(candidate).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for AlternateForms {
    /// ん is how の is often pronounced (and written) in casual speech.
    fn default() -> Self {
        let mut forms = Self::empty();
        forms.insert("ん", vec!["の".to_string()]);
        forms
    }
}

/// What is known about the particle being classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleQuery {
    /// Groups proposed by the NLP classifier. Takes priority when non-empty.
    pub groups: Vec<u32>,
    /// Surface text typed or found, used when there are no proposed groups.
    pub candidate: String,
    pub current: Selection,
}

impl ParticleQuery {
    pub fn manual(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            ..Default::default()
        }
    }

    pub fn groups(groups: Vec<u32>) -> Self {
        Self {
            groups,
            ..Default::default()
        }
    }

    pub fn for_particle(particle: &Particle, current: Selection) -> Self {
        Self {
            groups: particle.candidate_groups(),
            candidate: particle.cloze.cloze.clone(),
            current,
        }
    }

    pub fn with_current(mut self, current: Selection) -> Self {
        self.current = current;
        self
    }
}

/// Matches particle queries against one parsed outline.
#[derive(Debug, Clone)]
pub struct ParticlePicker {
    outline: Arc<ParticleOutline>,
    forms: AlternateForms,
}

impl ParticlePicker {
    pub fn new(outline: Arc<ParticleOutline>, forms: AlternateForms) -> Self {
        Self { outline, forms }
    }

    pub fn outline(&self) -> &ParticleOutline {
        &self.outline
    }

    /// Entries offered for `query`, in group order then document order.
    pub fn eligible(&self, query: &ParticleQuery) -> Vec<&OutlineEntry> {
        if !query.groups.is_empty() {
            return query
                .groups
                .iter()
                .flat_map(|n| self.outline.group(*n))
                .collect();
        }

        let current_group = query.current.group_section();
        let alternates = self.forms.alternates(&query.candidate);

        self.outline
            .groups()
            .filter(|(_, entries)| {
                let Some(head) = entries.first() else {
                    return false;
                };
                current_group.as_ref() == Some(&head.section)
                    || head.particle.contains(query.candidate.as_str())
                    || alternates
                        .iter()
                        .any(|alt| !alt.is_empty() && head.particle.contains(alt.as_str()))
            })
            .flat_map(|(_, entries)| entries)
            .collect()
    }

    /// Option text for one entry: `1.2. ✅ description` for leaves.
    pub fn label(entry: &OutlineEntry) -> String {
        let leaf = if entry.leaf { "✅ " } else { "" };
        format!("{}. {leaf}{}", entry.section, entry.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::parse_outline;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const TAXONOMY: &str = "1 が
\t1 subject
\t2 object of desire
2 は
\t1 topic
3 の
\t1 possessive
\t2 nominalizer
4 のに
5 を
";

    fn picker() -> ParticlePicker {
        ParticlePicker::new(
            Arc::new(parse_outline(TAXONOMY).unwrap()),
            AlternateForms::default(),
        )
    }

    fn sections(entries: &[&OutlineEntry]) -> Vec<String> {
        entries.iter().map(|e| e.section.to_string()).collect()
    }

    #[test]
    fn proposed_groups_take_priority() {
        let picker = picker();
        let query = ParticleQuery {
            groups: vec![5, 2],
            candidate: "が".to_string(),
            current: Selection::None,
        };
        assert_eq!(sections(&picker.eligible(&query)), vec!["5", "2", "2.1"]);
    }

    #[test]
    fn unknown_groups_contribute_nothing() {
        let picker = picker();
        assert!(picker.eligible(&ParticleQuery::groups(vec![42])).is_empty());
    }

    #[rstest]
    #[case("が", vec!["1", "1.1", "1.2"])]
    #[case("の", vec!["3", "3.1", "3.2", "4"])]
    #[case("ん", vec!["3", "3.1", "3.2", "4"])]
    #[case("ぞ", vec![])]
    fn manual_candidate_filters_by_particle(#[case] candidate: &str, #[case] expected: Vec<&str>) {
        let picker = picker();
        assert_eq!(
            sections(&picker.eligible(&ParticleQuery::manual(candidate))),
            expected
        );
    }

    #[test]
    fn empty_candidate_matches_everything() {
        let picker = picker();
        assert_eq!(
            picker.eligible(&ParticleQuery::manual("")).len(),
            picker.outline().len()
        );
    }

    #[test]
    fn current_value_keeps_its_group_visible() {
        let picker = picker();
        let current = Selection::from_value("2.1").unwrap();
        let query = ParticleQuery::manual("を").with_current(current);
        assert_eq!(sections(&picker.eligible(&query)), vec!["2", "2.1", "5"]);
    }

    #[test]
    fn alternate_forms_are_only_what_the_table_says() {
        let outline = Arc::new(parse_outline(TAXONOMY).unwrap());
        let picker = ParticlePicker::new(outline, AlternateForms::empty());
        assert!(picker.eligible(&ParticleQuery::manual("ん")).is_empty());
    }

    #[test]
    fn custom_alternate_forms() {
        let mut forms = AlternateForms::empty();
        forms.insert("って", vec!["は".to_string()]);
        let picker = ParticlePicker::new(Arc::new(parse_outline(TAXONOMY).unwrap()), forms);
        assert_eq!(
            sections(&picker.eligible(&ParticleQuery::manual("って"))),
            vec!["2", "2.1"]
        );
    }

    #[test]
    fn selection_wire_values() {
        assert_eq!(Selection::from_value(""), Ok(Selection::None));
        assert_eq!(Selection::None.value(), NO_SELECTION);
        let picked = Selection::from_value("3.2").unwrap();
        assert_eq!(picked.value(), "3.2");
        assert!(!picked.is_none());
        assert!(Selection::from_value("x").is_err());
    }

    #[test]
    fn labels_mark_leaves() {
        let picker = picker();
        let outline = picker.outline();
        assert_eq!(ParticlePicker::label(outline.entry("3").unwrap()), "3. の");
        assert_eq!(
            ParticlePicker::label(outline.entry("3.2").unwrap()),
            "3.2. ✅ nominalizer"
        );
    }

    #[test]
    fn alternate_forms_deserialize_from_a_table() {
        let forms: AlternateForms = serde_json::from_str(r#"{"ん": ["の"]}"#).unwrap();
        assert_eq!(forms, AlternateForms::default());
    }
}
