//! Particle-taxonomy outline parsing.
//!
//! The taxonomy is a markdown document in which every relevant line starts
//! with zero or more tabs followed by a digit. Each tab is one level of
//! nesting. Parsing assigns every such line a dotted [`SectionNumber`] in
//! document order and produces an immutable [`ParticleOutline`] holding two
//! lookups: section number to entry, and top-level group to its entries.
//!
//! Parsing happens in two phases:
//!
//! 1. [`line::classify`] extracts local facts (indent, description) per line.
//! 2. [`CounterStack::advance`] folds the indents into section numbers.

pub mod line;
pub mod shared;
pub mod state;


use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub use shared::SharedOutline;
pub use state::{CounterStack, EmptyCounterStack, OverIndent, Step};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("line {line}: indented {indent} tabs after a line at {previous}, more than one level")]
    OverIndent {
        line: usize,
        indent: usize,
        previous: usize,
    },
    #[error("line {line}: expected zero or more tabs followed by a number")]
    MalformedLine { line: usize },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid section number: {0:?}")]
pub struct ParseSectionError(String);

/// Dotted path of an entry from the outline root, e.g. `2.1.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionNumber(Vec<u32>);

impl SectionNumber {
    pub fn new(parts: Vec<u32>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    /// Nesting depth, 1 for top-level entries.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Top-level group number.
    pub fn group(&self) -> Option<u32> {
        self.0.first().copied()
    }

    pub fn parent(&self) -> Option<SectionNumber> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    /// True when `other` lies strictly below `self` in the tree.
    pub fn is_ancestor_of(&self, other: &SectionNumber) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl FromStr for SectionNumber {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseSectionError(s.to_string()));
        }
        s.split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
            .map_err(|_| ParseSectionError(s.to_string()))
    }
}

impl TryFrom<String> for SectionNumber {
    type Error = ParseSectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SectionNumber> for String {
    fn from(section: SectionNumber) -> Self {
        section.to_string()
    }
}

/// One node of the particle taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub section: SectionNumber,
    pub description: String,
    /// Description of the top-level ancestor: the particle this entry belongs to.
    pub particle: String,
    pub leaf: bool,
}

impl OutlineEntry {
    /// Display form used by pickers and rendered glosses: `#1.2. description`.
    pub fn full_line(&self) -> String {
        format!("#{}. {}", self.section, self.description)
    }
}

/// Parsed taxonomy. Built once per parse and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleOutline {
    groups: BTreeMap<u32, Vec<OutlineEntry>>,
    sections: HashMap<String, (u32, usize)>,
}

impl ParticleOutline {
    fn from_entries(entries: Vec<(u32, OutlineEntry)>) -> Self {
        let mut groups: BTreeMap<u32, Vec<OutlineEntry>> = BTreeMap::new();
        let mut sections = HashMap::new();
        for (group, entry) in entries {
            let bucket = groups.entry(group).or_default();
            sections.insert(entry.section.to_string(), (group, bucket.len()));
            bucket.push(entry);
        }
        Self { groups, sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Looks up an entry by its dotted section string.
    pub fn entry(&self, section: &str) -> Option<&OutlineEntry> {
        let (group, idx) = self.sections.get(section)?;
        self.groups.get(group)?.get(*idx)
    }

    /// Entries of one top-level group in document order; empty for unknown groups.
    pub fn group(&self, number: u32) -> &[OutlineEntry] {
        self.groups.get(&number).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups in ascending number order, which is also document order.
    pub fn groups(&self) -> impl Iterator<Item = (u32, &[OutlineEntry])> {
        self.groups.iter().map(|(n, v)| (*n, v.as_slice()))
    }

    /// Every entry in document order.
    pub fn entries(&self) -> impl Iterator<Item = &OutlineEntry> {
        self.groups.values().flatten()
    }

    /// `#section. description` for a known section, empty otherwise.
    pub fn full_line(&self, section: &str) -> String {
        self.entry(section)
            .map(OutlineEntry::full_line)
            .unwrap_or_default()
    }

    /// Particle label of a known section, empty otherwise.
    pub fn particle_of(&self, section: &str) -> String {
        self.entry(section)
            .map(|e| e.particle.clone())
            .unwrap_or_default()
    }
}

/// Parses a taxonomy document. Any over-indented line aborts the whole parse.
pub fn parse_outline(text: &str) -> Result<ParticleOutline, OutlineError> {
    let mut stack = CounterStack::new();
    let mut parents: HashSet<SectionNumber> = HashSet::new();
    let mut flat: Vec<(u32, SectionNumber, String, String)> = Vec::new();
    let mut particle = String::new();

    for (idx, raw) in text.lines().enumerate() {
        let Some(line) = line::classify(idx + 1, raw) else {
            continue;
        };

        let step = stack
            .advance(line.indent)
            .map_err(|e| OutlineError::OverIndent {
                line: line.line_number,
                indent: e.indent,
                previous: e.previous,
            })?;
        if let Some(parent) = step.new_parent {
            parents.insert(parent);
        }
        stack = step.next;

        let section = stack.section();
        let Some(group) = section.group() else {
            return Err(OutlineError::MalformedLine {
                line: line.line_number,
            });
        };
        if section.depth() == 1 {
            particle = line.description.clone();
        }
        flat.push((group, section, line.description, particle.clone()));
    }

    let entries = flat
        .into_iter()
        .map(|(group, section, description, particle)| {
            let entry = OutlineEntry {
                leaf: !parents.contains(&section),
                section,
                description,
                particle,
            };
            (group, entry)
        })
        .collect();

    let outline = ParticleOutline::from_entries(entries);
    log::info!(
        "parsed particle outline: {} entries in {} groups",
        outline.len(),
        outline.groups.len()
    );
    Ok(outline)
}
