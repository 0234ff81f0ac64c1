use std::collections::BTreeSet;

use crate::chunker::Segment;

/// Names tagged by default.
pub const DEFAULT_CHARACTERS: [&str; 8] = [
    "Frodo",
    "Gandalf",
    "Aragorn",
    "Galadriel",
    "Tom Bombadil",
    "Gollum",
    "Sauron",
    "Saruman",
];

/// Labels segments with the character names they mention.
///
/// Matching is a case-sensitive substring test, so pronouns and titles are missed and names that
/// occur inside other words are matched.
#[derive(Debug, Clone)]
pub struct CharacterTagger {
    vocabulary: Vec<String>,
}

impl Default for CharacterTagger {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTERS.iter().map(|s| s.to_string()).collect())
    }
}

impl CharacterTagger {
    pub fn new(vocabulary: Vec<String>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn tag(&self, text: &str) -> BTreeSet<String> {
        tag(text, &self.vocabulary)
    }

    /// Returns the segment with its tag set replaced by the names found in its text.
    pub fn apply(&self, segment: Segment) -> Segment {
        let tags = self.tag(&segment.text);
        segment.with_tags(tags)
    }

    pub fn apply_all(&self, segments: Vec<Segment>) -> Vec<Segment> {
        segments.into_iter().map(|s| self.apply(s)).collect()
    }
}

pub fn tag<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> BTreeSet<String> {
    vocabulary
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.is_empty() && text.contains(name))
        .map(str::to_string)
        .collect()
}
