use crate::{chunker::Segment, vector_store::ScoredSegment};

/// Separator used for question answering contexts.
pub const QA_SEPARATOR: &str = "\n";
/// Separator used for entity analysis contexts.
pub const ANALYSIS_SEPARATOR: &str = "\n\n";

/// Joins segment texts in retrieval order.
///
/// With `max_length`, the joined string is cut to that many leading characters, wherever that
/// falls.
pub fn assemble<'a, I>(segments: I, separator: &str, max_length: Option<usize>) -> String
where
    I: IntoIterator<Item = &'a Segment>,
{
    let joined = segments
        .into_iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    match max_length {
        Some(max) => truncate_chars(joined, max),
        None => joined,
    }
}

pub fn assemble_scored(
    scored: &[ScoredSegment],
    separator: &str,
    max_length: Option<usize>,
) -> String {
    assemble(scored.iter().map(|s| &s.segment), separator, max_length)
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max) {
        text.truncate(byte_idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(texts: &[&str]) -> Vec<Segment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Segment::new(format!("s#{i}"), *t, "s"))
            .collect()
    }

    #[test]
    fn joins_in_order() {
        let segs = segments(&["one", "two", "three"]);
        assert_eq!(assemble(&segs, QA_SEPARATOR, None), "one\ntwo\nthree");
        assert_eq!(assemble(&segs, ANALYSIS_SEPARATOR, None), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn hard_truncation() {
        let segs = segments(&["Gandalf", "Frodo"]);
        assert_eq!(assemble(&segs, QA_SEPARATOR, Some(9)), "Gandalf\nF");
        assert_eq!(assemble(&segs, QA_SEPARATOR, Some(0)), "");
    }

    #[test]
    fn short_join_is_untouched() {
        let segs = segments(&["Gandalf", "Frodo"]);
        let unbounded = assemble(&segs, QA_SEPARATOR, None);
        assert_eq!(assemble(&segs, QA_SEPARATOR, Some(13)), unbounded);
        assert_eq!(assemble(&segs, QA_SEPARATOR, Some(2250)), unbounded);
    }

    #[test]
    fn truncation_counts_chars() {
        let segs = segments(&["Lúthien", "Eärendil"]);
        let out = assemble(&segs, ANALYSIS_SEPARATOR, Some(8));
        assert_eq!(out, "Lúthien\n");
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn empty_input() {
        assert_eq!(assemble(&[], QA_SEPARATOR, Some(10)), "");
    }
}
