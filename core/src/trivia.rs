//! Parsing of generated trivia and the quiz built from it.

use thiserror::Error;

const QUESTION_MARKER: &str = "Question:";
const OPTIONS_MARKER: &str = "Options:";
const ANSWER_MARKER: &str = "Answer:";
const OPTION_LABELS: [&str; 4] = ["A.", "B.", "C.", "D."];

/// A multiple-choice question. Options keep their labels, e.g. `"A. Sauron"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriviaQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: String,
}

impl TriviaQuestion {
    /// Substituted whenever a completion cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            question: "Who is the author of The Lord of the Rings?".to_string(),
            options: [
                "A. J.R.R. Tolkien".to_string(),
                "B. C.S. Lewis".to_string(),
                "C. George R.R. Martin".to_string(),
                "D. Terry Pratchett".to_string(),
            ],
            correct_answer: "A".to_string(),
        }
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        is_correct(selected, &self.correct_answer)
    }
}

/// A selected option matches when it starts with the correct answer, so a bare letter such as
/// `"A"` matches `"A. J.R.R. Tolkien"`.
pub fn is_correct(selected: &str, correct_answer: &str) -> bool {
    selected.starts_with(correct_answer)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no non-empty `Question:` line")]
    MissingQuestion,
    #[error("no non-empty `Answer:` line")]
    MissingAnswer,
    #[error("expected 4 options, found {0}")]
    OptionCount(usize),
}

/// Parses a completion of the form
///
/// ```text
/// Question: ...
/// Options: A. ..., B. ..., C. ..., D. ...
/// Answer: ...
/// ```
///
/// Blank lines may appear anywhere. When a marker appears on several lines the last one wins.
pub fn parse(raw: &str) -> Result<TriviaQuestion, ParseFailure> {
    let mut question = String::new();
    let mut options: Vec<String> = Vec::new();
    let mut answer = String::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = line.strip_prefix(QUESTION_MARKER) {
            question = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(OPTIONS_MARKER) {
            options = split_options(rest.trim());
        } else if let Some(rest) = line.strip_prefix(ANSWER_MARKER) {
            answer = rest.trim().to_string();
        }
    }

    if question.is_empty() {
        return Err(ParseFailure::MissingQuestion);
    }
    if answer.is_empty() {
        return Err(ParseFailure::MissingAnswer);
    }
    let options: [String; 4] = options
        .try_into()
        .map_err(|found: Vec<String>| ParseFailure::OptionCount(found.len()))?;

    Ok(TriviaQuestion {
        question,
        options,
        correct_answer: answer,
    })
}

/// Never fails: malformed input yields [`TriviaQuestion::fallback`].
pub fn parse_or_fallback(raw: &str) -> TriviaQuestion {
    parse(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Malformed trivia completion, using fallback question");
        TriviaQuestion::fallback()
    })
}

/// Splits an options line on the literal `A.`..`D.` labels.
///
/// Labels are looked up in order, each after the end of the previous one. Each option runs from its
/// label to the next label (or the end of the line for `D.`); a trailing comma is dropped. Stops at
/// the first missing label.
fn split_options(line: &str) -> Vec<String> {
    let mut starts = Vec::with_capacity(OPTION_LABELS.len());
    let mut from = 0;
    for label in OPTION_LABELS {
        match line[from..].find(label) {
            Some(offset) => {
                starts.push(from + offset);
                from += offset + label.len();
            }
            None => break,
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            let option = line[start..end].trim();
            option.strip_suffix(',').unwrap_or(option).trim().to_string()
        })
        .collect()
}

/// Outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub question: TriviaQuestion,
    pub selected: String,
    pub is_correct: bool,
}

/// Questions answered one at a time with a running score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<TriviaQuestion>,
    responses: Vec<String>,
    score: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<TriviaQuestion>) -> Self {
        Self {
            questions,
            responses: Vec::new(),
            score: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn questions(&self) -> &[TriviaQuestion] {
        &self.questions
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// Zero-based index of the next unanswered question.
    pub fn position(&self) -> usize {
        self.responses.len()
    }

    pub fn current(&self) -> Option<&TriviaQuestion> {
        self.questions.get(self.position())
    }

    pub fn is_finished(&self) -> bool {
        self.position() >= self.questions.len()
    }

    /// Records `selected` for the current question and moves on. `None` once finished.
    pub fn answer(&mut self, selected: impl Into<String>) -> Option<bool> {
        let selected = selected.into();
        let correct = self.current()?.is_correct(&selected);
        self.responses.push(selected);
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    pub fn results(&self) -> Vec<QuizOutcome> {
        self.questions
            .iter()
            .zip(&self.responses)
            .map(|(question, selected)| QuizOutcome {
                question: question.clone(),
                selected: selected.clone(),
                is_correct: question.is_correct(selected),
            })
            .collect()
    }

    /// Drops questions, responses and score.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_RING: &str = "Question: Who forged the One Ring?\nOptions: A. Sauron, B. Celebrimbor, C. Saruman, D. Gandalf\nAnswer: A";

    fn labelled(options: [&str; 4]) -> [String; 4] {
        options.map(str::to_string)
    }

    #[test]
    fn parses_well_formed_completion() {
        let q = parse(ONE_RING).unwrap();
        assert_eq!(q.question, "Who forged the One Ring?");
        assert_eq!(
            q.options,
            labelled(["A. Sauron", "B. Celebrimbor", "C. Saruman", "D. Gandalf"])
        );
        assert_eq!(q.correct_answer, "A");
    }

    #[test]
    fn tolerates_blank_lines_and_surrounding_text() {
        let raw = "Here is your trivia:\n\n  Question: Where was Bilbo born?  \n\n\nOptions: A. Bag End,B. Rivendell, C. Bree , D. Dale\n\nAnswer: A. Bag End\n";
        let q = parse(raw).unwrap();
        assert_eq!(q.question, "Where was Bilbo born?");
        assert_eq!(
            q.options,
            labelled(["A. Bag End", "B. Rivendell", "C. Bree", "D. Dale"])
        );
        assert_eq!(q.correct_answer, "A. Bag End");
    }

    #[test]
    fn labels_split_without_surrounding_spaces() {
        let raw = "Question: Who forged the One Ring?\nOptions: A.Sauron, B.Celebrimbor, C.Saruman, D.Gandalf\nAnswer: A";
        assert_eq!(
            parse(raw).unwrap().options,
            labelled(["A.Sauron", "B.Celebrimbor", "C.Saruman", "D.Gandalf"])
        );

        let raw = "Question: Who forged the One Ring?\nOptions: (A. Sauron) (B. Celebrimbor) (C. Saruman) (D. Gandalf)\nAnswer: A";
        assert_eq!(
            parse(raw).unwrap().options,
            labelled(["A. Sauron) (", "B. Celebrimbor) (", "C. Saruman) (", "D. Gandalf)"])
        );
    }

    #[test]
    fn labels_are_matched_as_literal_substrings() {
        let raw = "Question: Who wrote it?\nOptions: A. J.R.R. Tolkien, B. C.S. Lewis, C. George R.R. Martin, D. Terry Pratchett\nAnswer: A";
        assert_eq!(
            parse(raw).unwrap().options,
            labelled([
                "A. J.R.R. Tolkien",
                "B.",
                "C.S. Lewis, C. George R.R. Martin",
                "D. Terry Pratchett"
            ])
        );
    }

    #[test]
    fn later_marker_lines_win() {
        let raw = format!("{ONE_RING}\nAnswer: B");
        assert_eq!(parse(&raw).unwrap().correct_answer, "B");
    }

    #[test]
    fn reports_why_parsing_failed() {
        assert_eq!(parse(""), Err(ParseFailure::MissingQuestion));
        assert_eq!(
            parse("Question: q\nOptions: A. a, B. b, C. c, D. d"),
            Err(ParseFailure::MissingAnswer)
        );
        assert_eq!(
            parse("Question: q\nOptions: A. a, B. b, C. c\nAnswer: A"),
            Err(ParseFailure::OptionCount(3))
        );
        assert_eq!(
            parse("Question: q\nAnswer: A"),
            Err(ParseFailure::OptionCount(0))
        );
        assert_eq!(
            parse("Question:   \nOptions: A. a, B. b, C. c, D. d\nAnswer: A"),
            Err(ParseFailure::MissingQuestion)
        );
    }

    #[test]
    fn fallback_is_used_for_garbage() {
        for raw in [
            "",
            "garbage text with no markers",
            "Question: q\nOptions: A. a, B. b, C. c\nAnswer: A",
            "Options: D. d, C. c, B. b, A. a\nQuestion: q\nAnswer: A",
        ] {
            assert_eq!(parse_or_fallback(raw), TriviaQuestion::fallback());
        }
        let fallback = TriviaQuestion::fallback();
        assert_eq!(fallback.question, "Who is the author of The Lord of the Rings?");
        assert_eq!(
            fallback.options,
            labelled([
                "A. J.R.R. Tolkien",
                "B. C.S. Lewis",
                "C. George R.R. Martin",
                "D. Terry Pratchett"
            ])
        );
        assert_eq!(fallback.correct_answer, "A");
    }

    #[test]
    fn answers_match_by_prefix() {
        assert!(is_correct("A. Sauron", "A"));
        assert!(is_correct("A. Sauron", "A. Sauron"));
        assert!(!is_correct("B. Celebrimbor", "A"));
        assert!(!is_correct("A", "A. Sauron"));
    }

    #[test]
    fn quiz_session_tracks_score_and_results() {
        let mut session = QuizSession::new(vec![parse(ONE_RING).unwrap(), TriviaQuestion::fallback()]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.current().unwrap().question, "Who forged the One Ring?");

        assert_eq!(session.answer("A. Sauron"), Some(true));
        assert_eq!(session.answer("C. George R.R. Martin"), Some(false));
        assert!(session.is_finished());
        assert_eq!(session.answer("A. J.R.R. Tolkien"), None);
        assert_eq!(session.score(), 1);

        let results = session.results();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_correct);
        assert_eq!(results[1].selected, "C. George R.R. Martin");
        assert!(!results[1].is_correct);

        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.score(), 0);
    }
}
