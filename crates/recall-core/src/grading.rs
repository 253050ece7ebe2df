//! Answer grading for free-text recall attempts.

/// Keyword-overlap grader.
///
/// An answer is correct when any whitespace-separated token of the reference
/// answer appears, case-insensitively, inside the learner's answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerGrader;

impl AnswerGrader {
    pub fn new() -> Self {
        Self
    }

    /// Grade `user_answer` against `reference`. An empty reference never matches.
    pub fn grade(&self, user_answer: &str, reference: &str) -> bool {
        let answer = user_answer.to_lowercase();
        reference
            .to_lowercase()
            .split_whitespace()
            .any(|token| answer.contains(token))
    }
}
