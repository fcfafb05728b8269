//! Linear capture: transcript lines → validated talk
//!
//! A capturable line follows the `Question? Answer1; Answer2` convention.
//! Lines that do not parse are skipped and do not consume a question index,
//! so ids are dense over parsed lines only.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;

use crate::core::RuleChecker;
use crate::types::{Answer, CaptureError, Question, Tag, Talk, TalkKind};
use crate::{
    CAPTURE_LANGUAGE, CAPTURE_TITLE, IGNORE_ANSWER_TEXT, MATCH_ANSWER_TEXT,
    MAX_ANSWERS_PER_QUESTION, MAX_QUESTIONS_PER_TALK,
};

/// One successfully parsed transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Everything up to and including the first '?'
    pub question: String,
    /// Semicolon-separated pieces, trimmed, normalized to end with '.'
    pub answers: Vec<String>,
}

/// Synthesizer turning an ordered transcript into a linear talk
#[derive(Debug, Default)]
pub struct LinearCapture;

impl LinearCapture {
    /// Parse a single transcript line. Returns None when the line has no
    /// '?' or no non-empty answer pieces after it.
    pub fn parse_line(line: &str) -> Option<ParsedLine> {
        let trimmed = line.trim();

        let question_end = trimmed.find('?')?;
        let question = trimmed[..=question_end].to_string();

        let answers: Vec<String> = trimmed[question_end + 1..]
            .split(';')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(|piece| {
                if piece.ends_with('.') {
                    piece.to_string()
                } else {
                    format!("{}.", piece)
                }
            })
            .collect();

        if answers.is_empty() {
            return None;
        }

        Some(ParsedLine { question, answers })
    }

    /// Build a validated linear talk from transcript lines.
    ///
    /// Every question gets an appended ignore answer; the last question also
    /// gets a match answer. Real answers of non-final questions point at the
    /// next parsed question; the final question's real answers are terminal.
    pub fn create_linear_talk(
        author_id: &str,
        lines: &[String],
        tags: &[String],
    ) -> Result<Talk, CaptureError> {
        let parsed: Vec<ParsedLine> = lines.iter().filter_map(|l| Self::parse_line(l)).collect();

        if parsed.is_empty() {
            return Err(CaptureError::NothingCaptured);
        }
        if parsed.len() > MAX_QUESTIONS_PER_TALK {
            return Err(CaptureError::TooManyQuestions {
                count: parsed.len(),
                max: MAX_QUESTIONS_PER_TALK,
            });
        }

        let last = parsed.len() - 1;
        let mut questions = Vec::with_capacity(parsed.len());

        for (index, line) in parsed.into_iter().enumerate() {
            let is_last = index == last;
            // Room must remain for the appended ignore answer, and on the
            // final question for the match answer as well.
            let synthetic = if is_last { 2 } else { 1 };
            if line.answers.len() + synthetic > MAX_ANSWERS_PER_QUESTION {
                return Err(CaptureError::TooManyAnswers {
                    line: index,
                    count: line.answers.len() + synthetic,
                    max: MAX_ANSWERS_PER_QUESTION,
                });
            }

            let mut answers: Vec<Answer> = line
                .answers
                .into_iter()
                .enumerate()
                .map(|(k, text)| {
                    let answer = Answer::new(format!("a_{}_{}", index, k), text);
                    if is_last {
                        answer.terminal()
                    } else {
                        answer.with_next(format!("q_{}", index + 1))
                    }
                })
                .collect();

            answers.push(Answer::new(format!("a_{}_ignore", index), IGNORE_ANSWER_TEXT).ignore());
            if is_last {
                answers.push(Answer::new("a_final_match", MATCH_ANSWER_TEXT).matching());
            }

            let mut question = Question::new(format!("q_{}", index), line.question, answers);
            if !is_last {
                question = question.with_next(format!("q_{}", index + 1));
            }
            questions.push(question);
        }

        let talk = Talk {
            id: generate_talk_id(author_id),
            title: CAPTURE_TITLE.to_string(),
            author_id: author_id.to_string(),
            kind: TalkKind::Matching,
            is_adult: false,
            language: CAPTURE_LANGUAGE.to_string(),
            tags: tags.iter().map(|name| Tag::from_name(name.as_str())).collect(),
            questions,
            created_at: Utc::now(),
            is_template: true,
            usage_count: 0,
        };

        // The synthesizer's own output must always validate; a failure here
        // is a defect in this module, not bad user input.
        RuleChecker::validate_talk(&talk).map_err(CaptureError::Internal)?;

        Ok(talk)
    }
}

/// Generate a talk id from the wall clock and the author
fn generate_talk_id(author_id: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("talk_{:x}_{}", nanos as u64, author_id)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_line_splits_question_and_answers() {
        let parsed = LinearCapture::parse_line("What's your favorite color? Red; Blue; Green").unwrap();
        assert_eq!(parsed.question, "What's your favorite color?");
        assert_eq!(parsed.answers, vec!["Red.", "Blue.", "Green."]);
    }

    #[test]
    fn test_parse_line_keeps_existing_periods() {
        let parsed = LinearCapture::parse_line("Coffee? Yes.; No").unwrap();
        assert_eq!(parsed.answers, vec!["Yes.", "No."]);
    }

    #[test]
    fn test_parse_line_drops_empty_pieces() {
        let parsed = LinearCapture::parse_line("Coffee? Yes; ; ;No").unwrap();
        assert_eq!(parsed.answers, vec!["Yes.", "No."]);
    }

    #[test]
    fn test_parse_line_without_question_mark_is_none() {
        assert!(LinearCapture::parse_line("Hello there").is_none());
    }

    #[test]
    fn test_parse_line_without_answers_is_none() {
        assert!(LinearCapture::parse_line("Anyone home?").is_none());
        assert!(LinearCapture::parse_line("Anyone home?  ;  ; ").is_none());
    }

    #[test]
    fn test_single_line_capture_yields_four_answers() {
        let talk = LinearCapture::create_linear_talk(
            "user-1",
            &lines(&["What's your hobby? Reading; Sports"]),
            &lines(&["casual"]),
        )
        .unwrap();

        assert_eq!(talk.questions.len(), 1);
        let question = &talk.questions[0];
        assert_eq!(question.id, "q_0");
        // 2 parsed + ignore + match
        assert_eq!(question.answers.len(), 4);
        assert!(question.answers.iter().all(|a| a.is_terminal));
        assert!(question.answers.iter().any(|a| a.is_ignore));
        assert!(question.answers.iter().any(|a| a.is_match));

        assert_eq!(talk.kind, TalkKind::Matching);
        assert!(talk.is_template);
        assert_eq!(talk.tags[0].name, "casual");

        // safety net: the output always revalidates as-is
        assert!(RuleChecker::validate_talk(&talk).is_ok());
    }

    #[test]
    fn test_chain_edges_point_at_next_question() {
        let talk = LinearCapture::create_linear_talk(
            "user-1",
            &lines(&["First? A; B", "Second? C"]),
            &[],
        )
        .unwrap();

        assert_eq!(talk.questions.len(), 2);
        let first = &talk.questions[0];
        assert_eq!(first.next_question_id.as_deref(), Some("q_1"));
        assert_eq!(first.answers[0].next_question_id.as_deref(), Some("q_1"));
        assert!(!first.answers[0].is_terminal);
        // the ignore option never chains
        let ignore = first.answer("a_0_ignore").unwrap();
        assert!(ignore.next_question_id.is_none() && ignore.is_terminal);

        let second = &talk.questions[1];
        assert!(second.next_question_id.is_none());
        assert!(second.answers[0].is_terminal);
        assert!(second.answer("a_final_match").is_some());
    }

    #[test]
    fn test_unparsable_lines_do_not_consume_an_index() {
        let talk = LinearCapture::create_linear_talk(
            "user-1",
            &lines(&["just chatting", "Real question? Yes", "also noise", "Another? Sure"]),
            &[],
        )
        .unwrap();

        let ids: Vec<&str> = talk.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q_0", "q_1"]);
        // last *parsed* line is terminal even though raw input ended with it anyway
        assert!(talk.questions[1].answers[0].is_terminal);
    }

    #[test]
    fn test_trailing_unparsable_line_still_terminates_last_question() {
        // "last" must track the parsed count, not the raw line count, or q_1
        // would point at a question that never materializes
        let talk = LinearCapture::create_linear_talk(
            "user-1",
            &lines(&["First? A", "Second? B", "goodbye then"]),
            &[],
        )
        .unwrap();

        assert_eq!(talk.questions.len(), 2);
        assert!(talk.questions[1].next_question_id.is_none());
        assert!(talk.questions[1].answers[0].is_terminal);
        assert!(RuleChecker::validate_talk(&talk).is_ok());
    }

    #[test]
    fn test_empty_transcript_is_user_error() {
        let err = LinearCapture::create_linear_talk("user-1", &lines(&["hi", "bye"]), &[]).unwrap_err();
        assert_eq!(err, CaptureError::NothingCaptured);
        assert!(!err.is_internal());
    }

    #[test]
    fn test_too_many_lines_is_user_error() {
        let raw: Vec<String> = (0..21).map(|i| format!("Question number {}? Yes", i)).collect();
        let err = LinearCapture::create_linear_talk("user-1", &raw, &[]).unwrap_err();
        assert!(matches!(err, CaptureError::TooManyQuestions { count: 21, .. }));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_too_many_answers_is_user_error() {
        let line = format!("Pick one? {}", (0..10).map(|i| format!("Option {}", i)).collect::<Vec<_>>().join("; "));
        let err = LinearCapture::create_linear_talk("user-1", &[line], &[]).unwrap_err();
        assert!(matches!(err, CaptureError::TooManyAnswers { .. }));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_twenty_lines_is_accepted() {
        let raw: Vec<String> = (0..20).map(|i| format!("Question number {}? Yes", i)).collect();
        let talk = LinearCapture::create_linear_talk("user-1", &raw, &[]).unwrap();
        assert_eq!(talk.questions.len(), 20);
        assert!(RuleChecker::validate_talk(&talk).is_ok());
    }
}
