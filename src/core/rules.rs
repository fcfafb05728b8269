//! Structural rule checking
//!
//! Fail-fast validation of a talk: title, cardinalities, per-question and
//! per-answer text contracts, graph acyclicity, survey rules. Callers get
//! either a fully valid talk or the first detected violation.

use std::collections::HashSet;

use crate::core::TalkGraph;
use crate::types::{Answer, Question, Talk, TalkError, TalkKind};
use crate::{MAX_ANSWERS_PER_QUESTION, MAX_QUESTIONS_PER_SURVEY, MAX_QUESTIONS_PER_TALK};

/// Field-level and cardinality validation composed with the graph check
#[derive(Debug, Default)]
pub struct RuleChecker;

impl RuleChecker {
    /// Validate a talk. Checks run in a fixed order and stop at the first
    /// violation; no partial result is ever produced.
    pub fn validate_talk(talk: &Talk) -> Result<(), TalkError> {
        if talk.title.trim().is_empty() {
            return Err(TalkError::EmptyTitle {
                talk_id: talk.id.clone(),
            });
        }

        if talk.questions.is_empty() {
            return Err(TalkError::NoQuestions {
                talk_id: talk.id.clone(),
            });
        }

        if talk.questions.len() > MAX_QUESTIONS_PER_TALK {
            return Err(TalkError::TooManyQuestions {
                talk_id: talk.id.clone(),
                count: talk.questions.len(),
                max: MAX_QUESTIONS_PER_TALK,
            });
        }

        // Duplicate ids must be rejected before the graph layer builds its
        // id map, or the second declaration would silently disappear.
        let mut seen = HashSet::new();
        for question in &talk.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(TalkError::DuplicateQuestionId {
                    talk_id: talk.id.clone(),
                    question_id: question.id.clone(),
                });
            }
        }

        for question in &talk.questions {
            Self::validate_question(question)?;
        }

        TalkGraph::new(talk).check_acyclic()?;

        if talk.kind == TalkKind::Survey {
            Self::validate_survey(talk)?;
        }

        Ok(())
    }

    fn validate_question(question: &Question) -> Result<(), TalkError> {
        if question.text.trim().is_empty() {
            return Err(TalkError::EmptyQuestionText {
                question_id: question.id.clone(),
            });
        }

        if !question.text.ends_with('?') {
            return Err(TalkError::MissingQuestionMark {
                question_id: question.id.clone(),
            });
        }

        if question.answers.is_empty() {
            return Err(TalkError::NoAnswers {
                question_id: question.id.clone(),
            });
        }

        if question.answers.len() > MAX_ANSWERS_PER_QUESTION {
            return Err(TalkError::TooManyAnswers {
                question_id: question.id.clone(),
                count: question.answers.len(),
                max: MAX_ANSWERS_PER_QUESTION,
            });
        }

        if !question.answers.iter().any(|a| a.is_ignore) {
            return Err(TalkError::MissingIgnoreAnswer {
                question_id: question.id.clone(),
            });
        }

        for answer in &question.answers {
            Self::validate_answer(answer, &question.id)?;
        }

        Ok(())
    }

    fn validate_answer(answer: &Answer, question_id: &str) -> Result<(), TalkError> {
        if answer.text.trim().is_empty() {
            return Err(TalkError::EmptyAnswerText {
                question_id: question_id.to_string(),
                answer_id: answer.id.clone(),
            });
        }

        if !answer.text.ends_with('.') {
            return Err(TalkError::MissingPeriod {
                question_id: question_id.to_string(),
                answer_id: answer.id.clone(),
            });
        }

        Ok(())
    }

    fn validate_survey(talk: &Talk) -> Result<(), TalkError> {
        if !talk.questions.iter().any(|q| q.is_aggregatable) {
            return Err(TalkError::NoAggregatableQuestion {
                talk_id: talk.id.clone(),
            });
        }

        if talk.questions.len() > MAX_QUESTIONS_PER_SURVEY {
            return Err(TalkError::SurveyTooManyQuestions {
                talk_id: talk.id.clone(),
                count: talk.questions.len(),
                max: MAX_QUESTIONS_PER_SURVEY,
            });
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
