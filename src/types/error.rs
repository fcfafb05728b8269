//! Error taxonomy
//!
//! Two families: `TalkError` for field-level and cardinality rule violations,
//! `StructureError` for graph-level defects (loops, dangling references).
//! Every variant carries enough context to render a precise message and has
//! a stable code string for logs and API payloads.

use thiserror::Error;

/// Graph-level structural defects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A back edge closes a loop; `question_id` is the node whose edge closes it
    #[error("talk {talk_id} contains a loop closed at question {question_id}")]
    CycleDetected { talk_id: String, question_id: String },

    /// An edge points at a question id absent from the talk. Fatal: the
    /// conversation would be stranded with no valid continuation.
    #[error("question {question_id} in talk {talk_id} references missing question {target_id}")]
    DanglingReference {
        talk_id: String,
        question_id: String,
        target_id: String,
    },

    /// Step resolution was asked about a question the talk does not contain
    #[error("question {question_id} not found in talk {talk_id}")]
    UnknownQuestion { talk_id: String, question_id: String },

    /// Step resolution was asked about an answer the question does not contain
    #[error("answer {answer_id} not found in question {question_id}")]
    UnknownAnswer {
        question_id: String,
        answer_id: String,
    },
}

impl StructureError {
    /// Stable code string for logging and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::CycleDetected { .. } => "TALK_LOOP",
            Self::DanglingReference { .. } => "DANGLING_REFERENCE",
            Self::UnknownQuestion { .. } => "UNKNOWN_QUESTION",
            Self::UnknownAnswer { .. } => "UNKNOWN_ANSWER",
        }
    }
}

/// Field-level and cardinality rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TalkError {
    #[error("talk {talk_id} has no title")]
    EmptyTitle { talk_id: String },

    #[error("talk {talk_id} must have at least one question")]
    NoQuestions { talk_id: String },

    #[error("talk {talk_id} has {count} questions, maximum is {max}")]
    TooManyQuestions {
        talk_id: String,
        count: usize,
        max: usize,
    },

    #[error("talk {talk_id} declares question id {question_id} more than once")]
    DuplicateQuestionId { talk_id: String, question_id: String },

    #[error("question {question_id} has no text")]
    EmptyQuestionText { question_id: String },

    #[error("question {question_id} must end with '?'")]
    MissingQuestionMark { question_id: String },

    #[error("question {question_id} must have at least one answer")]
    NoAnswers { question_id: String },

    #[error("question {question_id} has {count} answers, maximum is {max}")]
    TooManyAnswers {
        question_id: String,
        count: usize,
        max: usize,
    },

    #[error("question {question_id} must offer an ignore answer")]
    MissingIgnoreAnswer { question_id: String },

    #[error("answer {answer_id} in question {question_id} has no text")]
    EmptyAnswerText {
        question_id: String,
        answer_id: String,
    },

    #[error("answer {answer_id} in question {question_id} must end with '.'")]
    MissingPeriod {
        question_id: String,
        answer_id: String,
    },

    #[error("survey talk {talk_id} must have at least one aggregatable question")]
    NoAggregatableQuestion { talk_id: String },

    #[error("survey talk {talk_id} has {count} questions, maximum is {max}")]
    SurveyTooManyQuestions {
        talk_id: String,
        count: usize,
        max: usize,
    },

    #[error("talk {talk_id} is not a survey")]
    NotASurvey { talk_id: String },

    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl TalkError {
    /// Stable code string for logging and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle { .. } => "TITLE_REQUIRED",
            Self::NoQuestions { .. } => "NO_QUESTIONS",
            Self::TooManyQuestions { .. } => "TOO_MANY_QUESTIONS",
            Self::DuplicateQuestionId { .. } => "DUPLICATE_QUESTION_ID",
            Self::EmptyQuestionText { .. } => "QUESTION_TEXT_REQUIRED",
            Self::MissingQuestionMark { .. } => "QUESTION_MARK_REQUIRED",
            Self::NoAnswers { .. } => "NO_ANSWERS",
            Self::TooManyAnswers { .. } => "TOO_MANY_ANSWERS",
            Self::MissingIgnoreAnswer { .. } => "IGNORE_ANSWER_REQUIRED",
            Self::EmptyAnswerText { .. } => "ANSWER_TEXT_REQUIRED",
            Self::MissingPeriod { .. } => "ANSWER_PERIOD_REQUIRED",
            Self::NoAggregatableQuestion { .. } => "AGGREGATABLE_REQUIRED",
            Self::SurveyTooManyQuestions { .. } => "SURVEY_TOO_MANY_QUESTIONS",
            Self::NotASurvey { .. } => "NOT_A_SURVEY",
            Self::Structure(e) => e.code(),
        }
    }
}

/// Linear capture failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No transcript line followed the `Question? Answer1; Answer2` convention
    #[error("no capturable lines in transcript")]
    NothingCaptured,

    /// More capturable lines than a talk may hold
    #[error("transcript captures {count} questions, maximum is {max}")]
    TooManyQuestions { count: usize, max: usize },

    /// A line captures more answers than a question may hold once the
    /// synthetic ignore/match options are appended
    #[error("captured question {line} would hold {count} answers, maximum is {max}")]
    TooManyAnswers {
        line: usize,
        count: usize,
        max: usize,
    },

    /// Capture output failed its own validation. This is a synthesizer
    /// defect, not bad user input; callers must not report it as a 4xx.
    #[error("capture produced an invalid talk: {0}")]
    Internal(#[source] TalkError),
}

impl CaptureError {
    /// Stable code string for logging and API payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::NothingCaptured => "NOTHING_CAPTURED",
            Self::TooManyQuestions { .. } => "CAPTURE_TOO_MANY_QUESTIONS",
            Self::TooManyAnswers { .. } => "CAPTURE_TOO_MANY_ANSWERS",
            Self::Internal(_) => "CAPTURE_INTERNAL",
        }
    }

    /// User-input failures map to 4xx; internal failures to 5xx
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

/// Storage collaborator failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("talk store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_errors_carry_talk_and_question_context() {
        let err = StructureError::CycleDetected {
            talk_id: "t1".into(),
            question_id: "q2".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("t1") && msg.contains("q2"));
        assert_eq!(err.code(), "TALK_LOOP");
    }

    #[test]
    fn test_structure_error_converts_into_talk_error() {
        let err: TalkError = StructureError::DanglingReference {
            talk_id: "t1".into(),
            question_id: "q1".into(),
            target_id: "q999".into(),
        }
        .into();
        assert_eq!(err.code(), "DANGLING_REFERENCE");
        assert!(err.to_string().contains("q999"));
    }

    #[test]
    fn test_internal_capture_error_is_flagged() {
        let err = CaptureError::Internal(TalkError::NoQuestions { talk_id: "t1".into() });
        assert!(err.is_internal());
        assert!(!CaptureError::NothingCaptured.is_internal());
    }
}
