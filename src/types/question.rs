//! Question, Answer and branch-logic records
//!
//! A question's outgoing edges are derived, not stored: the union of its own
//! `next_question_id`, every branch-logic target, and every answer's
//! `next_question_id`.

use serde::{Deserialize, Serialize};

/// One selectable answer within a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    /// Answer text, must end with '.'
    pub text: String,
    /// Question to continue with when this answer is picked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question_id: Option<String>,
    /// Conversation ends after this answer
    #[serde(default)]
    pub is_terminal: bool,
    /// Decline option, always terminal
    #[serde(default)]
    pub is_ignore: bool,
    /// Pairing outcome, always terminal
    #[serde(default)]
    pub is_match: bool,
}

impl Answer {
    /// Create a plain answer with no edge and no flags
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_question_id: None,
            is_terminal: false,
            is_ignore: false,
            is_match: false,
        }
    }

    /// Set the follow-up question edge
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next_question_id = Some(next.into());
        self
    }

    /// Mark as terminal
    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    /// Mark as the mandatory decline option (terminal by definition)
    pub fn ignore(mut self) -> Self {
        self.is_ignore = true;
        self.is_terminal = true;
        self
    }

    /// Mark as a match outcome (terminal by definition)
    pub fn matching(mut self) -> Self {
        self.is_match = true;
        self.is_terminal = true;
        self
    }
}

/// Alternate edge keyed by a specific answer selection, independent of the
/// answer's own `next_question_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchLogic {
    pub answer_id: String,
    pub next_question_id: String,
}

/// A single question node in the talk graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// Question text, must end with '?'
    pub text: String,
    pub answers: Vec<Answer>,
    /// Default follow-up question
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question_id: Option<String>,
    /// Answer-specific overrides of the default follow-up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branching_logic: Vec<BranchLogic>,
    #[serde(default)]
    pub is_age_gate: bool,
    /// Answers to this question are tallied into survey statistics
    #[serde(default)]
    pub is_aggregatable: bool,
}

impl Question {
    /// Create a question from its answers
    pub fn new(id: impl Into<String>, text: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answers,
            next_question_id: None,
            branching_logic: Vec::new(),
            is_age_gate: false,
            is_aggregatable: false,
        }
    }

    /// Set the default follow-up question edge
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next_question_id = Some(next.into());
        self
    }

    /// Add an answer-keyed branch edge
    pub fn with_branch(mut self, answer_id: impl Into<String>, next: impl Into<String>) -> Self {
        self.branching_logic.push(BranchLogic {
            answer_id: answer_id.into(),
            next_question_id: next.into(),
        });
        self
    }

    /// Mark as aggregatable for survey tallies
    pub fn aggregatable(mut self) -> Self {
        self.is_aggregatable = true;
        self
    }

    /// Find an answer by id
    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}
