//! Talkflow: structural engine for conversational Talk graphs
//!
//! Pipeline: transcript lines → LinearCapture → RuleChecker → storage boundary

pub mod core;
pub mod types;

// =============================================================================
// STRUCTURAL LIMITS
// =============================================================================

/// Maximum questions in any talk
pub const MAX_QUESTIONS_PER_TALK: usize = 20;

/// Maximum questions in a survey talk (stricter than matching talks)
pub const MAX_QUESTIONS_PER_SURVEY: usize = 15;

/// Maximum answers per question
pub const MAX_ANSWERS_PER_QUESTION: usize = 10;

// =============================================================================
// CAPTURE DEFAULTS
// =============================================================================

/// Text of the mandatory decline option appended to every captured question
pub const IGNORE_ANSWER_TEXT: &str = "Ignore.";

/// Text of the match option appended to the final captured question
pub const MATCH_ANSWER_TEXT: &str = "Let's talk in person.";

/// Title given to talks produced by linear capture
pub const CAPTURE_TITLE: &str = "Auto-captured Talk";

/// Language tag for captured talks
pub const CAPTURE_LANGUAGE: &str = "en";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
