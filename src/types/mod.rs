//! Core types for Talkflow

mod error;
mod question;
mod survey;
mod talk;

pub use error::{CaptureError, StoreError, StructureError, TalkError};
pub use question::{Answer, BranchLogic, Question};
pub use survey::{AnswerSelection, AnswerStat, QuestionStats, SurveyResponse};
pub use talk::{Tag, TagCategory, Talk, TalkKind};
