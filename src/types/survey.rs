//! Survey response and aggregation records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One picked answer within a survey response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSelection {
    pub question_id: String,
    pub answer_id: String,
}

/// A single responder's pass through a survey talk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub responder_id: String,
    pub answers: Vec<AnswerSelection>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Tally for one answer of an aggregatable question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStat {
    pub answer_id: String,
    pub count: u64,
    /// Share of the question's responses, percent, one decimal
    pub percentage: f64,
}

/// Aggregated statistics for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub answer_stats: Vec<AnswerStat>,
    pub total_responses: u64,
}
