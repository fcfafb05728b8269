//! Survey aggregation: tally responses into per-question statistics

use crate::types::{AnswerStat, QuestionStats, SurveyResponse, Talk, TalkError, TalkKind};

/// Pure tally of survey responses over a talk's aggregatable questions
#[derive(Debug, Default)]
pub struct SurveyAggregator;

impl SurveyAggregator {
    /// Aggregate responses. Only aggregatable questions are tallied;
    /// selections naming answers the question does not contain are skipped.
    /// Percentages are per-question shares rounded to one decimal.
    pub fn aggregate(talk: &Talk, responses: &[SurveyResponse]) -> Result<Vec<QuestionStats>, TalkError> {
        if talk.kind != TalkKind::Survey {
            return Err(TalkError::NotASurvey {
                talk_id: talk.id.clone(),
            });
        }

        let mut stats = Vec::new();

        for question in talk.questions.iter().filter(|q| q.is_aggregatable) {
            let mut counts: Vec<(&str, u64)> =
                question.answers.iter().map(|a| (a.id.as_str(), 0)).collect();
            let mut total = 0u64;

            for response in responses {
                for selection in response.answers.iter().filter(|s| s.question_id == question.id) {
                    if let Some(entry) = counts.iter_mut().find(|(id, _)| *id == selection.answer_id) {
                        entry.1 += 1;
                        total += 1;
                    }
                }
            }

            let answer_stats = counts
                .into_iter()
                .map(|(answer_id, count)| AnswerStat {
                    answer_id: answer_id.to_string(),
                    count,
                    percentage: share_percent(count, total),
                })
                .collect();

            stats.push(QuestionStats {
                question_id: question.id.clone(),
                answer_stats,
                total_responses: total,
            });
        }

        Ok(stats)
    }
}

/// count/total as a percentage with one decimal
fn share_percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

// =============================================================================
// TESTS
// =============================================================================
