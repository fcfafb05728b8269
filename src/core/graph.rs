//! Talk graph model: derived edges, id lookup, acyclicity, step resolution
//!
//! Edges are never stored. For each question the outgoing edges are the
//! union of its own `next_question_id`, every branch-logic target, and every
//! answer's `next_question_id`, in that order, de-duplicated.

use std::collections::{HashMap, HashSet};

use crate::types::{Question, StructureError, Talk};

/// DFS coloring; a question absent from the map is unvisited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Visiting,
    Done,
}

/// Outcome of resolving one conversational step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Continue with this question
    Next(String),
    /// Pairing succeeded, conversation ends
    Matched,
    /// Responder declined, conversation ends
    Ignored,
    /// No further edge, conversation ran to its natural end
    Completed,
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepOutcome::Next(_) => "NEXT",
            StepOutcome::Matched => "MATCHED",
            StepOutcome::Ignored => "IGNORED",
            StepOutcome::Completed => "COMPLETED",
        };
        write!(f, "{}", name)
    }
}

/// Pure view over a talk's question/answer graph
#[derive(Debug)]
pub struct TalkGraph<'a> {
    talk: &'a Talk,
    by_id: HashMap<&'a str, &'a Question>,
}

impl<'a> TalkGraph<'a> {
    /// Build the id lookup once. On duplicate ids the first declaration
    /// wins; the rule layer rejects duplicates before this runs.
    pub fn new(talk: &'a Talk) -> Self {
        let mut by_id = HashMap::with_capacity(talk.questions.len());
        for question in &talk.questions {
            by_id.entry(question.id.as_str()).or_insert(question);
        }
        Self { talk, by_id }
    }

    /// Look up a question by id
    pub fn question(&self, question_id: &str) -> Option<&'a Question> {
        self.by_id.get(question_id).copied()
    }

    /// Ordered distinct successor ids of a question
    pub fn successors(question: &Question) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(next) = &question.next_question_id {
            out.push(next.as_str());
        }
        for branch in &question.branching_logic {
            out.push(branch.next_question_id.as_str());
        }
        for answer in &question.answers {
            if let Some(next) = &answer.next_question_id {
                out.push(next.as_str());
            }
        }
        let mut seen = HashSet::new();
        out.retain(|id| seen.insert(*id));
        out
    }

    /// Three-color DFS over the derived edge relation, questions visited as
    /// roots in declared order. A successor colored Visiting is a back edge;
    /// the reported id is the node whose edge closes the loop. An edge to an
    /// id absent from the talk is fatal.
    pub fn check_acyclic(&self) -> Result<(), StructureError> {
        let mut colors: HashMap<&str, Color> = HashMap::new();
        for question in &self.talk.questions {
            if !colors.contains_key(question.id.as_str()) {
                self.visit(question, &mut colors)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        question: &'a Question,
        colors: &mut HashMap<&'a str, Color>,
    ) -> Result<(), StructureError> {
        colors.insert(&question.id, Color::Visiting);

        for next_id in Self::successors(question) {
            let next = self
                .question(next_id)
                .ok_or_else(|| StructureError::DanglingReference {
                    talk_id: self.talk.id.clone(),
                    question_id: question.id.clone(),
                    target_id: next_id.to_string(),
                })?;

            match colors.get(next_id) {
                Some(Color::Visiting) => {
                    return Err(StructureError::CycleDetected {
                        talk_id: self.talk.id.clone(),
                        question_id: question.id.clone(),
                    });
                }
                Some(Color::Done) => {}
                None => self.visit(next, colors)?,
            }
        }

        colors.insert(&question.id, Color::Done);
        Ok(())
    }

    /// Resolve one conversational step on a validated talk.
    ///
    /// Edge priority: branch logic for the picked answer, then the answer's
    /// own edge, then the question's default edge.
    pub fn next_step(
        &self,
        question_id: &str,
        answer_id: &str,
    ) -> Result<StepOutcome, StructureError> {
        let question =
            self.question(question_id)
                .ok_or_else(|| StructureError::UnknownQuestion {
                    talk_id: self.talk.id.clone(),
                    question_id: question_id.to_string(),
                })?;

        let answer = question
            .answer(answer_id)
            .ok_or_else(|| StructureError::UnknownAnswer {
                question_id: question_id.to_string(),
                answer_id: answer_id.to_string(),
            })?;

        if answer.is_match {
            return Ok(StepOutcome::Matched);
        }
        if answer.is_ignore {
            return Ok(StepOutcome::Ignored);
        }

        let target = question
            .branching_logic
            .iter()
            .find(|b| b.answer_id == answer_id)
            .map(|b| b.next_question_id.as_str())
            .or(answer.next_question_id.as_deref())
            .or(question.next_question_id.as_deref());

        match target {
            Some(next_id) => {
                if self.question(next_id).is_none() {
                    return Err(StructureError::DanglingReference {
                        talk_id: self.talk.id.clone(),
                        question_id: question.id.clone(),
                        target_id: next_id.to_string(),
                    });
                }
                Ok(StepOutcome::Next(next_id.to_string()))
            }
            None => Ok(StepOutcome::Completed),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Answer, Question, TalkKind};
    use chrono::Utc;

    fn talk_with(questions: Vec<Question>) -> Talk {
        Talk {
            id: "t1".into(),
            title: "Test".into(),
            author_id: "user-1".into(),
            kind: TalkKind::Matching,
            is_adult: false,
            language: "en".into(),
            tags: vec![],
            questions,
            created_at: Utc::now(),
            is_template: false,
            usage_count: 0,
        }
    }

    fn q(id: &str) -> Question {
        Question::new(
            id,
            "Anything?",
            vec![Answer::new(format!("{}_a", id), "Fine."), Answer::new(format!("{}_i", id), "Ignore.").ignore()],
        )
    }

    #[test]
    fn test_successors_union_order_and_dedup() {
        let question = Question::new(
            "q1",
            "Pick one?",
            vec![
                Answer::new("a1", "One.").with_next("q3"),
                Answer::new("a2", "Two.").with_next("q2"),
            ],
        )
        .with_next("q2")
        .with_branch("a1", "q4");

        let ids = TalkGraph::successors(&question);
        assert_eq!(ids, vec!["q2", "q4", "q3"]);
    }

    #[test]
    fn test_acyclic_linear_chain() {
        let talk = talk_with(vec![q("q1").with_next("q2"), q("q2")]);
        assert!(TalkGraph::new(&talk).check_acyclic().is_ok());
    }

    #[test]
    fn test_two_node_cycle_detected() {
        let mut q1 = q("q1");
        q1.answers[0].next_question_id = Some("q2".into());
        let mut q2 = q("q2");
        q2.answers[0].next_question_id = Some("q1".into());

        let talk = talk_with(vec![q1, q2]);
        let err = TalkGraph::new(&talk).check_acyclic().unwrap_err();
        match err {
            StructureError::CycleDetected { talk_id, question_id } => {
                assert_eq!(talk_id, "t1");
                // reported id is a member of the cycle
                assert!(question_id == "q1" || question_id == "q2");
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_loop_detected() {
        let talk = talk_with(vec![q("q1").with_next("q1")]);
        let err = TalkGraph::new(&talk).check_acyclic().unwrap_err();
        assert!(matches!(err, StructureError::CycleDetected { question_id, .. } if question_id == "q1"));
    }

    #[test]
    fn test_cycle_reported_at_closing_edge() {
        // q1 -> q2 -> q3 -> q2: the edge out of q3 closes the loop
        let talk = talk_with(vec![
            q("q1").with_next("q2"),
            q("q2").with_next("q3"),
            q("q3").with_next("q2"),
        ]);
        let err = TalkGraph::new(&talk).check_acyclic().unwrap_err();
        assert!(matches!(err, StructureError::CycleDetected { question_id, .. } if question_id == "q3"));
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let talk = talk_with(vec![q("q1").with_next("q999")]);
        let err = TalkGraph::new(&talk).check_acyclic().unwrap_err();
        match err {
            StructureError::DanglingReference { question_id, target_id, .. } => {
                assert_eq!(question_id, "q1");
                assert_eq!(target_id, "q999");
            }
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_branch_logic_is_fatal() {
        let talk = talk_with(vec![q("q1").with_branch("q1_a", "missing")]);
        assert!(matches!(
            TalkGraph::new(&talk).check_acyclic(),
            Err(StructureError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_diamond_is_acyclic() {
        // q1 branches to q2 and q3, both rejoin at q4
        let mut q1 = q("q1");
        q1.answers[0].next_question_id = Some("q2".into());
        let q1 = q1.with_branch("q1_a", "q3");
        let talk = talk_with(vec![q1, q("q2").with_next("q4"), q("q3").with_next("q4"), q("q4")]);
        assert!(TalkGraph::new(&talk).check_acyclic().is_ok());
    }

    #[test]
    fn test_next_step_branch_logic_wins() {
        let question = Question::new(
            "q1",
            "Pick one?",
            vec![
                Answer::new("a1", "One.").with_next("q2"),
                Answer::new("i1", "Ignore.").ignore(),
            ],
        )
        .with_next("q4")
        .with_branch("a1", "q3");
        let talk = talk_with(vec![question, q("q2"), q("q3"), q("q4")]);

        let graph = TalkGraph::new(&talk);
        assert_eq!(graph.next_step("q1", "a1").unwrap(), StepOutcome::Next("q3".into()));
    }

    #[test]
    fn test_next_step_answer_edge_beats_question_default() {
        let question = Question::new(
            "q1",
            "Pick one?",
            vec![
                Answer::new("a1", "One.").with_next("q2"),
                Answer::new("i1", "Ignore.").ignore(),
            ],
        )
        .with_next("q3");
        let talk = talk_with(vec![question, q("q2"), q("q3")]);

        let graph = TalkGraph::new(&talk);
        assert_eq!(graph.next_step("q1", "a1").unwrap(), StepOutcome::Next("q2".into()));
    }

    #[test]
    fn test_next_step_outcomes() {
        let question = Question::new(
            "q1",
            "Done?",
            vec![
                Answer::new("a1", "Yes.").terminal(),
                Answer::new("i1", "Ignore.").ignore(),
                Answer::new("m1", "Let's talk in person.").matching(),
            ],
        );
        let talk = talk_with(vec![question]);
        let graph = TalkGraph::new(&talk);

        assert_eq!(graph.next_step("q1", "a1").unwrap(), StepOutcome::Completed);
        assert_eq!(graph.next_step("q1", "i1").unwrap(), StepOutcome::Ignored);
        assert_eq!(graph.next_step("q1", "m1").unwrap(), StepOutcome::Matched);
    }

    #[test]
    fn test_next_step_unknown_ids() {
        let talk = talk_with(vec![q("q1")]);
        let graph = TalkGraph::new(&talk);

        assert!(matches!(
            graph.next_step("q9", "a1"),
            Err(StructureError::UnknownQuestion { .. })
        ));
        assert!(matches!(
            graph.next_step("q1", "a9"),
            Err(StructureError::UnknownAnswer { .. })
        ));
    }
}
