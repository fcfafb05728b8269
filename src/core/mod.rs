//! Core engine: graph model, rule checking, linear capture, survey tallies

mod api;
mod capture;
mod graph;
mod rules;
mod store;
mod survey;

pub use api::{create_router, run_server, AppState};
pub use capture::{LinearCapture, ParsedLine};
pub use graph::{StepOutcome, TalkGraph};
pub use rules::RuleChecker;
pub use store::{talk_key, MemoryStore, TalkStore};
pub use survey::SurveyAggregator;
