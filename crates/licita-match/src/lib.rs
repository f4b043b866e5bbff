//! Subscription matching: evaluates canonical tenders against the active
//! search criteria, records match pairings, and decides who gets notified.

pub mod engine;
pub mod notify;
pub mod predicates;

pub use engine::{EvaluationSummary, MatchEngine, MatchPolicy};
pub use notify::{DispatchError, LoggingDispatcher, NotificationDispatcher, TenderNotice};
pub use predicates::matches_parameters;

pub const CRATE_NAME: &str = "licita-match";
