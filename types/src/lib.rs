//! Core domain types for pairdeck.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod candidate;
mod decision;
mod filter;
mod history;
pub mod ui;

pub use candidate::{CandidateId, Classification, Confidence, Endpoint, EndpointSide, MatchCandidate};
pub use decision::{Action, Decision, RejectReason, Verdict};
pub use filter::{ConfidenceFilter, HIGH_CONFIDENCE_THRESHOLD, ParseFilterError, SourceFilter};
pub use history::{Counters, HistoryEntry};
