//! Developer-to-requirement matching for the developer pool allocation screen.
//!
//! Candidates are scored once per pool snapshot, then searched, filtered,
//! ranked, and paged in memory by a session-scoped [`PoolBrowser`]. Selected
//! developers are proposed to the external match service one at a time.

pub mod domain;
mod error;
pub mod filter;
pub mod pool;
pub mod proposal;
pub mod router;
pub mod scoring;
pub mod search;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use domain::{
    BudgetRange, DeveloperId, DeveloperSummary, EngagementType, ExperienceLevel, JobRequirement,
    RequirementId, RequirementPriority, RequirementStatus, ScheduleError, WorkSchedule,
};
pub use error::AllocationError;
pub use filter::{matches_search, NumericRange, PoolFilters};
pub use pool::{BrowserSettings, PoolBrowser, PoolSummary, ScoredCandidate};
pub use proposal::{
    BulkProposalReport, BulkRateEditor, MatchProposal, ProposalError, ProposalOutcome,
    ProposalQueue, ProposalResult, ProposeMatch, RateEditError, RateEntry,
};
pub use router::allocation_router;
pub use scoring::{MatchScore, MatchScorer, MatchTier, ScoreComponent, ScoreFactor, ScoringWeights};
pub use search::SearchDebouncer;
pub use service::{AllocationService, BulkProposalRequest, PoolPage, PoolQuery};
pub use source::{CandidateSource, CsvCandidateSource, SourceError, StaticCandidateSource};
