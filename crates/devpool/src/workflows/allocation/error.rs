use super::domain::{DeveloperId, RequirementId, ScheduleError};
use super::proposal::RateEditError;
use super::source::SourceError;

/// Errors raised while browsing the pool or preparing a bulk proposal.
///
/// Individual proposal failures are not errors here; they are reported per
/// developer in `BulkProposalReport`.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    RateEdit(#[from] RateEditError),
    #[error("no developers selected for proposal")]
    EmptySelection,
    #[error("developer {0} is not in the pool for this requirement")]
    UnknownDeveloper(DeveloperId),
    #[error("rate editor belongs to requirement {found}, pool is browsing {expected}")]
    RequirementMismatch {
        expected: RequirementId,
        found: RequirementId,
    },
}
