use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{DeveloperId, DeveloperSummary, RequirementId, ScheduleError, WorkSchedule};

/// Proposal payload sent to the external match service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProposal {
    pub developer_id: DeveloperId,
    pub hourly_rate: f64,
    pub monthly_rate: f64,
    pub currency: String,
}

/// Outbound hook that records a proposal against a requirement.
#[async_trait]
pub trait ProposeMatch: Send + Sync {
    async fn propose(
        &self,
        requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError>;
}

#[async_trait]
impl<T> ProposeMatch for Arc<T>
where
    T: ProposeMatch + ?Sized,
{
    async fn propose(
        &self,
        requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError> {
        (**self).propose(requirement_id, proposal).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalError {
    #[error("proposal rejected: {0}")]
    Rejected(String),
    #[error("match service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateEditError {
    #[error("developer {0} is not part of this bulk proposal")]
    UnknownDeveloper(DeveloperId),
    #[error("hourly rate {rate} for developer {developer_id} must be a non-negative number")]
    InvalidRate { developer_id: DeveloperId, rate: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEntry {
    pub developer_id: DeveloperId,
    pub name: String,
    pub base_hourly_rate: f64,
    pub hourly_rate: f64,
}

/// Per-developer hourly overrides under one shared work schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRateEditor {
    requirement_id: RequirementId,
    schedule: WorkSchedule,
    entries: Vec<RateEntry>,
}

impl BulkRateEditor {
    /// Seeds one entry per developer, in the order given, at their base rate.
    pub fn new<'a, I>(requirement_id: RequirementId, schedule: WorkSchedule, developers: I) -> Self
    where
        I: IntoIterator<Item = &'a DeveloperSummary>,
    {
        let entries = developers
            .into_iter()
            .map(|developer| RateEntry {
                developer_id: developer.id.clone(),
                name: developer.name.clone(),
                base_hourly_rate: developer.hourly_rate,
                hourly_rate: developer.hourly_rate,
            })
            .collect();

        Self {
            requirement_id,
            schedule,
            entries,
        }
    }

    pub fn requirement_id(&self) -> &RequirementId {
        &self.requirement_id
    }

    pub fn schedule(&self) -> &WorkSchedule {
        &self.schedule
    }

    pub fn set_schedule(&mut self, schedule: WorkSchedule) {
        self.schedule = schedule;
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rate_for(&self, developer_id: &DeveloperId) -> Option<f64> {
        self.entry(developer_id).map(|entry| entry.hourly_rate)
    }

    pub fn set_rate(&mut self, developer_id: &DeveloperId, rate: f64) -> Result<(), RateEditError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(RateEditError::InvalidRate {
                developer_id: developer_id.clone(),
                rate,
            });
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|entry| &entry.developer_id == developer_id)
            .ok_or_else(|| RateEditError::UnknownDeveloper(developer_id.clone()))?;
        entry.hourly_rate = rate;
        Ok(())
    }

    pub fn reset_rate(&mut self, developer_id: &DeveloperId) -> Result<(), RateEditError> {
        let base = self
            .entry(developer_id)
            .map(|entry| entry.base_hourly_rate)
            .ok_or_else(|| RateEditError::UnknownDeveloper(developer_id.clone()))?;
        self.set_rate(developer_id, base)
    }

    /// Proposals as they would be submitted with the current rates.
    pub fn preview(&self) -> Vec<MatchProposal> {
        self.entries
            .iter()
            .map(|entry| MatchProposal {
                developer_id: entry.developer_id.clone(),
                hourly_rate: entry.hourly_rate,
                monthly_rate: self.schedule.monthly_rate(entry.hourly_rate),
                currency: self.schedule.currency.clone(),
            })
            .collect()
    }

    /// Validates the schedule and freezes the proposals into a queue.
    pub fn into_queue<P>(self, proposer: &P) -> Result<ProposalQueue<'_, P>, ScheduleError>
    where
        P: ProposeMatch + ?Sized,
    {
        self.schedule.validate()?;
        let pending = self.preview().into();
        Ok(ProposalQueue {
            proposer,
            requirement_id: self.requirement_id,
            pending,
            results: Vec::new(),
        })
    }

    fn entry(&self, developer_id: &DeveloperId) -> Option<&RateEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.developer_id == developer_id)
    }
}

/// Submits proposals strictly one at a time, yielding each result as it lands.
pub struct ProposalQueue<'a, P: ?Sized> {
    proposer: &'a P,
    requirement_id: RequirementId,
    pending: VecDeque<MatchProposal>,
    results: Vec<ProposalResult>,
}

impl<'a, P> ProposalQueue<'a, P>
where
    P: ProposeMatch + ?Sized,
{
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn completed(&self) -> &[ProposalResult] {
        &self.results
    }

    /// Submits the next proposal and waits for it; `None` once drained.
    pub async fn next(&mut self) -> Option<ProposalResult> {
        let proposal = self.pending.pop_front()?;
        debug!(
            requirement = %self.requirement_id,
            developer = %proposal.developer_id,
            "submitting proposal"
        );

        let outcome = match self.proposer.propose(&self.requirement_id, &proposal).await {
            Ok(()) => {
                info!(
                    requirement = %self.requirement_id,
                    developer = %proposal.developer_id,
                    hourly_rate = proposal.hourly_rate,
                    monthly_rate = proposal.monthly_rate,
                    "developer proposed"
                );
                ProposalOutcome::Proposed
            }
            Err(err) => {
                warn!(
                    requirement = %self.requirement_id,
                    developer = %proposal.developer_id,
                    error = %err,
                    "proposal failed"
                );
                ProposalOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };

        let result = ProposalResult {
            developer_id: proposal.developer_id,
            hourly_rate: proposal.hourly_rate,
            monthly_rate: proposal.monthly_rate,
            currency: proposal.currency,
            outcome,
        };
        self.results.push(result.clone());
        Some(result)
    }

    /// Drains the queue; later proposals are attempted even after a failure.
    pub async fn run(mut self) -> BulkProposalReport {
        while self.next().await.is_some() {}
        BulkProposalReport {
            requirement_id: self.requirement_id,
            results: self.results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProposalOutcome {
    Proposed,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalResult {
    pub developer_id: DeveloperId,
    pub hourly_rate: f64,
    pub monthly_rate: f64,
    pub currency: String,
    pub outcome: ProposalOutcome,
}

impl ProposalResult {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, ProposalOutcome::Proposed)
    }
}

/// Per-developer results of one bulk proposal, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkProposalReport {
    pub requirement_id: RequirementId,
    pub results: Vec<ProposalResult>,
}

impl BulkProposalReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|result| result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failed_ids(&self) -> Vec<DeveloperId> {
        self.results
            .iter()
            .filter(|result| !result.is_ok())
            .map(|result| result.developer_id.clone())
            .collect()
    }
}
