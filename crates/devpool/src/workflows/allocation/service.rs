use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{DeveloperId, DeveloperSummary, JobRequirement, WorkSchedule};
use super::error::AllocationError;
use super::filter::PoolFilters;
use super::pool::{BrowserSettings, PoolBrowser, PoolSummary, ScoredCandidate};
use super::proposal::{BulkProposalReport, ProposeMatch};
use super::scoring::{MatchScore, MatchScorer};
use super::source::CandidateSource;

/// One-shot view of a pool session: filters and search applied, `pages`
/// pages loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolQuery {
    pub requirement: JobRequirement,
    #[serde(default)]
    pub exclude_dev_ids: Vec<DeveloperId>,
    #[serde(default)]
    pub filters: PoolFilters,
    #[serde(default)]
    pub search: String,
    #[serde(default = "first_page")]
    pub pages: usize,
}

fn first_page() -> usize {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolPage {
    pub summary: PoolSummary,
    pub has_more: bool,
    pub candidates: Vec<ScoredCandidate>,
    pub available_skills: Vec<String>,
}

/// Bulk proposal of a selection, with optional per-developer hourly overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkProposalRequest {
    pub requirement: JobRequirement,
    #[serde(default)]
    pub exclude_dev_ids: Vec<DeveloperId>,
    pub developer_ids: Vec<DeveloperId>,
    #[serde(default)]
    pub rate_overrides: BTreeMap<DeveloperId, f64>,
    #[serde(default)]
    pub schedule: Option<WorkSchedule>,
}

/// Service composing the candidate source, scorer, and proposal hook.
pub struct AllocationService<S, P> {
    source: Arc<S>,
    proposer: Arc<P>,
    scorer: MatchScorer,
    settings: BrowserSettings,
    schedule: WorkSchedule,
}

impl<S, P> AllocationService<S, P>
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    pub fn new(
        source: Arc<S>,
        proposer: Arc<P>,
        settings: BrowserSettings,
        schedule: WorkSchedule,
    ) -> Self {
        Self {
            source,
            proposer,
            scorer: MatchScorer::default(),
            settings,
            schedule,
        }
    }

    pub fn with_scorer(mut self, scorer: MatchScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn default_schedule(&self) -> &WorkSchedule {
        &self.schedule
    }

    pub fn score(&self, developer: &DeveloperSummary, requirement: &JobRequirement) -> MatchScore {
        self.scorer.score(developer, requirement)
    }

    /// Starts a fresh browsing session over the current candidate pool.
    pub fn open_pool(
        &self,
        requirement: JobRequirement,
        excluded: HashSet<DeveloperId>,
    ) -> Result<PoolBrowser, AllocationError> {
        let candidates = self.source.candidates()?;
        info!(
            requirement = %requirement.id,
            candidates = candidates.len(),
            excluded = excluded.len(),
            "opening developer pool"
        );

        Ok(PoolBrowser::with_scorer(
            self.scorer.clone(),
            requirement,
            excluded,
            candidates,
            self.settings,
        ))
    }

    pub fn browse(&self, query: PoolQuery) -> Result<PoolPage, AllocationError> {
        let PoolQuery {
            requirement,
            exclude_dev_ids,
            filters,
            search,
            pages,
        } = query;

        let mut browser = self.open_pool(requirement, exclude_dev_ids.into_iter().collect())?;
        browser.set_filters(filters);
        browser.commit_search(search);
        for _ in 1..pages.max(1) {
            if !browser.load_more() {
                break;
            }
        }

        Ok(PoolPage {
            summary: browser.summary(),
            has_more: browser.has_more(),
            candidates: browser.visible().into_iter().cloned().collect(),
            available_skills: browser.available_skills(),
        })
    }

    /// Selects the requested developers and proposes them in pool order.
    pub async fn propose(
        &self,
        request: BulkProposalRequest,
    ) -> Result<BulkProposalReport, AllocationError> {
        let BulkProposalRequest {
            requirement,
            exclude_dev_ids,
            developer_ids,
            rate_overrides,
            schedule,
        } = request;

        let mut browser = self.open_pool(requirement, exclude_dev_ids.into_iter().collect())?;
        for developer_id in &developer_ids {
            if !browser.is_selected(developer_id) {
                browser.toggle_selection(developer_id)?;
            }
        }

        let schedule = schedule.unwrap_or_else(|| self.schedule.clone());
        let mut editor = browser.open_rate_editor(schedule)?;
        for (developer_id, rate) in &rate_overrides {
            editor.set_rate(developer_id, *rate)?;
        }

        let report = browser
            .confirm_bulk_proposal(editor, self.proposer.as_ref())
            .await?;

        info!(
            requirement = %report.requirement_id,
            proposed = report.succeeded(),
            failed = report.failed(),
            "bulk proposal finished"
        );

        Ok(report)
    }
}
