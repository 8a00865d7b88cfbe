use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::allocation::domain::{
    BudgetRange, DeveloperId, DeveloperSummary, EngagementType, ExperienceLevel, JobRequirement,
    RequirementId, RequirementPriority, RequirementStatus, WorkSchedule,
};
use crate::workflows::allocation::pool::{BrowserSettings, PoolBrowser};
use crate::workflows::allocation::proposal::{MatchProposal, ProposalError, ProposeMatch};
use crate::workflows::allocation::source::{CandidateSource, SourceError, StaticCandidateSource};
use crate::workflows::allocation::AllocationService;

pub(super) fn requirement() -> JobRequirement {
    JobRequirement {
        id: RequirementId("req-frontend".to_string()),
        title: "Senior Frontend Engineer".to_string(),
        tech_stack: vec!["React".to_string(), "TypeScript".to_string()],
        experience_level: ExperienceLevel::Senior,
        developers_needed: 2,
        engagement_type: EngagementType::Contract,
        timezone_preference: "UTC+0 to UTC+2".to_string(),
        budget: Some(BudgetRange {
            min: 70.0,
            max: 95.0,
        }),
        description: "Design system work".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date"),
        priority: RequirementPriority::High,
        status: RequirementStatus::Open,
    }
}

pub(super) fn developer(id: &str, skills: &[&str], years: u32, hourly_rate: f64) -> DeveloperSummary {
    DeveloperSummary {
        id: DeveloperId::from(id),
        name: format!("Developer {id}"),
        role: "Software Engineer".to_string(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        rating: 4.0,
        completed_projects: 5,
        hourly_rate,
        monthly_rate: hourly_rate * 176.0,
        location: "Remote".to_string(),
        years_of_experience: years,
        bio: String::new(),
    }
}

/// Candidate A and B from the worked example plus a few fillers.
pub(super) fn candidates() -> Vec<DeveloperSummary> {
    let mut ana = developer("dev-a", &["React", "TypeScript", "Next.js"], 7, 80.0);
    ana.name = "Ana Costa".to_string();
    ana.role = "Frontend Engineer".to_string();
    ana.location = "Lisbon, Portugal".to_string();
    ana.rating = 4.8;

    let mut ben = developer("dev-b", &["Vue.js"], 2, 150.0);
    ben.name = "Ben Ode".to_string();
    ben.location = "Lagos, Nigeria".to_string();
    ben.rating = 3.9;

    let mut cleo = developer("dev-c", &["react"], 6, 60.0);
    cleo.name = "Cleo Park".to_string();
    cleo.location = "Seoul, Korea".to_string();
    cleo.rating = 4.5;

    let mut dan = developer("dev-d", &["Rust", "Go"], 12, 120.0);
    dan.name = "Dan Reyes".to_string();
    dan.role = "Backend Engineer".to_string();
    dan.location = "Porto, Portugal".to_string();

    vec![ben, dan, ana, cleo]
}

/// `count` interchangeable developers, ids zero-padded so they sort naturally.
pub(super) fn bulk_candidates(count: usize) -> Vec<DeveloperSummary> {
    (0..count)
        .map(|index| developer(&format!("dev-{index:03}"), &["React"], 6, 80.0))
        .collect()
}

pub(super) fn settings(page_size: usize) -> BrowserSettings {
    BrowserSettings {
        page_size,
        ..BrowserSettings::default()
    }
}

pub(super) fn browser() -> PoolBrowser {
    PoolBrowser::new(
        requirement(),
        HashSet::new(),
        candidates(),
        BrowserSettings::default(),
    )
}

pub(super) fn schedule() -> WorkSchedule {
    WorkSchedule {
        working_days_per_month: 22,
        hours_per_day: 8,
        currency: "USD".to_string(),
    }
}

pub(super) fn ids(values: &[&str]) -> Vec<DeveloperId> {
    values.iter().map(|value| DeveloperId::from(*value)).collect()
}

/// Records every proposal; developers listed in `failing` are rejected.
#[derive(Default)]
pub(super) struct RecordingProposer {
    failing: HashSet<DeveloperId>,
    calls: Mutex<Vec<(RequirementId, MatchProposal)>>,
}

impl RecordingProposer {
    pub(super) fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| DeveloperId::from(*id)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(RequirementId, MatchProposal)> {
        self.calls.lock().expect("proposal mutex poisoned").clone()
    }

    pub(super) fn proposed_ids(&self) -> Vec<DeveloperId> {
        self.calls()
            .into_iter()
            .map(|(_, proposal)| proposal.developer_id)
            .collect()
    }
}

#[async_trait]
impl ProposeMatch for RecordingProposer {
    async fn propose(
        &self,
        requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError> {
        self.calls
            .lock()
            .expect("proposal mutex poisoned")
            .push((requirement_id.clone(), proposal.clone()));
        if self.failing.contains(&proposal.developer_id) {
            return Err(ProposalError::Rejected(format!(
                "{} already engaged",
                proposal.developer_id
            )));
        }
        Ok(())
    }
}

/// Yields between steps and tracks how many proposals run at once.
#[derive(Default)]
pub(super) struct ConcurrencyProbe {
    in_flight: Mutex<usize>,
    peak: Mutex<usize>,
    order: Mutex<VecDeque<DeveloperId>>,
}

impl ConcurrencyProbe {
    pub(super) fn peak(&self) -> usize {
        *self.peak.lock().expect("probe mutex poisoned")
    }

    pub(super) fn order(&self) -> Vec<DeveloperId> {
        self.order
            .lock()
            .expect("probe mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProposeMatch for ConcurrencyProbe {
    async fn propose(
        &self,
        _requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError> {
        {
            let mut in_flight = self.in_flight.lock().expect("probe mutex poisoned");
            *in_flight += 1;
            let mut peak = self.peak.lock().expect("probe mutex poisoned");
            *peak = (*peak).max(*in_flight);
        }
        tokio::task::yield_now().await;
        self.order
            .lock()
            .expect("probe mutex poisoned")
            .push_back(proposal.developer_id.clone());
        *self.in_flight.lock().expect("probe mutex poisoned") -= 1;
        Ok(())
    }
}

pub(super) struct UnavailableSource;

impl CandidateSource for UnavailableSource {
    fn candidates(&self) -> Result<Vec<DeveloperSummary>, SourceError> {
        Err(SourceError::Unavailable("roster service offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AllocationService<StaticCandidateSource, RecordingProposer>,
    Arc<RecordingProposer>,
) {
    build_service_with(RecordingProposer::default())
}

pub(super) fn build_service_with(
    proposer: RecordingProposer,
) -> (
    AllocationService<StaticCandidateSource, RecordingProposer>,
    Arc<RecordingProposer>,
) {
    let proposer = Arc::new(proposer);
    let service = AllocationService::new(
        Arc::new(StaticCandidateSource::new(candidates())),
        proposer.clone(),
        BrowserSettings::default(),
        schedule(),
    );
    (service, proposer)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
