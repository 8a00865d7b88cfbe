use async_trait::async_trait;
use chrono::NaiveDate;
use devpool::workflows::allocation::{
    BudgetRange, DeveloperId, DeveloperSummary, EngagementType, ExperienceLevel, JobRequirement,
    MatchProposal, ProposalError, ProposeMatch, RequirementId, RequirementPriority,
    RequirementStatus,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the external match service: accepts every proposal and keeps
/// a log of what was sent.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchLog {
    proposals: Arc<Mutex<Vec<(RequirementId, MatchProposal)>>>,
}

#[async_trait]
impl ProposeMatch for InMemoryMatchLog {
    async fn propose(
        &self,
        requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError> {
        let mut guard = self
            .proposals
            .lock()
            .map_err(|_| ProposalError::Unavailable("match log lock poisoned".to_string()))?;
        debug!(requirement = %requirement_id, developer = %proposal.developer_id, "recorded match");
        guard.push((requirement_id.clone(), proposal.clone()));
        Ok(())
    }
}

impl InMemoryMatchLog {
    pub(crate) fn proposals(&self) -> Vec<(RequirementId, MatchProposal)> {
        self.proposals
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[allow(clippy::too_many_arguments)]
fn developer(
    id: &str,
    name: &str,
    role: &str,
    skills: &[&str],
    years_of_experience: u32,
    hourly_rate: f64,
    location: &str,
    rating: f32,
) -> DeveloperSummary {
    DeveloperSummary {
        id: DeveloperId::from(id),
        name: name.to_string(),
        role: role.to_string(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        rating,
        completed_projects: years_of_experience * 3,
        hourly_rate,
        monthly_rate: (hourly_rate * 176.0).round(),
        location: location.to_string(),
        years_of_experience,
        bio: String::new(),
    }
}

/// Built-in roster served when no CSV export is supplied.
pub(crate) fn sample_roster() -> Vec<DeveloperSummary> {
    vec![
        developer(
            "dev-001",
            "Ana Costa",
            "Frontend Engineer",
            &["React", "TypeScript", "Next.js"],
            7,
            80.0,
            "Lisbon, Portugal",
            4.8,
        ),
        developer(
            "dev-002",
            "Ben Ode",
            "Frontend Engineer",
            &["Vue.js", "JavaScript"],
            2,
            150.0,
            "Lagos, Nigeria",
            3.9,
        ),
        developer(
            "dev-003",
            "Cleo Park",
            "Full Stack Engineer",
            &["react", "Node.js", "PostgreSQL"],
            6,
            60.0,
            "Seoul, Korea",
            4.5,
        ),
        developer(
            "dev-004",
            "Dan Reyes",
            "Backend Engineer",
            &["Rust", "Go", "Kubernetes"],
            12,
            120.0,
            "Porto, Portugal",
            4.0,
        ),
        developer(
            "dev-005",
            "Eli Novak",
            "Frontend Engineer",
            &["TypeScript", "Svelte"],
            4,
            90.0,
            "Remote",
            4.2,
        ),
        developer(
            "dev-006",
            "Fatima Zahra",
            "Mobile Engineer",
            &["React Native", "TypeScript", "React"],
            9,
            95.0,
            "Casablanca, Morocco",
            4.7,
        ),
    ]
}

/// Requirement used by the demo and as the default for `pool rank`.
pub(crate) fn sample_requirement(start_date: NaiveDate) -> JobRequirement {
    JobRequirement {
        id: RequirementId("req-frontend-rewrite".to_string()),
        title: "Senior Frontend Engineer".to_string(),
        tech_stack: vec!["React".to_string(), "TypeScript".to_string()],
        experience_level: ExperienceLevel::Senior,
        developers_needed: 2,
        engagement_type: EngagementType::Contract,
        timezone_preference: "UTC-1 to UTC+3".to_string(),
        budget: Some(BudgetRange {
            min: 70.0,
            max: 95.0,
        }),
        description: "Rebuild the customer dashboard on the shared design system.".to_string(),
        start_date,
        priority: RequirementPriority::High,
        status: RequirementStatus::Open,
    }
}

pub(crate) fn parse_level(raw: &str) -> Result<ExperienceLevel, String> {
    match ExperienceLevel::parse(raw) {
        ExperienceLevel::Unknown => Err(format!(
            "unknown experience level '{raw}' (expected junior, mid, senior, lead or principal)"
        )),
        level => Ok(level),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
