use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use devpool::workflows::allocation::{
    AllocationService, BrowserSettings, BudgetRange, BulkProposalRequest, CandidateSource,
    CsvCandidateSource,
    DeveloperId, EngagementType, ExperienceLevel, JobRequirement, MatchProposal, MatchScorer,
    MatchTier, PoolBrowser, PoolFilters, PoolQuery, ProposalError, ProposeMatch, RequirementId,
    RequirementPriority, RequirementStatus, WorkSchedule,
};

const ROSTER: &str = "\
id,name,role,skills,rating,completed_projects,hourly_rate,monthly_rate,location,years_of_experience,bio
dev-101,Ana Costa,Frontend Engineer,React; TypeScript; Next.js,4.8,31,80,14080,\"Lisbon, Portugal\",7,Design systems
dev-102,Ben Ode,Frontend Engineer,Vue.js,3.9,8,150,26400,\"Lagos, Nigeria\",2,
dev-103,Cleo Park,Full Stack Engineer,react;Node.js,4.5,19,60,10560,\"Seoul, Korea\",6,Realtime dashboards
dev-104,Dan Reyes,Backend Engineer,Rust;Go,4.0,40,120,21120,\"Porto, Portugal\",12,
dev-105,Eli Novak,Frontend Engineer,TypeScript,4.2,12,90,15840,Remote,4,
";

fn frontend_requirement() -> JobRequirement {
    JobRequirement {
        id: RequirementId("req-2025-frontend".to_string()),
        title: "Senior Frontend Engineer".to_string(),
        tech_stack: vec!["React".to_string(), "TypeScript".to_string()],
        experience_level: ExperienceLevel::Senior,
        developers_needed: 2,
        engagement_type: EngagementType::Contract,
        timezone_preference: "UTC+0 to UTC+3".to_string(),
        budget: Some(BudgetRange {
            min: 70.0,
            max: 95.0,
        }),
        description: "Own the customer dashboard rewrite.".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid start date"),
        priority: RequirementPriority::High,
        status: RequirementStatus::Open,
    }
}

fn roster() -> CsvCandidateSource {
    CsvCandidateSource::from_reader(ROSTER.as_bytes()).expect("roster parses")
}

fn id(value: &str) -> DeveloperId {
    DeveloperId::from(value)
}

#[derive(Default)]
struct MatchLog {
    proposals: Mutex<Vec<MatchProposal>>,
}

impl MatchLog {
    fn proposals(&self) -> Vec<MatchProposal> {
        self.proposals.lock().expect("match log poisoned").clone()
    }
}

#[async_trait]
impl ProposeMatch for MatchLog {
    async fn propose(
        &self,
        _requirement_id: &RequirementId,
        proposal: &MatchProposal,
    ) -> Result<(), ProposalError> {
        self.proposals
            .lock()
            .expect("match log poisoned")
            .push(proposal.clone());
        Ok(())
    }
}

#[test]
fn csv_roster_scores_the_worked_example() {
    let requirement = frontend_requirement();
    let scorer = MatchScorer::default();
    let source = roster();
    assert_eq!(source.len(), 5);

    let developers = source.candidates().expect("roster candidates");
    let ana = developers
        .iter()
        .find(|developer| developer.id == id("dev-101"))
        .expect("ana present");
    let ben = developers
        .iter()
        .find(|developer| developer.id == id("dev-102"))
        .expect("ben present");

    let strong = scorer.score(ana, &requirement);
    assert_eq!(strong.score, 100);
    assert_eq!(strong.tier(), MatchTier::Strong);
    assert_eq!(strong.matching_skills, vec!["React", "TypeScript"]);

    let weak = scorer.score(ben, &requirement);
    assert_eq!(weak.score, 20);
    assert!(weak.matching_skills.is_empty());
}

#[test]
fn browser_ranks_filters_and_excludes_matched_developers() {
    let developers =
        roster().candidates().expect("roster");
    let excluded: HashSet<DeveloperId> = [id("dev-104")].into_iter().collect();
    let mut browser = PoolBrowser::new(
        frontend_requirement(),
        excluded,
        developers,
        BrowserSettings::default(),
    );

    let ranked: Vec<_> = browser
        .visible()
        .iter()
        .map(|candidate| candidate.id().clone())
        .collect();
    assert_eq!(ranked.first(), Some(&id("dev-101")));
    assert!(!ranked.contains(&id("dev-104")));
    assert_eq!(browser.summary().open_slots, 1);

    let scores: Vec<u8> = browser.visible().iter().map(|c| c.score).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

    browser.toggle_skill_filter("REACT");
    browser.set_location(Some("korea".to_string()));
    let filtered: Vec<_> = browser
        .visible()
        .iter()
        .map(|candidate| candidate.id().clone())
        .collect();
    assert_eq!(filtered, vec![id("dev-103")]);

    browser.clear_filters();
    browser.commit_search("engineer");
    assert_eq!(browser.total_filtered(), 4);
}

#[tokio::test]
async fn service_proposes_selection_with_derived_monthly_rates() {
    let log = Arc::new(MatchLog::default());
    let service = AllocationService::new(
        Arc::new(roster()),
        Arc::clone(&log),
        BrowserSettings::default(),
        WorkSchedule::default(),
    );

    let page = service
        .browse(PoolQuery {
            requirement: frontend_requirement(),
            exclude_dev_ids: Vec::new(),
            filters: PoolFilters::default(),
            search: String::new(),
            pages: 1,
        })
        .expect("pool page");
    assert_eq!(page.summary.total, 5);
    assert!(!page.has_more);

    let report = service
        .propose(BulkProposalRequest {
            requirement: frontend_requirement(),
            exclude_dev_ids: Vec::new(),
            developer_ids: vec![id("dev-103"), id("dev-101")],
            rate_overrides: [(id("dev-103"), 65.0)].into_iter().collect(),
            schedule: Some(WorkSchedule {
                working_days_per_month: 20,
                hours_per_day: 8,
                currency: "EUR".to_string(),
            }),
        })
        .await
        .expect("bulk proposal runs");

    assert!(report.all_succeeded());
    let proposals = log.proposals();
    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[0].developer_id, id("dev-101"));
    assert_eq!(proposals[0].monthly_rate, 12800.0);
    assert_eq!(proposals[1].developer_id, id("dev-103"));
    assert_eq!(proposals[1].hourly_rate, 65.0);
    assert_eq!(proposals[1].monthly_rate, 10400.0);
    assert!(proposals.iter().all(|p| p.currency == "EUR"));
}
