use crate::infra::{parse_date, parse_level, sample_requirement, sample_roster, InMemoryMatchLog};
use chrono::{Local, NaiveDate};
use clap::Args;
use devpool::config::AppConfig;
use devpool::error::AppError;
use devpool::telemetry;
use devpool::workflows::allocation::{
    AllocationService, BudgetRange, BulkProposalReport, BulkProposalRequest, CandidateSource,
    CsvCandidateSource, DeveloperId, ExperienceLevel, PoolBrowser, PoolFilters, PoolQuery,
    ProposalOutcome, ScoredCandidate, StaticCandidateSource, WorkSchedule,
};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PoolRankArgs {
    /// CSV roster export to rank
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Required technologies, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) tech_stack: Vec<String>,
    /// Requested seniority (junior, mid, senior, lead, principal)
    #[arg(long, value_parser = parse_level)]
    pub(crate) level: ExperienceLevel,
    /// Lower bound of the hourly budget
    #[arg(long, requires = "budget_max")]
    pub(crate) budget_min: Option<f64>,
    /// Upper bound of the hourly budget
    #[arg(long, requires = "budget_min")]
    pub(crate) budget_max: Option<f64>,
    /// Free-text search over name, role, and skills
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Developers already matched to the requirement, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) exclude: Vec<String>,
    /// Maximum number of rows to print (defaults to one page)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Requirement start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// How many of the top-ranked developers to propose
    #[arg(long, default_value_t = 2)]
    pub(crate) propose_top: usize,
    /// Hourly rate override applied to the last proposed developer
    #[arg(long)]
    pub(crate) negotiated_rate: Option<f64>,
}

pub(crate) fn run_pool_rank(args: PoolRankArgs) -> Result<(), AppError> {
    let PoolRankArgs {
        candidates,
        tech_stack,
        level,
        budget_min,
        budget_max,
        search,
        exclude,
        limit,
    } = args;

    let config = load_cli_config()?;
    let roster = CsvCandidateSource::from_path(&candidates)?;

    let mut requirement = sample_requirement(Local::now().date_naive());
    requirement.title = format!("{} {} engineer", level.label(), tech_stack.join("/"));
    requirement.tech_stack = tech_stack;
    requirement.experience_level = level;
    requirement.budget = budget_min
        .zip(budget_max)
        .map(|(min, max)| BudgetRange { min, max });

    let excluded: HashSet<DeveloperId> = exclude
        .iter()
        .map(|id| DeveloperId::from(id.as_str()))
        .collect();
    let mut browser = PoolBrowser::new(
        requirement,
        excluded,
        roster.candidates()?,
        config.pool.browser_settings(),
    );
    if let Some(search) = search {
        browser.commit_search(search);
    }

    let summary = browser.summary();
    println!(
        "Ranked {} of {} developers for {}",
        summary.filtered,
        summary.total,
        browser.requirement().title
    );
    let limit = limit.unwrap_or(browser.settings().page_size);
    for candidate in browser.filtered().into_iter().take(limit) {
        print_candidate(candidate);
    }
    if summary.filtered > limit {
        println!("... {} more", summary.filtered - limit);
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start_date,
        propose_top,
        negotiated_rate,
    } = args;

    let config = load_cli_config()?;
    let requirement = sample_requirement(start_date.unwrap_or_else(|| Local::now().date_naive()));
    let log = Arc::new(InMemoryMatchLog::default());
    let service = AllocationService::new(
        Arc::new(StaticCandidateSource::new(sample_roster())),
        Arc::clone(&log),
        config.pool.browser_settings(),
        config.pool.schedule.clone(),
    );

    println!("Developer pool demo");
    println!(
        "Requirement {}: {} ({} needed, {} level, stack {})",
        requirement.id,
        requirement.title,
        requirement.developers_needed,
        requirement.experience_level.label(),
        requirement.tech_stack.join(", ")
    );

    let page = service.browse(PoolQuery {
        requirement: requirement.clone(),
        exclude_dev_ids: Vec::new(),
        filters: PoolFilters::default(),
        search: String::new(),
        pages: 1,
    })?;
    println!("\nRanked pool ({} developers)", page.summary.total);
    for candidate in &page.candidates {
        print_candidate(candidate);
    }
    println!("Skills in pool: {}", page.available_skills.join(", "));

    let developer_ids: Vec<DeveloperId> = page
        .candidates
        .iter()
        .take(propose_top)
        .map(|candidate| candidate.id().clone())
        .collect();
    let mut rate_overrides = BTreeMap::new();
    if let (Some(rate), Some(last)) = (negotiated_rate, developer_ids.last()) {
        rate_overrides.insert(last.clone(), rate);
    }

    let schedule: WorkSchedule = service.default_schedule().clone();
    println!(
        "\nProposing {} developer(s) at {} days x {} hours per month",
        developer_ids.len(),
        schedule.working_days_per_month,
        schedule.hours_per_day
    );

    let report = service
        .propose(BulkProposalRequest {
            requirement,
            exclude_dev_ids: Vec::new(),
            developer_ids,
            rate_overrides,
            schedule: Some(schedule),
        })
        .await?;
    print_report(&report);
    println!("Match service received {} proposal(s)", log.proposals().len());

    Ok(())
}

/// Loads configuration and installs the log subscriber for one-shot commands.
fn load_cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn print_candidate(candidate: &ScoredCandidate) {
    let developer = &candidate.developer;
    println!(
        "- {:>3} [{}] {} ({}) | {} yrs | ${:.2}/h | {} | matches: {}",
        candidate.score,
        candidate.tier().label(),
        developer.name,
        developer.id,
        developer.years_of_experience,
        developer.hourly_rate,
        developer.location,
        if candidate.matching_skills.is_empty() {
            "none".to_string()
        } else {
            candidate.matching_skills.join(", ")
        }
    );
}

fn print_report(report: &BulkProposalReport) {
    for result in &report.results {
        match &result.outcome {
            ProposalOutcome::Proposed => println!(
                "  - {} proposed at {:.2}/h ({:.0} {} per month)",
                result.developer_id, result.hourly_rate, result.monthly_rate, result.currency
            ),
            ProposalOutcome::Failed { error } => {
                println!("  - {} failed: {}", result.developer_id, error)
            }
        }
    }
    println!(
        "  {} proposed, {} failed",
        report.succeeded(),
        report.failed()
    );
}
