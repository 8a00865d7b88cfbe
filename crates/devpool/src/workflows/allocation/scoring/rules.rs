use std::collections::HashSet;

use super::super::domain::{BudgetRange, DeveloperSummary, ExperienceLevel, JobRequirement};

/// Rate credit for candidates cheaper than the budget floor.
pub(crate) const BELOW_BUDGET_RATE_SCORE: f64 = 0.8;
/// Rate credit when the requirement carries no budget.
pub(crate) const NO_BUDGET_RATE_SCORE: f64 = 0.5;

/// Developer skills (original casing, first occurrence) found in the tech stack.
pub(crate) fn matching_skills(developer: &DeveloperSummary, tech_stack: &[String]) -> Vec<String> {
    let wanted: HashSet<String> = tech_stack
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    let mut seen = HashSet::new();

    developer
        .skills
        .iter()
        .filter(|skill| {
            let key = skill.trim().to_lowercase();
            wanted.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

pub(crate) fn tech_stack_score(matched: usize, requirement: &JobRequirement) -> f64 {
    let required = requirement.tech_stack.len();
    if required == 0 {
        return 0.0;
    }
    (matched as f64 / required as f64).clamp(0.0, 1.0)
}

pub(crate) fn experience_score(years: u32, level: ExperienceLevel) -> f64 {
    let (min, max) = level.year_range();

    if years < min {
        let floor = f64::from(min.max(1));
        let shortfall = f64::from(min - years);
        return (1.0 - shortfall / floor).max(0.0);
    }

    if years > max {
        let ceiling = f64::from(max.max(1));
        let excess = f64::from(years - max);
        return (1.0 - excess / ceiling).max(0.0);
    }

    1.0
}

pub(crate) fn rate_score(hourly_rate: f64, budget: Option<&BudgetRange>) -> f64 {
    let Some(budget) = budget else {
        return NO_BUDGET_RATE_SCORE;
    };

    if !hourly_rate.is_finite() {
        return 0.0;
    }

    if hourly_rate < budget.min {
        return BELOW_BUDGET_RATE_SCORE;
    }

    if hourly_rate > budget.max {
        if budget.max <= 0.0 {
            return 0.0;
        }
        return (1.0 - (hourly_rate - budget.max) / budget.max).max(0.0);
    }

    1.0
}
