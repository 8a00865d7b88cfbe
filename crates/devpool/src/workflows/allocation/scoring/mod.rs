mod config;
mod rules;

pub use config::ScoringWeights;

use serde::{Deserialize, Serialize};

use super::domain::{DeveloperSummary, JobRequirement};

/// Stateless scorer ranking a developer against a requirement.
///
/// The score is a pure function of its inputs so the same pool always ranks
/// the same way across renders and test runs.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, developer: &DeveloperSummary, requirement: &JobRequirement) -> MatchScore {
        let matching_skills = rules::matching_skills(developer, &requirement.tech_stack);

        let tech = rules::tech_stack_score(matching_skills.len(), requirement);
        let experience = rules::experience_score(
            developer.years_of_experience,
            requirement.experience_level,
        );
        let rate = rules::rate_score(developer.hourly_rate, requirement.budget.as_ref());

        let components = vec![
            ScoreComponent {
                factor: ScoreFactor::TechStack,
                value: tech,
                points: tech * self.weights.tech_stack,
                notes: if requirement.tech_stack.is_empty() {
                    "requirement lists no tech stack".to_string()
                } else {
                    format!(
                        "{} of {} required skills",
                        matching_skills.len(),
                        requirement.tech_stack.len()
                    )
                },
            },
            ScoreComponent {
                factor: ScoreFactor::Experience,
                value: experience,
                points: experience * self.weights.experience,
                notes: {
                    let (min, max) = requirement.experience_level.year_range();
                    format!(
                        "{} years against {} band {}-{}",
                        developer.years_of_experience,
                        requirement.experience_level.label(),
                        min,
                        max
                    )
                },
            },
            ScoreComponent {
                factor: ScoreFactor::Rate,
                value: rate,
                points: rate * self.weights.rate,
                notes: match &requirement.budget {
                    Some(budget) => format!(
                        "{:.2}/h against budget {:.2}-{:.2}",
                        developer.hourly_rate, budget.min, budget.max
                    ),
                    None => "no budget set".to_string(),
                },
            },
        ];

        let total: f64 = components.iter().map(|component| component.points).sum();
        let score = if total.is_finite() {
            total.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        MatchScore {
            score,
            matching_skills,
            components,
        }
    }
}

/// Factor contributing to a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    TechStack,
    Experience,
    Rate,
}

/// Normalized sub-score and its weighted contribution, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub value: f64,
    pub points: f64,
    pub notes: String,
}

/// Scorer output for one (developer, requirement) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u8,
    pub matching_skills: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

impl MatchScore {
    pub fn tier(&self) -> MatchTier {
        MatchTier::from_score(self.score)
    }

    pub fn component(&self, factor: ScoreFactor) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.factor == factor)
    }
}

/// Coarse band used for badges; ranking always uses the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Weak,
    Fair,
    Good,
    Strong,
}

impl MatchTier {
    pub const fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => MatchTier::Strong,
            60..=79 => MatchTier::Good,
            40..=59 => MatchTier::Fair,
            _ => MatchTier::Weak,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchTier::Strong => "strong",
            MatchTier::Good => "good",
            MatchTier::Fair => "fair",
            MatchTier::Weak => "weak",
        }
    }
}
