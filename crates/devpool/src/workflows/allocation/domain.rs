use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for developer profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeveloperId(pub String);

impl fmt::Display for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeveloperId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for job requirements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(pub String);

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate profile summary as provided by the candidate source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperSummary {
    pub id: DeveloperId,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub completed_projects: u32,
    pub hourly_rate: f64,
    #[serde(default)]
    pub monthly_rate: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub years_of_experience: u32,
    #[serde(default)]
    pub bio: String,
}

/// Seniority bands a requirement can ask for, ordered junior to principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
    /// Any label outside the known bands; accepts the widest range.
    #[serde(other)]
    Unknown,
}

impl ExperienceLevel {
    /// Inclusive band of years of experience expected at this level.
    pub const fn year_range(self) -> (u32, u32) {
        match self {
            ExperienceLevel::Junior => (0, 2),
            ExperienceLevel::Mid => (3, 5),
            ExperienceLevel::Senior => (5, 9),
            ExperienceLevel::Lead => (8, 14),
            ExperienceLevel::Principal => (12, 30),
            ExperienceLevel::Unknown => (0, 30),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Principal => "principal",
            ExperienceLevel::Unknown => "unknown",
        }
    }

    /// Lenient parser used by the CLI and CSV imports.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "junior" | "jr" => Self::Junior,
            "mid" | "mid-level" | "intermediate" => Self::Mid,
            "senior" | "sr" => Self::Senior,
            "lead" => Self::Lead,
            "principal" | "staff" => Self::Principal,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    FullTime,
    PartTime,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Open,
    InProgress,
    Filled,
    Closed,
}

/// Hourly budget band. Both bounds are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && rate <= self.max
    }
}

/// Open role a company wants filled; the scoring target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: RequirementId,
    pub title: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default = "default_developers_needed")]
    pub developers_needed: u32,
    pub engagement_type: EngagementType,
    #[serde(default)]
    pub timezone_preference: String,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub priority: RequirementPriority,
    pub status: RequirementStatus,
}

fn default_developers_needed() -> u32 {
    1
}

impl JobRequirement {
    /// Positions still open once `already_matched` developers are counted.
    pub fn open_slots(&self, already_matched: usize) -> u32 {
        let matched = u32::try_from(already_matched).unwrap_or(u32::MAX);
        self.developers_needed.saturating_sub(matched)
    }
}

/// Working-time assumptions shared by every proposal in one bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub working_days_per_month: u8,
    pub hours_per_day: u8,
    pub currency: String,
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            working_days_per_month: 22,
            hours_per_day: 8,
            currency: "USD".to_string(),
        }
    }
}

impl WorkSchedule {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(1..=31).contains(&self.working_days_per_month) {
            return Err(ScheduleError::WorkingDays(self.working_days_per_month));
        }
        if !(1..=24).contains(&self.hours_per_day) {
            return Err(ScheduleError::HoursPerDay(self.hours_per_day));
        }
        if self.currency.trim().is_empty() {
            return Err(ScheduleError::MissingCurrency);
        }
        Ok(())
    }

    /// `round(hourly × hours_per_day × working_days_per_month)`.
    pub fn monthly_rate(&self, hourly_rate: f64) -> f64 {
        (hourly_rate * f64::from(self.hours_per_day) * f64::from(self.working_days_per_month))
            .round()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("working days per month must be between 1 and 31, got {0}")]
    WorkingDays(u8),
    #[error("hours per day must be between 1 and 24, got {0}")]
    HoursPerDay(u8),
    #[error("currency must not be empty")]
    MissingCurrency,
}
