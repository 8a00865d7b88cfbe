use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{DeveloperId, DeveloperSummary};

/// Supplies the full candidate list; filtering always happens in memory.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self) -> Result<Vec<DeveloperSummary>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read candidate roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("candidate source unavailable: {0}")]
    Unavailable(String),
}

/// Fixed candidate list, handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    developers: Vec<DeveloperSummary>,
}

impl StaticCandidateSource {
    pub fn new(developers: Vec<DeveloperSummary>) -> Self {
        Self { developers }
    }
}

impl CandidateSource for StaticCandidateSource {
    fn candidates(&self) -> Result<Vec<DeveloperSummary>, SourceError> {
        Ok(self.developers.clone())
    }
}

/// Developer roster loaded from a CSV export.
///
/// Expected headers: `id,name,role,skills,rating,completed_projects,hourly_rate,
/// monthly_rate,location,years_of_experience,bio`. Skills are `;`-separated and
/// blank numeric cells default to zero.
#[derive(Debug, Clone)]
pub struct CsvCandidateSource {
    developers: Vec<DeveloperSummary>,
}

impl CsvCandidateSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        Ok(Self {
            developers: parse_roster(reader)?,
        })
    }

    pub fn len(&self) -> usize {
        self.developers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.developers.is_empty()
    }
}

impl CandidateSource for CsvCandidateSource {
    fn candidates(&self) -> Result<Vec<DeveloperSummary>, SourceError> {
        Ok(self.developers.clone())
    }
}

fn parse_roster<R: Read>(reader: R) -> Result<Vec<DeveloperSummary>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<RosterRow>()
        .map(|row| row.map(RosterRow::into_summary))
        .collect()
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    skills: String,
    #[serde(default, deserialize_with = "blank_as_default")]
    rating: f32,
    #[serde(default, deserialize_with = "blank_as_default")]
    completed_projects: u32,
    #[serde(default, deserialize_with = "blank_as_default")]
    hourly_rate: f64,
    #[serde(default, deserialize_with = "blank_as_default")]
    monthly_rate: f64,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "blank_as_default")]
    years_of_experience: u32,
    #[serde(default)]
    bio: String,
}

impl RosterRow {
    fn into_summary(self) -> DeveloperSummary {
        let skills = self
            .skills
            .split(';')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();

        DeveloperSummary {
            id: DeveloperId(self.id),
            name: self.name,
            role: self.role,
            skills,
            rating: self.rating,
            completed_projects: self.completed_projects,
            hourly_rate: self.hourly_rate,
            monthly_rate: self.monthly_rate,
            location: self.location,
            years_of_experience: self.years_of_experience,
            bio: self.bio,
        }
    }
}

fn blank_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse::<T>().map_err(serde::de::Error::custom),
    }
}
