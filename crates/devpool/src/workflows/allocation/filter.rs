use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::DeveloperSummary;

/// Inclusive bounds; an unset bound is not checked.
///
/// Inverted bounds are kept as entered and simply match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for NumericRange<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Copy> NumericRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Session-scoped filter state for one pool browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolFilters {
    pub skills: BTreeSet<String>,
    pub experience_years: NumericRange<u32>,
    pub hourly_rate: NumericRange<f64>,
    pub min_rating: Option<f32>,
    pub location: Option<String>,
}

impl PoolFilters {
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of filter groups currently narrowing the pool.
    pub fn active_count(&self) -> usize {
        [
            !self.skills.is_empty(),
            !self.experience_years.is_unbounded(),
            !self.hourly_rate.is_unbounded(),
            self.min_rating.is_some(),
            self.location_query().is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, developer: &DeveloperSummary) -> bool {
        self.matches_skills(developer)
            && self.experience_years.contains(developer.years_of_experience)
            && self.hourly_rate.contains(developer.hourly_rate)
            && self
                .min_rating
                .map_or(true, |min| developer.rating >= min)
            && self.matches_location(developer)
    }

    fn matches_skills(&self, developer: &DeveloperSummary) -> bool {
        if self.skills.is_empty() {
            return true;
        }

        // any selected skill is enough
        let wanted: Vec<String> = self
            .skills
            .iter()
            .map(|skill| skill.trim().to_lowercase())
            .collect();
        developer
            .skills
            .iter()
            .any(|skill| wanted.contains(&skill.trim().to_lowercase()))
    }

    fn matches_location(&self, developer: &DeveloperSummary) -> bool {
        match self.location_query() {
            Some(query) => developer.location.to_lowercase().contains(&query),
            None => true,
        }
    }

    fn location_query(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
    }
}

/// Case-insensitive substring search over name, role, and skills.
pub fn matches_search(developer: &DeveloperSummary, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    developer.name.to_lowercase().contains(&needle)
        || developer.role.to_lowercase().contains(&needle)
        || developer
            .skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&needle))
}
