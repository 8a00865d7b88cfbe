use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{DeveloperId, DeveloperSummary, JobRequirement, WorkSchedule};
use super::error::AllocationError;
use super::filter::{matches_search, NumericRange, PoolFilters};
use super::proposal::{BulkProposalReport, BulkRateEditor, ProposeMatch};
use super::scoring::{MatchScorer, MatchTier, ScoreComponent};
use super::search::SearchDebouncer;

/// Paging and input timing for a pool browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            search_debounce: Duration::from_millis(300),
        }
    }
}

/// A developer paired with its score against the browsed requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub developer: DeveloperSummary,
    pub score: u8,
    pub matching_skills: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

impl ScoredCandidate {
    pub fn id(&self) -> &DeveloperId {
        &self.developer.id
    }

    pub fn tier(&self) -> MatchTier {
        MatchTier::from_score(self.score)
    }
}

/// Header counts for the pool view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    pub total: usize,
    pub filtered: usize,
    pub visible: usize,
    pub selected: usize,
    pub open_slots: u32,
    pub active_filters: usize,
}

/// One browsing session over the candidate pool for a single requirement.
///
/// Built fresh each time the pool is opened and dropped on close; nothing here
/// outlives the session.
pub struct PoolBrowser {
    scorer: MatchScorer,
    requirement: JobRequirement,
    excluded: HashSet<DeveloperId>,
    candidates: Vec<DeveloperSummary>,
    scored: Vec<ScoredCandidate>,
    filters: PoolFilters,
    search: String,
    debouncer: SearchDebouncer,
    settings: BrowserSettings,
    pages: usize,
    selection: BTreeSet<DeveloperId>,
    finished: bool,
}

impl PoolBrowser {
    pub fn new(
        requirement: JobRequirement,
        excluded: HashSet<DeveloperId>,
        candidates: Vec<DeveloperSummary>,
        settings: BrowserSettings,
    ) -> Self {
        Self::with_scorer(
            MatchScorer::default(),
            requirement,
            excluded,
            candidates,
            settings,
        )
    }

    pub fn with_scorer(
        scorer: MatchScorer,
        requirement: JobRequirement,
        excluded: HashSet<DeveloperId>,
        candidates: Vec<DeveloperSummary>,
        settings: BrowserSettings,
    ) -> Self {
        let settings = BrowserSettings {
            page_size: settings.page_size.max(1),
            ..settings
        };

        let mut browser = Self {
            scorer,
            requirement,
            excluded,
            candidates,
            scored: Vec::new(),
            filters: PoolFilters::default(),
            search: String::new(),
            debouncer: SearchDebouncer::new(settings.search_debounce),
            settings,
            pages: 1,
            selection: BTreeSet::new(),
            finished: false,
        };
        browser.rescore();
        browser
    }

    pub fn requirement(&self) -> &JobRequirement {
        &self.requirement
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub fn excluded(&self) -> &HashSet<DeveloperId> {
        &self.excluded
    }

    /// Whole scored pool, best match first.
    pub fn scored(&self) -> &[ScoredCandidate] {
        &self.scored
    }

    /// Replaces the candidate snapshot and re-scores it.
    pub fn replace_candidates(&mut self, candidates: Vec<DeveloperSummary>) {
        self.candidates = candidates;
        self.rescore();
    }

    /// Retargets the session at an updated requirement and re-scores.
    pub fn replace_requirement(&mut self, requirement: JobRequirement) {
        self.requirement = requirement;
        self.rescore();
    }

    fn rescore(&mut self) {
        let mut scored: Vec<ScoredCandidate> = self
            .candidates
            .iter()
            .filter(|developer| !self.excluded.contains(&developer.id))
            .map(|developer| {
                let result = self.scorer.score(developer, &self.requirement);
                ScoredCandidate {
                    developer: developer.clone(),
                    score: result.score,
                    matching_skills: result.matching_skills,
                    components: result.components,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id().cmp(b.id())));

        debug!(
            requirement = %self.requirement.id,
            candidates = self.candidates.len(),
            scored = scored.len(),
            "pool scored"
        );

        self.scored = scored;
        self.pages = 1;
    }

    // -- filtering and paging --------------------------------------------

    pub fn filters(&self) -> &PoolFilters {
        &self.filters
    }

    /// Committed search text (what the view is filtered by).
    pub fn search_query(&self) -> &str {
        &self.search
    }

    /// Every scored candidate passing the current search and filters.
    pub fn filtered(&self) -> Vec<&ScoredCandidate> {
        self.scored
            .iter()
            .filter(|candidate| matches_search(&candidate.developer, &self.search))
            .filter(|candidate| self.filters.matches(&candidate.developer))
            .collect()
    }

    pub fn total_filtered(&self) -> usize {
        self.filtered().len()
    }

    /// Pages loaded so far, starting at the first.
    pub fn visible(&self) -> Vec<&ScoredCandidate> {
        let mut filtered = self.filtered();
        filtered.truncate(self.visible_limit());
        filtered
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn has_more(&self) -> bool {
        self.total_filtered() > self.visible_limit()
    }

    /// Appends the next page; returns false when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.pages += 1;
        true
    }

    fn visible_limit(&self) -> usize {
        self.pages.saturating_mul(self.settings.page_size)
    }

    pub fn summary(&self) -> PoolSummary {
        let filtered = self.total_filtered();
        PoolSummary {
            total: self.scored.len(),
            filtered,
            visible: filtered.min(self.visible_limit()),
            selected: self.selection.len(),
            open_slots: self.requirement.open_slots(self.excluded.len()),
            active_filters: self.filters.active_count(),
        }
    }

    /// Distinct skills across the pool for the skill picker, sorted
    /// case-insensitively; the first spelling seen wins.
    pub fn available_skills(&self) -> Vec<String> {
        let mut skills = BTreeMap::new();
        for candidate in &self.scored {
            for skill in &candidate.developer.skills {
                let trimmed = skill.trim();
                if trimmed.is_empty() {
                    continue;
                }
                skills
                    .entry(trimmed.to_lowercase())
                    .or_insert_with(|| trimmed.to_string());
            }
        }
        skills.into_values().collect()
    }

    pub fn set_filters(&mut self, filters: PoolFilters) {
        self.update_filters(|current| *current = filters);
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(PoolFilters::clear);
    }

    pub fn set_skill_filter(&mut self, skills: BTreeSet<String>) {
        self.update_filters(|filters| filters.skills = skills);
    }

    pub fn toggle_skill_filter(&mut self, skill: &str) {
        let skill = skill.trim().to_string();
        self.update_filters(|filters| {
            if !filters.skills.remove(&skill) {
                filters.skills.insert(skill);
            }
        });
    }

    pub fn set_experience_range(&mut self, min: Option<u32>, max: Option<u32>) {
        self.update_filters(|filters| filters.experience_years = NumericRange::new(min, max));
    }

    pub fn set_rate_range(&mut self, min: Option<f64>, max: Option<f64>) {
        self.update_filters(|filters| filters.hourly_rate = NumericRange::new(min, max));
    }

    pub fn set_min_rating(&mut self, rating: Option<f32>) {
        self.update_filters(|filters| filters.min_rating = rating);
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.update_filters(|filters| filters.location = location);
    }

    fn update_filters(&mut self, apply: impl FnOnce(&mut PoolFilters)) {
        let before = self.filters.clone();
        apply(&mut self.filters);
        if self.filters != before {
            self.pages = 1;
        }
    }

    // -- search ----------------------------------------------------------

    /// Records a keystroke; the view only changes once input goes quiet.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.debouncer.push(text);
    }

    /// Applies search text immediately, cancelling any pending input.
    pub fn commit_search(&mut self, text: impl Into<String>) -> bool {
        self.debouncer.cancel();
        let text = text.into();
        if text == self.search {
            return false;
        }
        self.search = text;
        self.pages = 1;
        true
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Commits pending input whose quiet period has elapsed.
    pub fn poll_search(&mut self) -> bool {
        match self.debouncer.take_ready() {
            Some(text) => self.commit_search(text),
            None => false,
        }
    }

    /// Waits out the quiet period and commits the pending input.
    pub async fn await_search(&mut self) -> bool {
        match self.debouncer.settled().await {
            Some(text) => self.commit_search(text),
            None => false,
        }
    }

    // -- selection -------------------------------------------------------

    pub fn is_selected(&self, developer_id: &DeveloperId) -> bool {
        self.selection.contains(developer_id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<DeveloperId> {
        &self.selection
    }

    /// Selected candidates in pool order, including any the filters now hide.
    pub fn selected_candidates(&self) -> Vec<&ScoredCandidate> {
        self.scored
            .iter()
            .filter(|candidate| self.selection.contains(candidate.id()))
            .collect()
    }

    /// Flips one developer's selection and returns whether it is now selected.
    pub fn toggle_selection(&mut self, developer_id: &DeveloperId) -> Result<bool, AllocationError> {
        if self.selection.remove(developer_id) {
            return Ok(false);
        }
        if !self.scored.iter().any(|candidate| candidate.id() == developer_id) {
            return Err(AllocationError::UnknownDeveloper(developer_id.clone()));
        }
        self.selection.insert(developer_id.clone());
        Ok(true)
    }

    /// Selects every filtered candidate (not just loaded pages), or clears the
    /// whole selection when all of them are already selected.
    pub fn toggle_select_all(&mut self) {
        let filtered: Vec<DeveloperId> = self
            .filtered()
            .into_iter()
            .map(|candidate| candidate.id().clone())
            .collect();
        if filtered.is_empty() {
            return;
        }

        if filtered.iter().all(|id| self.selection.contains(id)) {
            self.selection.clear();
        } else {
            self.selection.extend(filtered);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // -- bulk proposal ---------------------------------------------------

    /// Opens the rate editor seeded with each selected developer's base rate.
    pub fn open_rate_editor(&self, schedule: WorkSchedule) -> Result<BulkRateEditor, AllocationError> {
        let selected = self.selected_candidates();
        if selected.is_empty() {
            return Err(AllocationError::EmptySelection);
        }

        Ok(BulkRateEditor::new(
            self.requirement.id.clone(),
            schedule,
            selected.into_iter().map(|candidate| &candidate.developer),
        ))
    }

    /// Proposes every developer in the editor, one after another.
    ///
    /// The selection is cleared and the session marked finished only when
    /// every proposal succeeded; otherwise it stays intact for a retry.
    pub async fn confirm_bulk_proposal<P>(
        &mut self,
        editor: BulkRateEditor,
        proposer: &P,
    ) -> Result<BulkProposalReport, AllocationError>
    where
        P: ProposeMatch + ?Sized,
    {
        if editor.requirement_id() != &self.requirement.id {
            return Err(AllocationError::RequirementMismatch {
                expected: self.requirement.id.clone(),
                found: editor.requirement_id().clone(),
            });
        }
        if editor.is_empty() {
            return Err(AllocationError::EmptySelection);
        }

        let report = editor.into_queue(proposer)?.run().await;

        if report.all_succeeded() {
            self.selection.clear();
            self.finished = true;
        }

        Ok(report)
    }

    /// True once a bulk proposal has fully succeeded and the pool can close.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
