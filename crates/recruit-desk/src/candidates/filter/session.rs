use super::criteria::{parse_skills_input, FilterCriteria, StatusFilter};

/// Two-state filter editor: the `applied` criteria drive the roster while the `draft` collects
/// form edits. `apply` copies draft to applied. Every draft mutation sets the dirty flag so the
/// form never has to compare the two copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSession {
    applied: FilterCriteria,
    draft: FilterCriteria,
    dirty: bool,
}

impl FilterSession {
    /// Starts a session from previously persisted (or default) criteria.
    pub fn new(applied: FilterCriteria) -> Self {
        Self {
            draft: applied.clone(),
            applied,
            dirty: false,
        }
    }

    pub fn applied(&self) -> &FilterCriteria {
        &self.applied
    }

    pub fn draft(&self) -> &FilterCriteria {
        &self.draft
    }

    /// True when the draft carries edits not yet applied.
    pub fn has_pending_changes(&self) -> bool {
        self.dirty
    }

    pub fn edit_draft<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        edit(&mut self.draft);
        self.dirty = true;
    }

    pub fn set_skills_input(&mut self, raw: &str) {
        let skills = parse_skills_input(raw);
        self.edit_draft(|draft| draft.skills = skills);
    }

    /// Promotes the draft. Returns the newly applied criteria.
    pub fn apply(&mut self) -> &FilterCriteria {
        self.applied = self.draft.clone();
        self.dirty = false;
        &self.applied
    }

    pub fn clear(&mut self) {
        self.applied = FilterCriteria::default();
        self.draft = FilterCriteria::default();
        self.dirty = false;
    }

    pub fn active_count(&self) -> usize {
        self.applied.active_count()
    }

    pub fn remove_search(&mut self) {
        self.update_applied(|applied| applied.search.clear());
    }

    pub fn remove_college(&mut self, college: &str) {
        self.update_applied(|applied| applied.colleges.retain(|entry| entry != college));
    }

    pub fn remove_branch(&mut self) {
        self.update_applied(|applied| applied.branch.clear());
    }

    pub fn remove_status(&mut self) {
        self.update_applied(|applied| applied.selection_status = StatusFilter::All);
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.update_applied(|applied| applied.skills.retain(|entry| entry != skill));
    }

    /// Chip removals edit the applied criteria directly and overwrite the draft with them.
    fn update_applied<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        edit(&mut self.applied);
        self.draft = self.applied.clone();
        self.dirty = false;
    }
}
