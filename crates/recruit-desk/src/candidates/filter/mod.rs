mod criteria;
mod session;

pub use criteria::{
    parse_skills_input, parse_threshold, FilterCriteria, ResultFilter, StatusFilter, ANY_ROUND,
};
pub use session::FilterSession;

use super::domain::CandidateRecord;

/// Applies every active predicate of `criteria`, keeping the input order.
pub fn apply_filters(records: &[CandidateRecord], criteria: &FilterCriteria) -> Vec<CandidateRecord> {
    let predicate = CompiledCriteria::new(criteria);
    records
        .iter()
        .filter(|record| predicate.matches(record))
        .cloned()
        .collect()
}

/// Criteria with the case-folding done once per filter pass instead of once per record.
struct CompiledCriteria<'a> {
    criteria: &'a FilterCriteria,
    search: Option<String>,
    skills: Vec<String>,
    round: Option<String>,
}

impl<'a> CompiledCriteria<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        let search = (!criteria.search.is_empty()).then(|| criteria.search.to_lowercase());
        let skills = criteria
            .skills
            .iter()
            .map(|skill| skill.to_lowercase())
            .collect();
        let round = criteria.round_filter().map(str::to_lowercase);

        Self {
            criteria,
            search,
            skills,
            round,
        }
    }

    fn matches(&self, record: &CandidateRecord) -> bool {
        self.matches_search(record)
            && self.matches_profile(record)
            && self.matches_scores(record)
            && self.matches_skills(record)
            && self.matches_rounds(record)
    }

    fn matches_search(&self, record: &CandidateRecord) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        record.name.to_lowercase().contains(term.as_str())
            || record.email.to_lowercase().contains(term.as_str())
    }

    fn matches_profile(&self, record: &CandidateRecord) -> bool {
        let criteria = self.criteria;

        if !criteria.colleges.is_empty() {
            let allowed = record
                .college_name
                .as_ref()
                .is_some_and(|college| criteria.colleges.contains(college));
            if !allowed {
                return false;
            }
        }

        if !criteria.branch.is_empty() && record.branch.as_deref() != Some(criteria.branch.as_str())
        {
            return false;
        }

        match criteria.selection_status.status() {
            Some(status) => record.selection_status == status,
            None => true,
        }
    }

    fn matches_scores(&self, record: &CandidateRecord) -> bool {
        let criteria = self.criteria;
        at_least(record.cgpa_or_zero(), criteria.min_cgpa)
            && at_least(record.github_score, criteria.min_github_score)
            && at_least(record.hackerearth_score, criteria.min_hackerearth_score)
    }

    fn matches_skills(&self, record: &CandidateRecord) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        record.skills.iter().any(|tag| {
            let tag = tag.to_lowercase();
            self.skills.iter().any(|wanted| tag.contains(wanted.as_str()))
        })
    }

    fn matches_rounds(&self, record: &CandidateRecord) -> bool {
        let rounds = &record.interview_rounds;

        if let Some(label) = &self.round {
            if !rounds.iter().any(|round| round.round.to_lowercase() == *label) {
                return false;
            }
        }

        if let Some(result) = self.criteria.interview_result.result() {
            if !rounds.iter().any(|round| round.result == result) {
                return false;
            }
        }

        match self.criteria.min_interview_score {
            Some(minimum) => rounds.iter().any(|round| round.score >= minimum),
            None => true,
        }
    }
}

fn at_least(value: f64, threshold: Option<f64>) -> bool {
    threshold.map_or(true, |minimum| value >= minimum)
}
