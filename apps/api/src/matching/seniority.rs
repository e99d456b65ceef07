//! Seniority detection shared by the experience and title matchers.

use crate::matching::text::{contains_any_term, contains_term};
use crate::matching::vocabulary::{LevelEquivalence, MatchConfig};

/// First level (in table order) named in the job title.
pub fn detect_level<'a>(
    title: &str,
    table: &'a [LevelEquivalence],
) -> Option<&'a LevelEquivalence> {
    table.iter().find(|l| contains_term(title, &l.level))
}

/// Candidate text names the level itself or one of its equivalents.
pub fn has_equivalent(text: &str, level: &LevelEquivalence) -> bool {
    contains_term(text, &level.level) || contains_any_term(text, &level.equivalents)
}

/// Candidate sits one notch below the job: holds a `step_up_from` title, has never
/// held the job's own level, and the job level is a `step_up_to` level.
pub fn is_step_up(
    candidate_text: &str,
    job_level: &LevelEquivalence,
    config: &MatchConfig,
) -> bool {
    config.step_up_to.iter().any(|l| *l == job_level.level)
        && contains_any_term(candidate_text, &config.step_up_from)
        && !contains_term(candidate_text, &job_level.level)
}
