//! Title Matcher: compares the roles the candidate has held to the job's core role
//! and seniority.

use serde::{Deserialize, Serialize};

use crate::matching::seniority::{detect_level, has_equivalent, is_step_up};
use crate::matching::vocabulary::MatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleFit {
    /// Same core role at an equivalent level.
    Exact,
    StepUp,
    /// Same core role, the job's level not shown.
    LevelGap,
    /// Same core role, job names no level.
    RoleOnly,
    /// A word of some core role appears on both sides.
    Partial,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    pub score: u32,
    pub fit: TitleFit,
    pub core_role: Option<String>,
}

/// Scores titles. `experience` and `title` must be lowercased.
pub fn match_title(experience: &str, title: &str, config: &MatchConfig) -> TitleMatch {
    let w = &config.weights;
    let core_role = config
        .core_roles
        .iter()
        .find(|r| !r.is_empty() && title.contains(r.as_str()));

    if let Some(role) = core_role.filter(|r| experience.contains(r.as_str())) {
        let fit = match detect_level(title, &config.title_seniority_levels) {
            Some(level) if has_equivalent(experience, level) => {
                if is_step_up(experience, level, config) {
                    TitleFit::StepUp
                } else {
                    TitleFit::Exact
                }
            }
            Some(_) => TitleFit::LevelGap,
            None => TitleFit::RoleOnly,
        };
        let score = match fit {
            TitleFit::Exact => w.title_full_match,
            TitleFit::StepUp => w.title_step_up,
            TitleFit::LevelGap => w.title_no_equivalent,
            _ => w.title_no_seniority,
        };
        return TitleMatch {
            score: score.min(w.title_max),
            fit,
            core_role: Some(role.clone()),
        };
    }

    let partial = config
        .core_roles
        .iter()
        .flat_map(|r| r.split_whitespace())
        .filter(|word| word.chars().count() > config.partial_role_word_min_len)
        .any(|word| title.contains(word) && experience.contains(word));

    TitleMatch {
        score: if partial { w.title_partial.min(w.title_max) } else { 0 },
        fit: if partial { TitleFit::Partial } else { TitleFit::None },
        core_role: core_role.cloned(),
    }
}
