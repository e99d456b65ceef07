//! Skill Matcher: explicit and inferred candidate skills against the job's
//! extracted vocabulary.
//!
//! Scoring:
//! 1. `matched` = explicit skills that occur in the description.
//! 2. Inferred skills (from titles in the experience text) count toward the total
//!    when the job asks for them, but are never reported as missing.
//! 3. raw = max(floor, total × per_match) + specialized-PM bonus + ratio bonus,
//!    capped at `skill_raw_cap`; the aggregator scales it to the 30-point budget.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::job_skills::RoleClass;
use crate::matching::text::{contains_any, contains_any_term, count_occurrences, is_near};
use crate::matching::vocabulary::MatchConfig;

/// How strongly the job description leans on a missing skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Critical,
    Important,
    NiceToHave,
}

impl Importance {
    pub fn label(self) -> &'static str {
        match self {
            Importance::Critical => "Critical",
            Importance::Important => "Important",
            Importance::NiceToHave => "Nice to have",
        }
    }
}

/// A job skill the candidate does not show, with a gap explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    pub explanation: String,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatch {
    /// Points before scaling, at most `skill_raw_cap`.
    pub raw_score: u32,
    pub matched: Vec<String>,
    pub missing: Vec<MissingSkill>,
    pub inferred: Vec<String>,
    pub total_matched: usize,
    pub job_skill_count: usize,
}

/// Skills assumed present from titles found in the lowercased experience text.
pub fn infer_skills(experience: &str, config: &MatchConfig) -> Vec<String> {
    let mut inferred = Vec::new();
    if contains_any(experience, &config.product_inference_triggers) {
        inferred.extend(config.product_inferred_skills.iter().cloned());
    }
    if contains_any_term(experience, &config.leadership_inference_triggers) {
        inferred.extend(config.leadership_inferred_skills.iter().cloned());
    }
    inferred
}

/// Matches skills. `description`, `title` and `experience` must be lowercased.
pub fn match_skills(
    candidate_skills: &[String],
    job_skills: &[String],
    role: RoleClass,
    description: &str,
    title: &str,
    experience: &str,
    config: &MatchConfig,
) -> SkillMatch {
    let w = &config.weights;
    let explicit: HashSet<String> = candidate_skills.iter().map(|s| s.to_lowercase()).collect();
    let inferred = infer_skills(experience, config);

    let matched: Vec<String> = candidate_skills
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            !lower.is_empty() && description.contains(lower.as_str())
        })
        .cloned()
        .collect();

    // Inferred hits are added on top of `matched`, even when also listed explicitly.
    let inferred_hits = inferred.iter().filter(|s| job_skills.contains(*s)).count();
    let total_matched = matched.len() + inferred_hits;

    let mut missing: Vec<MissingSkill> = job_skills
        .iter()
        .filter(|s| {
            !explicit.contains(s.as_str())
                && !inferred.contains(*s)
                && !config.always_inferred_skills().any(|a| a == *s)
        })
        .map(|s| MissingSkill {
            skill: s.clone(),
            explanation: config.explain_skill(s),
            importance: importance_of(s, description, config),
        })
        .collect();
    missing.sort_by_key(|m| m.importance);

    let mut raw = 0;
    if total_matched > 0 {
        raw = (w.skill_per_match * total_matched as u32).max(w.skill_base_floor);

        let specialized = contains_any_term(title, &config.specialized_pm_markers)
            || contains_any_term(description, &config.specialized_pm_markers);
        if role.is_product() && specialized {
            let competencies = config
                .core_pm_competencies
                .iter()
                .filter(|c| inferred.contains(*c))
                .count() as u32;
            raw += competencies * w.specialized_pm_bonus;
        }

        if !job_skills.is_empty() {
            let ratio = total_matched as f64 / job_skills.len() as f64;
            if ratio > w.match_ratio_threshold {
                let bonus = (ratio - w.match_ratio_threshold) * w.match_ratio_multiplier;
                raw += bonus.round() as u32;
            }
        }
    }

    SkillMatch {
        raw_score: raw.min(w.skill_raw_cap),
        matched,
        missing,
        inferred,
        total_matched,
        job_skill_count: job_skills.len(),
    }
}

/// `critical` when mentioned more than twice or near "require"; `important` when
/// mentioned twice or near "responsib"; otherwise `nice-to-have`.
pub fn importance_of(skill: &str, description: &str, config: &MatchConfig) -> Importance {
    let mentions = count_occurrences(description, skill);
    let window = config.proximity_window;
    if mentions > 2 || is_near(description, skill, &config.requirement_cue, window) {
        Importance::Critical
    } else if mentions > 1 || is_near(description, skill, &config.responsibility_cue, window) {
        Importance::Important
    } else {
        Importance::NiceToHave
    }
}
