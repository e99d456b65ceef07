//! Experience Matcher: seniority fit, shared industry background and tenure.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::seniority::{detect_level, has_equivalent, is_step_up};
use crate::matching::text::{contains_any_term, contains_term};
use crate::matching::vocabulary::MatchConfig;

/// How the candidate's seniority relates to the job's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityFit {
    /// Both sides carry leadership markers (head, director, vp, chief).
    Leadership,
    Equivalent,
    StepUp,
    /// Job names a level the candidate text never shows.
    Below,
    /// Job title names no level.
    Unspecified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceMatch {
    /// Points before scaling, at most `experience_raw_cap`.
    pub raw_score: u32,
    pub seniority: SeniorityFit,
    pub shared_industry: Option<String>,
    pub required_years: Option<u32>,
    pub candidate_years: u32,
}

/// Patterns compiled once per engine.
#[derive(Debug, Clone)]
pub struct TenurePatterns {
    pub required_years: Regex,
    pub tenure_range: Regex,
}

/// Scores experience. `experience`, `description` and `title` must be lowercased.
pub fn match_experience(
    experience: &str,
    description: &str,
    title: &str,
    config: &MatchConfig,
    patterns: &TenurePatterns,
    reference_year: i32,
) -> ExperienceMatch {
    let w = &config.weights;

    let seniority = match detect_level(title, &config.seniority_levels) {
        Some(level) if has_equivalent(experience, level) => {
            if contains_any_term(title, &config.leadership_markers)
                && contains_any_term(experience, &config.leadership_markers)
            {
                SeniorityFit::Leadership
            } else if is_step_up(experience, level, config) {
                SeniorityFit::StepUp
            } else {
                SeniorityFit::Equivalent
            }
        }
        Some(_) => SeniorityFit::Below,
        None => SeniorityFit::Unspecified,
    };

    let mut raw = match seniority {
        SeniorityFit::Leadership => w.experience_leadership_match,
        SeniorityFit::Equivalent => w.experience_full_match,
        SeniorityFit::StepUp => w.experience_step_up,
        SeniorityFit::Below => w.experience_no_equivalent,
        SeniorityFit::Unspecified => w.experience_no_seniority,
    };

    let shared_industry = config
        .industries
        .iter()
        .find(|i| contains_term(description, i) && contains_term(experience, i))
        .cloned();
    if shared_industry.is_some() {
        raw += w.experience_industry_bonus;
    }

    let required_years = required_years(description, &patterns.required_years);
    let candidate_years = estimate_years(experience, &patterns.tenure_range, reference_year);
    if let Some(required) = required_years {
        if candidate_years >= required {
            raw += if candidate_years > required + w.experience_years_margin {
                w.experience_years_exceeded
            } else {
                w.experience_years_met
            };
        }
    }

    ExperienceMatch {
        raw_score: raw.min(w.experience_raw_cap),
        seniority,
        shared_industry,
        required_years,
        candidate_years,
    }
}

/// First `N years` / `N+ years` figure in the description.
pub fn required_years(description: &str, pattern: &Regex) -> Option<u32> {
    pattern
        .captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Sums `(end - start)` over every `YYYY–YYYY|present|current` range in the text.
/// Overlapping ranges are each counted in full.
pub fn estimate_years(experience: &str, pattern: &Regex, reference_year: i32) -> u32 {
    pattern
        .captures_iter(experience)
        .filter_map(|caps| {
            let start: i32 = caps.get(1)?.as_str().parse().ok()?;
            let end_raw = caps.get(2)?.as_str();
            let end = if end_raw.eq_ignore_ascii_case("present")
                || end_raw.eq_ignore_ascii_case("current")
            {
                reference_year
            } else {
                end_raw.parse().ok()?
            };
            u32::try_from(end - start).ok()
        })
        .sum()
}
