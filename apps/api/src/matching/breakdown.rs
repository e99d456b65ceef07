//! Score Aggregator: scales and caps the five sub-scores and assembles the
//! auditable `MatchBreakdown`.

use serde::{Deserialize, Serialize};

use crate::matching::domain::DomainMatch;
use crate::matching::experience::{ExperienceMatch, SeniorityFit};
use crate::matching::skills::{Importance, MissingSkill, SkillMatch};
use crate::matching::title::{TitleFit, TitleMatch};
use crate::matching::vocabulary::ScoreWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Skills,
    Experience,
    Title,
    Domain,
    Description,
}

/// One line of the audit trail shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub category: MatchCategory,
    pub score: u32,
    pub max: u32,
    pub description: String,
}

/// Fit score for one (candidate, job) pair.
///
/// `total == min(total_max, sum of sub-scores)`; `details` only lists categories
/// that scored. The default value is the "no signal" result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub skills_match: u32,
    pub experience_match: u32,
    pub title_match: u32,
    pub domain_match: u32,
    pub description_match: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<MissingSkill>,
    pub details: Vec<MatchDetail>,
    pub total: u32,
}

impl MatchBreakdown {
    pub fn sub_score_sum(&self) -> u32 {
        self.skills_match
            + self.experience_match
            + self.title_match
            + self.domain_match
            + self.description_match
    }

    /// Missing-skill explanations grouped by importance, critical first.
    pub fn gap_summary(&self) -> String {
        if self.missing_skills.is_empty() {
            return "No skill gaps found for this role.".to_string();
        }
        let mut lines = Vec::new();
        for tier in [Importance::Critical, Importance::Important, Importance::NiceToHave] {
            let gaps: Vec<&MissingSkill> = self
                .missing_skills
                .iter()
                .filter(|m| m.importance == tier)
                .collect();
            if gaps.is_empty() {
                continue;
            }
            lines.push(format!("{}:", tier.label()));
            lines.extend(gaps.iter().map(|m| format!("- {}: {}", m.skill, m.explanation)));
        }
        lines.join("\n")
    }
}

fn scale(raw: u32, factor: f64, max: u32) -> u32 {
    ((f64::from(raw) * factor).round() as u32).min(max)
}

/// Combines the scorer outputs into the final breakdown.
pub fn aggregate(
    skills: SkillMatch,
    experience: &ExperienceMatch,
    title: &TitleMatch,
    domain: &DomainMatch,
    description_match: u32,
    weights: &ScoreWeights,
) -> MatchBreakdown {
    let skills_match = scale(skills.raw_score, weights.skill_scale, weights.skills_max);
    let experience_match = scale(
        experience.raw_score,
        weights.experience_scale,
        weights.experience_max,
    );
    let title_match = title.score.min(weights.title_max);
    let domain_match = domain.score.min(weights.domain_max);
    let description_match = description_match.min(weights.description_max);

    let candidates = [
        (
            MatchCategory::Skills,
            skills_match,
            weights.skills_max,
            describe_skills(&skills),
        ),
        (
            MatchCategory::Experience,
            experience_match,
            weights.experience_max,
            describe_experience(experience),
        ),
        (
            MatchCategory::Title,
            title_match,
            weights.title_max,
            describe_title(title),
        ),
        (
            MatchCategory::Domain,
            domain_match,
            weights.domain_max,
            describe_domain(domain),
        ),
        (
            MatchCategory::Description,
            description_match,
            weights.description_max,
            format!(
                "Keyword overlap with the job description: {description_match}/{}",
                weights.description_max
            ),
        ),
    ];
    let details = candidates
        .into_iter()
        .filter(|(_, score, _, _)| *score > 0)
        .map(|(category, score, max, description)| MatchDetail {
            category,
            score,
            max,
            description,
        })
        .collect();

    let mut breakdown = MatchBreakdown {
        skills_match,
        experience_match,
        title_match,
        domain_match,
        description_match,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        details,
        total: 0,
    };
    breakdown.total = breakdown.sub_score_sum().min(weights.total_max);
    breakdown
}

fn describe_skills(skills: &SkillMatch) -> String {
    let mut text = format!(
        "{} of {} job skills covered",
        skills.total_matched, skills.job_skill_count
    );
    if !skills.matched.is_empty() {
        text.push_str(&format!("; matched: {}", skills.matched.join(", ")));
    }
    if !skills.inferred.is_empty() {
        text.push_str(&format!(
            "; inferred from experience: {}",
            skills.inferred.join(", ")
        ));
    }
    text
}

fn describe_experience(experience: &ExperienceMatch) -> String {
    let mut text = match experience.seniority {
        SeniorityFit::Leadership => "Leadership background matches a leadership role",
        SeniorityFit::Equivalent => "Seniority matches the role",
        SeniorityFit::StepUp => "One level below the role's seniority",
        SeniorityFit::Below => "Role seniority not evident in experience",
        SeniorityFit::Unspecified => "Role states no seniority level",
    }
    .to_string();
    if let Some(industry) = &experience.shared_industry {
        text.push_str(&format!("; {industry} background"));
    }
    if let Some(required) = experience.required_years {
        text.push_str(&format!(
            "; {} years of experience against {required} required",
            experience.candidate_years
        ));
    }
    text
}

fn describe_title(title: &TitleMatch) -> String {
    let role = title.core_role.as_deref().unwrap_or("role");
    match title.fit {
        TitleFit::Exact => format!("Held {role} titles at the same level"),
        TitleFit::StepUp => format!("Held {role} titles one level below"),
        TitleFit::LevelGap => format!("Held {role} titles below the stated level"),
        TitleFit::RoleOnly => format!("Held {role} titles"),
        TitleFit::Partial => "Related role titles in experience".to_string(),
        TitleFit::None => "No related role titles".to_string(),
    }
}

fn describe_domain(domain: &DomainMatch) -> String {
    let mut text = match &domain.domain {
        Some(name) => format!(
            "{name} domain: {} keyword(s) in experience",
            domain.aligned_keywords.len()
        ),
        None => "No clear industry domain".to_string(),
    };
    if !domain.shared_vendors.is_empty() {
        text.push_str(&format!("; tools in common: {}", domain.shared_vendors.join(", ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill_match(raw: u32) -> SkillMatch {
        SkillMatch {
            raw_score: raw,
            matched: vec!["Python".to_string()],
            missing: vec![
                MissingSkill {
                    skill: "docker".to_string(),
                    explanation: "Containers.".to_string(),
                    importance: Importance::NiceToHave,
                },
                MissingSkill {
                    skill: "sql".to_string(),
                    explanation: "Queries.".to_string(),
                    importance: Importance::Critical,
                },
            ],
            inferred: vec![],
            total_matched: 1,
            job_skill_count: 3,
        }
    }

    fn experience(raw: u32) -> ExperienceMatch {
        ExperienceMatch {
            raw_score: raw,
            seniority: SeniorityFit::Equivalent,
            shared_industry: Some("saas".to_string()),
            required_years: Some(5),
            candidate_years: 8,
        }
    }

    fn title(score: u32) -> TitleMatch {
        TitleMatch {
            score,
            fit: TitleFit::Exact,
            core_role: Some("engineer".to_string()),
        }
    }

    fn domain(score: u32) -> DomainMatch {
        DomainMatch {
            score,
            domain: None,
            aligned_keywords: vec![],
            shared_vendors: vec![],
        }
    }

    #[test]
    fn test_scaling_and_caps() {
        let w = ScoreWeights::default();
        let b = aggregate(skill_match(40), &experience(30), &title(20), &domain(15), 10, &w);
        assert_eq!(b.skills_match, 30);
        assert_eq!(b.experience_match, 35);
        assert_eq!(b.total, 100);
        assert_eq!(b.details.len(), 5);
    }

    #[test]
    fn test_total_equals_sum_below_cap() {
        let w = ScoreWeights::default();
        let b = aggregate(skill_match(16), &experience(20), &title(18), &domain(0), 3, &w);
        // 16 × 0.75 = 12, 20 × 1.17 = 23.4 → 23.
        assert_eq!(b.skills_match, 12);
        assert_eq!(b.experience_match, 23);
        assert_eq!(b.total, 12 + 23 + 18 + 3);
        assert_eq!(b.total, b.sub_score_sum());
    }

    #[test]
    fn test_details_skip_zero_categories() {
        let w = ScoreWeights::default();
        let b = aggregate(skill_match(0), &experience(15), &title(0), &domain(0), 0, &w);
        assert_eq!(b.details.len(), 1);
        assert_eq!(b.details[0].category, MatchCategory::Experience);
        assert_eq!(b.details[0].max, 35);
        assert!(b.details[0].description.contains("saas background"));
        assert!(b.details[0].description.contains("8 years"));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let b = MatchBreakdown::default();
        let json = serde_json::to_value(&b).unwrap();
        assert!(json.get("skillsMatch").is_some());
        assert!(json.get("missingSkills").is_some());
        assert_eq!(json["total"], 0);
    }

    #[test]
    fn test_gap_summary_groups_by_importance() {
        let w = ScoreWeights::default();
        let b = aggregate(skill_match(16), &experience(20), &title(18), &domain(0), 3, &w);
        let summary = b.gap_summary();
        let critical = summary.find("Critical:").unwrap();
        let nice = summary.find("Nice to have:").unwrap();
        assert!(critical < nice);
        assert!(summary.contains("- sql: Queries."));
        assert!(!summary.contains("Important:"));
    }

    #[test]
    fn test_gap_summary_without_gaps() {
        assert_eq!(
            MatchBreakdown::default().gap_summary(),
            "No skill gaps found for this role."
        );
    }
}
