//! `MatchEngine`: owns the vocabulary and compiled patterns and runs the scorers.
//!
//! Scoring is a pure function of (profile, job, config): no I/O, no shared mutable
//! state. One engine is built at startup and shared across threads.

use chrono::{Datelike, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::breakdown::{aggregate, MatchBreakdown};
use crate::matching::density::keyword_density;
use crate::matching::domain::align_domain;
use crate::matching::experience::{match_experience, TenurePatterns};
use crate::matching::job_skills::{classify_role, extract_job_skills};
use crate::matching::profile::{normalize_profile, CandidateProfile, NormalizedProfile};
use crate::matching::skills::match_skills;
use crate::matching::title::match_title;
use crate::matching::vocabulary::MatchConfig;

/// Job posting to score against. Absent or null fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub company: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid {name} pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

fn compile(name: &str, pattern: &str) -> Result<Regex, MatchError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| MatchError::InvalidPattern {
            name: name.to_string(),
            source,
        })
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: MatchConfig,
    tenure: TenurePatterns,
    vendors: Vec<Regex>,
}

impl MatchEngine {
    /// Compiles every pattern in `config`. A bad pattern fails here, never at scoring time.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        let tenure = TenurePatterns {
            required_years: compile("required_years", &config.required_years_pattern)?,
            tenure_range: compile("tenure_range", &config.tenure_range_pattern)?,
        };
        let vendors = config
            .vendor_patterns
            .iter()
            .map(|v| compile(&v.name, &v.pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            config,
            tenure,
            vendors,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Entry point tolerant of missing inputs: either side absent yields the
    /// zero-valued breakdown.
    pub fn compute_match(
        &self,
        profile: Option<&CandidateProfile>,
        job: Option<&JobPosting>,
    ) -> MatchBreakdown {
        match (profile, job) {
            (Some(profile), Some(job)) => self.score(profile, job),
            _ => MatchBreakdown::default(),
        }
    }

    pub fn score(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchBreakdown {
        self.score_normalized(&normalize_profile(profile), job)
    }

    pub(crate) fn score_normalized(
        &self,
        profile: &NormalizedProfile,
        job: &JobPosting,
    ) -> MatchBreakdown {
        let config = &self.config;
        let title = job.title.to_lowercase();
        let description = job.description.to_lowercase();
        let experience = profile.experience_text.to_lowercase();

        let role = classify_role(&title, &description, config);
        let job_skills = extract_job_skills(&description, role, config);

        let skills = match_skills(
            &profile.skills,
            &job_skills,
            role,
            &description,
            &title,
            &experience,
            config,
        );
        let experience_fit = match_experience(
            &experience,
            &description,
            &title,
            config,
            &self.tenure,
            self.reference_year(),
        );
        let title_fit = match_title(&experience, &title, config);
        let domain = align_domain(&experience, &description, &title, config, &self.vendors);
        let density = keyword_density(
            &experience,
            &description,
            config.density_min_token_len,
            config.weights.description_max,
        );

        debug!(
            ?role,
            skills_raw = skills.raw_score,
            experience_raw = experience_fit.raw_score,
            title = title_fit.score,
            domain = domain.score,
            density,
            "scored job"
        );

        aggregate(
            skills,
            &experience_fit,
            &title_fit,
            &domain,
            density,
            &config.weights,
        )
    }

    fn reference_year(&self) -> i32 {
        self.config
            .reference_year
            .unwrap_or_else(|| Utc::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::vocabulary::VendorPattern;
    use serde_json::json;

    fn engine() -> MatchEngine {
        MatchEngine::new(MatchConfig {
            reference_year: Some(2024),
            ..MatchConfig::default()
        })
        .unwrap()
    }

    fn profile(value: serde_json::Value) -> CandidateProfile {
        serde_json::from_value(value).unwrap()
    }

    fn job(title: &str, description: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            description: description.to_string(),
            company: None,
        }
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = MatchConfig {
            vendor_patterns: vec![VendorPattern {
                name: "broken".to_string(),
                pattern: "(unclosed".to_string(),
            }],
            ..MatchConfig::default()
        };
        let err = MatchEngine::new(config).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_missing_inputs_give_zero_breakdown() {
        let e = engine();
        let p = CandidateProfile::default();
        let j = job("Engineer", "Rust");
        assert_eq!(e.compute_match(None, Some(&j)), MatchBreakdown::default());
        assert_eq!(e.compute_match(Some(&p), None), MatchBreakdown::default());
        assert_eq!(e.compute_match(None, None).total, 0);
    }

    #[test]
    fn test_scenario_senior_pm_to_principal_pm() {
        let p = profile(json!({
            "skills": ["Python", "Leadership"],
            "experience": "Senior Product Manager at Acme, 2019–2023"
        }));
        let j = job(
            "Principal Product Manager",
            "Use python daily. Own the roadmap and present the roadmap to leadership.",
        );
        let b = engine().score(&p, &j);
        assert!(b.skills_match > 0);
        assert_eq!(b.title_match, 18);
        assert!(b.matched_skills.contains(&"Python".to_string()));
    }

    #[test]
    fn test_scenario_years_bonus() {
        let p = profile(json!({ "experience": "Senior Software Engineer at Foo, 2015–2023" }));
        let j = job(
            "Senior Software Engineer",
            "You bring 5+ years of backend experience.",
        );
        let b = engine().score(&p, &j);
        // Seniority 20 + years 6 = 26 raw → 30 after scaling.
        assert_eq!(b.experience_match, 30);
    }

    #[test]
    fn test_scenario_domain_without_candidate_overlap() {
        let p = profile(json!({
            "experience": "Led warehouse operations for a logistics company"
        }));
        let j = job("Product Manager", &"fintech payments. ".repeat(5));
        assert_eq!(engine().score(&p, &j).domain_match, 0);
    }

    #[test]
    fn test_scenario_malformed_experience_json() {
        let p = profile(json!({ "experience": "{not valid json" }));
        let normalized = normalize_profile(&p);
        assert_eq!(normalized.experience_text, "{not valid json");
        let b = engine().score(&p, &job("Analyst", "numbers"));
        assert!(b.total <= 100);
    }

    #[test]
    fn test_empty_profile_only_gets_no_signal_defaults() {
        let b = engine().score(
            &CandidateProfile::default(),
            &job("Senior Software Engineer", "Python and Kubernetes, fintech"),
        );
        assert!(b.matched_skills.is_empty());
        assert_eq!(b.skills_match, 0);
        assert_eq!(b.title_match, 0);
        assert_eq!(b.domain_match, 0);
        assert_eq!(b.description_match, 0);
        // Job names a level the (empty) experience does not show: 12 raw → 14.
        assert_eq!(b.experience_match, 14);
        assert_eq!(b.total, 14);
    }

    #[test]
    fn test_job_posting_null_fields_read_as_empty() {
        let j: JobPosting = serde_json::from_value(json!({ "title": null })).unwrap();
        assert_eq!(j.title, "");
        assert_eq!(j.description, "");
        assert_eq!(j.company, None);
    }

    #[test]
    fn test_details_describe_every_scoring_category() {
        let p = profile(json!({
            "skills": ["SQL", "Stripe"],
            "experience": "Senior Product Manager for payments checkout at a fintech using Stripe, 2016-2023"
        }));
        let j = job(
            "Senior Product Manager",
            "Fintech payments checkout team using Stripe. Requires 5 years and strong SQL.",
        );
        let b = engine().score(&p, &j);
        assert_eq!(b.total, b.sub_score_sum().min(100));
        for detail in &b.details {
            assert!(detail.score > 0);
            assert!(detail.score <= detail.max);
            assert!(!detail.description.is_empty());
        }
        assert_eq!(b.title_match, 20);
    }
}
