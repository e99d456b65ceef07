//! Batch ranking: scores one candidate against many jobs in parallel, sorts by fit
//! and applies the auto-apply gate.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matching::breakdown::MatchBreakdown;
use crate::matching::engine::{JobPosting, MatchEngine};
use crate::matching::profile::{normalize_profile, CandidateProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Results below this total are dropped.
    pub min_score: Option<u32>,
    pub auto_apply_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    /// Position of the job in the request.
    pub index: usize,
    pub title: String,
    pub company: Option<String>,
    pub auto_apply: bool,
    /// Missing-skill explanations, critical first.
    pub gap_summary: String,
    pub breakdown: MatchBreakdown,
}

impl MatchEngine {
    /// Highest total first; equal totals keep request order.
    pub fn rank_jobs(
        &self,
        profile: &CandidateProfile,
        jobs: &[JobPosting],
        options: &RankOptions,
    ) -> Vec<RankedJob> {
        let normalized = normalize_profile(profile);
        let min_score = options.min_score.unwrap_or(0);

        let mut ranked: Vec<RankedJob> = jobs
            .par_iter()
            .enumerate()
            .map(|(index, job)| {
                let breakdown = self.score_normalized(&normalized, job);
                RankedJob {
                    index,
                    title: job.title.clone(),
                    company: job.company.clone(),
                    auto_apply: breakdown.total >= options.auto_apply_threshold,
                    gap_summary: breakdown.gap_summary(),
                    breakdown,
                }
            })
            .filter(|r| r.breakdown.total >= min_score)
            .collect();

        ranked.sort_by(|a, b| {
            b.breakdown
                .total
                .cmp(&a.breakdown.total)
                .then(a.index.cmp(&b.index))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::vocabulary::MatchConfig;
    use serde_json::json;

    fn engine() -> MatchEngine {
        MatchEngine::new(MatchConfig {
            reference_year: Some(2024),
            ..MatchConfig::default()
        })
        .unwrap()
    }

    fn job(title: &str, description: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            description: description.to_string(),
            company: Some("Acme".to_string()),
        }
    }

    fn candidate() -> CandidateProfile {
        serde_json::from_value(json!({
            "skills": ["Python", "Kubernetes", "SQL"],
            "experience": "Senior Software Engineer at Foo, 2015-2023. Python services on Kubernetes."
        }))
        .unwrap()
    }

    fn jobs() -> Vec<JobPosting> {
        vec![
            job("Pastry Chef", "Bake bread every morning"),
            job(
                "Senior Software Engineer",
                "Python services on Kubernetes with SQL. 5+ years.",
            ),
            job("Software Engineer", "Python"),
        ]
    }

    #[test]
    fn test_ranked_by_total_descending() {
        let options = RankOptions {
            min_score: None,
            auto_apply_threshold: 70,
        };
        let ranked = engine().rank_jobs(&candidate(), &jobs(), &options);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked.last().unwrap().index, 0);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].breakdown.total >= w[1].breakdown.total));
    }

    #[test]
    fn test_matches_single_scoring() {
        let e = engine();
        let options = RankOptions {
            min_score: None,
            auto_apply_threshold: 70,
        };
        let ranked = e.rank_jobs(&candidate(), &jobs(), &options);
        for r in &ranked {
            assert_eq!(r.breakdown, e.score(&candidate(), &jobs()[r.index]));
        }
    }

    #[test]
    fn test_auto_apply_gate_and_min_score() {
        let e = engine();
        let best = e.score(&candidate(), &jobs()[1]).total;
        let options = RankOptions {
            min_score: Some(best),
            auto_apply_threshold: best,
        };
        let ranked = e.rank_jobs(&candidate(), &jobs(), &options);
        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|r| r.auto_apply));
        assert!(ranked.iter().all(|r| r.breakdown.total >= best));
    }

    #[test]
    fn test_equal_totals_keep_request_order() {
        let options = RankOptions {
            min_score: None,
            auto_apply_threshold: 100,
        };
        let same = vec![job("Chef", "bread"), job("Chef", "bread"), job("Chef", "bread")];
        let ranked = engine().rank_jobs(&CandidateProfile::default(), &same, &options);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_job_list() {
        let options = RankOptions {
            min_score: None,
            auto_apply_threshold: 70,
        };
        assert!(engine().rank_jobs(&candidate(), &[], &options).is_empty());
    }
}
