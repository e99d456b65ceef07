//! Domain Aligner: votes the job into an industry cluster, then measures how much of
//! that cluster's vocabulary the candidate's experience covers.

use regex::Regex;

use crate::matching::vocabulary::{DomainCluster, MatchConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct DomainMatch {
    pub score: u32,
    pub domain: Option<String>,
    /// Cluster keywords present in the candidate's experience.
    pub aligned_keywords: Vec<String>,
    /// Vendors / technologies named in the description that the candidate also names.
    pub shared_vendors: Vec<String>,
}

/// Cluster with the most keyword hits in `text`; ties keep the earlier cluster.
pub fn classify_domain<'a>(
    text: &str,
    clusters: &'a [DomainCluster],
) -> Option<&'a DomainCluster> {
    let mut best: Option<(&DomainCluster, usize)> = None;
    for cluster in clusters {
        let hits = cluster
            .keywords
            .iter()
            .filter(|k| !k.is_empty() && text.contains(k.as_str()))
            .count();
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((cluster, hits));
        }
    }
    best.map(|(cluster, _)| cluster)
}

/// Scores domain alignment. All text must be lowercased.
pub fn align_domain(
    experience: &str,
    description: &str,
    title: &str,
    config: &MatchConfig,
    vendor_patterns: &[Regex],
) -> DomainMatch {
    let w = &config.weights;
    let job_text = format!("{title} {description}");

    let mut score = 0;
    let mut domain = None;
    let mut aligned_keywords = Vec::new();

    if let Some(cluster) = classify_domain(&job_text, &config.domain_clusters) {
        aligned_keywords = cluster
            .keywords
            .iter()
            .filter(|k| !k.is_empty() && experience.contains(k.as_str()))
            .cloned()
            .collect();
        let denominator = cluster.keywords.len().min(w.domain_cluster_cap);
        if denominator > 0 {
            let ratio = aligned_keywords.len() as f64 / denominator as f64;
            score = (ratio * f64::from(w.domain_max)).round() as u32;
        }
        domain = Some(cluster.name.clone());
    }

    let shared_vendors = shared_vendors(experience, description, vendor_patterns);
    score += (shared_vendors.len() as u32).min(w.vendor_bonus_cap);

    DomainMatch {
        score: score.min(w.domain_max),
        domain,
        aligned_keywords,
        shared_vendors,
    }
}

/// Distinct vendor names matched in the description and also present in the experience.
fn shared_vendors(experience: &str, description: &str, patterns: &[Regex]) -> Vec<String> {
    let mut vendors: Vec<String> = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(description) {
            let name = m.as_str().to_lowercase();
            if experience.contains(name.as_str()) && !vendors.contains(&name) {
                vendors.push(name);
            }
        }
    }
    vendors
}
