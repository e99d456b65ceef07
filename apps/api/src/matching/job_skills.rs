//! Job Skill Extractor: classifies the role and pulls the relevant vocabulary out of
//! the job description.

use serde::{Deserialize, Serialize};

use crate::matching::text::contains_any;
use crate::matching::vocabulary::MatchConfig;

/// Which skill vocabularies apply to a job, decided from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    Technical,
    Product,
    /// Title carries both technical and product markers ("engineering product manager").
    Hybrid,
    General,
}

impl RoleClass {
    pub fn is_technical(self) -> bool {
        matches!(self, RoleClass::Technical | RoleClass::Hybrid)
    }

    pub fn is_product(self) -> bool {
        matches!(self, RoleClass::Product | RoleClass::Hybrid)
    }
}

/// Classifies a role. Both inputs must be lowercased.
pub fn classify_role(title: &str, description: &str, config: &MatchConfig) -> RoleClass {
    let technical = contains_any(title, &config.technical_title_markers);
    let product = contains_any(title, &config.product_title_markers)
        || (title.contains(config.head_of_marker.as_str())
            && description.contains(config.head_of_product_cue.as_str()));

    match (technical, product) {
        (true, true) => RoleClass::Hybrid,
        (true, false) => RoleClass::Technical,
        (false, true) => RoleClass::Product,
        (false, false) => RoleClass::General,
    }
}

/// Vocabulary keywords found in the lowercased description, deduplicated, in
/// vocabulary order. Soft skills are scanned for every role.
pub fn extract_job_skills(description: &str, role: RoleClass, config: &MatchConfig) -> Vec<String> {
    let mut vocabularies: Vec<&[String]> = Vec::new();
    if role.is_technical() {
        vocabularies.push(&config.technical_skills);
    }
    if role.is_product() {
        vocabularies.push(&config.product_skills);
        vocabularies.push(&config.finance_skills);
        vocabularies.push(&config.crypto_skills);
        vocabularies.push(&config.ai_skills);
    }
    vocabularies.push(&config.soft_skills);

    let mut found: Vec<String> = Vec::new();
    for keyword in vocabularies.into_iter().flatten() {
        if !keyword.is_empty() && description.contains(keyword.as_str()) && !found.contains(keyword)
        {
            found.push(keyword.clone());
        }
    }
    found
}
