//! Vocabulary and weighting tables for the match engine.
//!
//! Every keyword list, equivalence table, weight and cap used by the scorers lives
//! in `MatchConfig`. `MatchConfig::default()` is the built-in vocabulary; a JSON file
//! can override any subset of fields (see `config::Config::load_match_config`).
//!
//! Ordered tables (seniority levels, domain clusters) are `Vec`s, not maps: the
//! first match wins, so iteration order is part of the data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A seniority level and the title words that satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelEquivalence {
    pub level: String,
    pub equivalents: Vec<String>,
}

/// A named industry vertical and the keywords that signal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCluster {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A named regex used to pull vendor / technology names out of a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorPattern {
    pub name: String,
    pub pattern: String,
}

/// Points, multipliers and caps for every scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    // Skills
    pub skill_per_match: u32,
    pub skill_base_floor: u32,
    pub specialized_pm_bonus: u32,
    pub match_ratio_threshold: f64,
    pub match_ratio_multiplier: f64,
    pub skill_raw_cap: u32,
    pub skill_scale: f64,
    pub skills_max: u32,

    // Experience
    pub experience_leadership_match: u32,
    pub experience_full_match: u32,
    pub experience_step_up: u32,
    pub experience_no_equivalent: u32,
    pub experience_no_seniority: u32,
    pub experience_industry_bonus: u32,
    pub experience_years_met: u32,
    pub experience_years_exceeded: u32,
    pub experience_years_margin: u32,
    pub experience_raw_cap: u32,
    pub experience_scale: f64,
    pub experience_max: u32,

    // Title
    pub title_full_match: u32,
    pub title_step_up: u32,
    pub title_no_equivalent: u32,
    pub title_no_seniority: u32,
    pub title_partial: u32,
    pub title_max: u32,

    // Domain
    pub domain_max: u32,
    pub domain_cluster_cap: usize,
    pub vendor_bonus_cap: u32,

    // Keyword density
    pub description_max: u32,

    pub total_max: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skill_per_match: 8,
            skill_base_floor: 15,
            specialized_pm_bonus: 5,
            match_ratio_threshold: 0.5,
            match_ratio_multiplier: 20.0,
            skill_raw_cap: 40,
            skill_scale: 0.75,
            skills_max: 30,

            experience_leadership_match: 22,
            experience_full_match: 20,
            experience_step_up: 18,
            experience_no_equivalent: 12,
            experience_no_seniority: 15,
            experience_industry_bonus: 8,
            experience_years_met: 6,
            experience_years_exceeded: 8,
            experience_years_margin: 3,
            experience_raw_cap: 30,
            experience_scale: 1.17,
            experience_max: 35,

            title_full_match: 20,
            title_step_up: 18,
            title_no_equivalent: 12,
            title_no_seniority: 15,
            title_partial: 10,
            title_max: 20,

            domain_max: 15,
            domain_cluster_cap: 8,
            vendor_bonus_cap: 3,

            description_max: 10,

            total_max: 100,
        }
    }
}

/// The complete, overridable vocabulary of the match engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Title words marking a technical role.
    pub technical_title_markers: Vec<String>,
    /// Title phrases marking a product-management role.
    pub product_title_markers: Vec<String>,
    /// `head of` titles count as product roles when the description mentions this.
    pub head_of_marker: String,
    pub head_of_product_cue: String,

    pub technical_skills: Vec<String>,
    pub product_skills: Vec<String>,
    pub finance_skills: Vec<String>,
    pub crypto_skills: Vec<String>,
    pub ai_skills: Vec<String>,
    pub soft_skills: Vec<String>,

    pub product_inference_triggers: Vec<String>,
    pub product_inferred_skills: Vec<String>,
    pub leadership_inference_triggers: Vec<String>,
    pub leadership_inferred_skills: Vec<String>,
    pub core_pm_competencies: Vec<String>,
    /// Terms that make a product role "specialized" (AI, crypto).
    pub specialized_pm_markers: Vec<String>,

    pub skill_explanations: BTreeMap<String, String>,
    pub requirement_cue: String,
    pub responsibility_cue: String,
    /// Characters either side of a skill mention searched for a cue word.
    pub proximity_window: usize,

    pub seniority_levels: Vec<LevelEquivalence>,
    pub title_seniority_levels: Vec<LevelEquivalence>,
    pub leadership_markers: Vec<String>,
    pub step_up_from: Vec<String>,
    pub step_up_to: Vec<String>,
    pub industries: Vec<String>,

    pub core_roles: Vec<String>,
    /// Words of a core role shorter than or equal to this are ignored for partial matches.
    pub partial_role_word_min_len: usize,

    pub domain_clusters: Vec<DomainCluster>,
    pub vendor_patterns: Vec<VendorPattern>,

    pub required_years_pattern: String,
    pub tenure_range_pattern: String,
    /// Year substituted for `present` / `current`. Defaults to the current UTC year.
    pub reference_year: Option<i32>,

    /// Tokens must be strictly longer than this to count toward keyword density.
    pub density_min_token_len: usize,

    pub weights: ScoreWeights,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn level(name: &str, equivalents: &[&str]) -> LevelEquivalence {
    LevelEquivalence {
        level: name.to_string(),
        equivalents: words(equivalents),
    }
}

fn cluster(name: &str, keywords: &[&str]) -> DomainCluster {
    DomainCluster {
        name: name.to_string(),
        keywords: words(keywords),
    }
}

fn vendor(name: &str, pattern: &str) -> VendorPattern {
    VendorPattern {
        name: name.to_string(),
        pattern: pattern.to_string(),
    }
}

const SKILL_EXPLANATIONS: &[(&str, &str)] = &[
    (
        "sql",
        "SQL is used for querying product and business data; expect to pull your own numbers.",
    ),
    (
        "python",
        "Python is listed for scripting, data analysis or backend work in this role.",
    ),
    (
        "a/b testing",
        "The team validates changes through controlled experiments; show experiment design and readouts.",
    ),
    (
        "analytics",
        "The role relies on product analytics to make decisions; highlight metrics you owned.",
    ),
    (
        "user research",
        "Direct customer discovery is expected; mention interviews, usability studies or research synthesis.",
    ),
    (
        "stakeholder management",
        "You will align several teams and executives; call out cross-team initiatives you drove.",
    ),
    (
        "agile",
        "The team works in agile cycles; mention sprint planning or delivery cadence you ran.",
    ),
    (
        "scrum",
        "Scrum ceremonies are part of the workflow; note any backlog or sprint ownership.",
    ),
    (
        "go-to-market",
        "Launch planning with sales and marketing is part of the job; describe launches you led.",
    ),
    (
        "product strategy",
        "The role sets product direction; show vision documents or strategic bets you made.",
    ),
    (
        "kubernetes",
        "Workloads run on Kubernetes; deployment and cluster operations experience is expected.",
    ),
    (
        "docker",
        "Services ship as containers; containerisation experience is expected.",
    ),
    (
        "aws",
        "Infrastructure runs on AWS; name the services you have operated.",
    ),
    (
        "machine learning",
        "The product depends on ML models; show work shipping or evaluating models.",
    ),
    (
        "llm",
        "The team builds on large language models; mention prompt, evaluation or fine-tuning work.",
    ),
    (
        "compliance",
        "The domain is regulated; show experience working within compliance constraints.",
    ),
    (
        "blockchain",
        "The product is built on blockchain infrastructure; on-chain experience is valued.",
    ),
    (
        "mentoring",
        "You are expected to grow other team members; note people you coached.",
    ),
    (
        "cross-functional",
        "Work spans engineering, design and business teams; describe cross-team delivery.",
    ),
];

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            technical_title_markers: words(&["engineer", "developer", "architect", "devops"]),
            product_title_markers: words(&[
                "product manager",
                "product lead",
                "head of product",
                "product owner",
                "director of product",
                "vp of product",
                "vp product",
                "chief product",
                "group product",
            ]),
            head_of_marker: "head of".to_string(),
            head_of_product_cue: "product".to_string(),

            technical_skills: words(&[
                "javascript",
                "typescript",
                "python",
                "java",
                "golang",
                "rust",
                "c++",
                "c#",
                "ruby",
                "react",
                "angular",
                "vue",
                "node.js",
                "graphql",
                "rest api",
                "microservices",
                "sql",
                "postgresql",
                "mysql",
                "mongodb",
                "redis",
                "kafka",
                "aws",
                "azure",
                "gcp",
                "docker",
                "kubernetes",
                "terraform",
                "ci/cd",
                "git",
                "linux",
                "machine learning",
                "tensorflow",
                "pytorch",
                "distributed systems",
            ]),
            product_skills: words(&[
                "product management",
                "roadmap",
                "product strategy",
                "product discovery",
                "user research",
                "a/b testing",
                "experimentation",
                "stakeholder management",
                "prioritization",
                "agile",
                "scrum",
                "okrs",
                "kpis",
                "analytics",
                "go-to-market",
                "market research",
                "user experience",
                "data-driven",
                "sql",
                "jira",
            ]),
            finance_skills: words(&[
                "fintech",
                "payments",
                "banking",
                "compliance",
                "kyc",
                "risk management",
                "lending",
                "regulatory",
            ]),
            crypto_skills: words(&[
                "blockchain",
                "crypto",
                "defi",
                "web3",
                "tokenomics",
                "smart contracts",
                "wallet",
            ]),
            ai_skills: words(&[
                "machine learning",
                "artificial intelligence",
                "llm",
                "generative ai",
                "nlp",
                "data science",
                "model evaluation",
            ]),
            soft_skills: words(&[
                "leadership",
                "communication",
                "collaboration",
                "problem solving",
                "mentoring",
                "cross-functional",
            ]),

            product_inference_triggers: words(&["product manager", "head of product"]),
            product_inferred_skills: words(&["product management", "roadmap"]),
            leadership_inference_triggers: words(&[
                "senior",
                "lead",
                "principal",
                "director",
                "head",
            ]),
            leadership_inferred_skills: words(&["leadership", "communication"]),
            core_pm_competencies: words(&["product management", "roadmap", "leadership"]),
            specialized_pm_markers: words(&[
                "ai",
                "artificial intelligence",
                "machine learning",
                "crypto",
                "blockchain",
                "web3",
            ]),

            skill_explanations: SKILL_EXPLANATIONS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            requirement_cue: "require".to_string(),
            responsibility_cue: "responsib".to_string(),
            proximity_window: 60,

            seniority_levels: vec![
                level("senior", &["sr", "lead", "group", "staff", "principal"]),
                level("lead", &["senior", "principal", "staff"]),
                level("group", &["principal", "senior", "lead"]),
                level("staff", &["senior", "principal", "lead"]),
                level("principal", &["staff", "senior", "lead", "group"]),
                level("junior", &["jr", "associate", "entry level", "graduate"]),
                level("director", &["head", "vp"]),
                level("head", &["director", "vp"]),
            ],
            title_seniority_levels: vec![
                level("senior", &["sr", "lead", "group", "staff", "principal"]),
                level("lead", &["senior", "principal", "staff"]),
                level("group", &["principal", "senior", "lead"]),
                level("staff", &["senior", "principal", "lead"]),
                level("principal", &["staff", "senior", "lead", "group"]),
                level("junior", &["jr", "associate", "entry level", "graduate"]),
                level(
                    "director",
                    &["head", "vp", "vice president", "principal", "senior"],
                ),
                level(
                    "head",
                    &["director", "vp", "vice president", "principal", "senior"],
                ),
            ],
            leadership_markers: words(&["head", "director", "vp", "chief"]),
            step_up_from: words(&["senior", "lead"]),
            step_up_to: words(&["principal", "group"]),
            industries: words(&[
                "fintech",
                "healthcare",
                "e-commerce",
                "ecommerce",
                "saas",
                "b2b",
                "b2c",
                "enterprise",
                "cpg",
                "retail",
                "ai",
                "machine learning",
                "data science",
                "edtech",
                "insurance",
                "logistics",
                "marketplace",
                "gaming",
                "crypto",
            ]),

            core_roles: words(&[
                "product manager",
                "software engineer",
                "data scientist",
                "designer",
                "developer",
                "analyst",
                "engineer",
                "architect",
                "researcher",
            ]),
            partial_role_word_min_len: 3,

            domain_clusters: vec![
                cluster(
                    "fintech",
                    &[
                        "fintech",
                        "financial",
                        "banking",
                        "lending",
                        "credit",
                        "neobank",
                        "wealth",
                        "trading",
                        "investment",
                        "payments",
                    ],
                ),
                cluster(
                    "payments",
                    &[
                        "payments",
                        "payment processing",
                        "checkout",
                        "acquiring",
                        "card issuing",
                        "merchant",
                        "interchange",
                        "chargeback",
                    ],
                ),
                cluster(
                    "government",
                    &[
                        "government",
                        "public sector",
                        "govtech",
                        "federal",
                        "municipal",
                        "civic",
                        "public service",
                    ],
                ),
                cluster(
                    "saas",
                    &[
                        "saas",
                        "b2b software",
                        "subscription",
                        "multi-tenant",
                        "enterprise software",
                        "recurring revenue",
                        "churn",
                        "self-serve",
                    ],
                ),
                cluster(
                    "ecommerce",
                    &[
                        "e-commerce",
                        "ecommerce",
                        "online retail",
                        "marketplace",
                        "shopping cart",
                        "shopify",
                        "fulfillment",
                        "conversion rate",
                    ],
                ),
                cluster(
                    "healthcare",
                    &[
                        "healthcare",
                        "healthtech",
                        "clinical",
                        "patient",
                        "medical",
                        "hospital",
                        "telehealth",
                        "pharma",
                    ],
                ),
                cluster(
                    "crypto",
                    &[
                        "crypto",
                        "blockchain",
                        "web3",
                        "defi",
                        "ethereum",
                        "bitcoin",
                        "smart contract",
                        "stablecoin",
                    ],
                ),
            ],
            vendor_patterns: vec![
                vendor(
                    "frameworks",
                    r"\b(react|angular|vue|django|rails|spring boot|next\.js|node\.js|flutter)\b",
                ),
                vendor(
                    "payment_vendors",
                    r"\b(stripe|adyen|paypal|braintree|plaid|checkout\.com|worldpay)\b",
                ),
                vendor(
                    "analytics_tools",
                    r"\b(amplitude|mixpanel|tableau|looker|google analytics|segment|snowflake|heap)\b",
                ),
            ],

            required_years_pattern: r"(\d+)\+?\s*years?".to_string(),
            tenure_range_pattern:
                r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to)\s*((?:19|20)\d{2}|present|current)\b"
                    .to_string(),
            reference_year: None,

            density_min_token_len: 4,

            weights: ScoreWeights::default(),
        }
    }
}

impl MatchConfig {
    /// Skills that are inferred from experience text and never reported as missing.
    pub fn always_inferred_skills(&self) -> impl Iterator<Item = &String> {
        self.product_inferred_skills
            .iter()
            .chain(self.leadership_inferred_skills.iter())
    }

    /// Explanation for a missing skill, falling back to a generic sentence.
    pub fn explain_skill(&self, skill: &str) -> String {
        self.skill_explanations
            .get(skill)
            .cloned()
            .unwrap_or_else(|| {
                format!("{skill} appears important for this role based on the job description.")
            })
    }
}
