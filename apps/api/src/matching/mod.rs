//! CV-to-job match scoring.
//!
//! A candidate profile and a job posting go in; a `MatchBreakdown` with five capped
//! sub-scores, matched / missing skills and an audit trail comes out. Scoring is
//! deterministic keyword and pattern heuristics over a configurable vocabulary.
//!
//! Pipeline: profile normalization → role classification → job skill extraction →
//! skill / experience / title / domain / density scorers → aggregation.

pub mod breakdown;
pub mod density;
pub mod domain;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod job_skills;
pub mod profile;
pub mod ranking;
pub mod seniority;
pub mod skills;
pub mod text;
pub mod title;
pub mod vocabulary;

pub use engine::MatchEngine;
pub use vocabulary::MatchConfig;
