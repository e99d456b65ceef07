//! Profile Normalizer: coerces a loosely-shaped candidate record into one skill set
//! and one experience text blob.
//!
//! Candidate records arrive from several upstream writers: skills as a flat list, a
//! list of lists, a category map or an embedded JSON string; experience as plain CV
//! text or a JSON-encoded CV. Every shape is decoded into a tagged variant here, once.
//! Field-level problems surface as `ParseIssue` internally and collapse to the most
//! conservative reading (absent skills / the raw string); nothing is raised to callers.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Input shapes
// ────────────────────────────────────────────────────────────────────────────

/// Problems found while decoding a single profile field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseIssue {
    #[error("skills field has unsupported shape: {0}")]
    UnsupportedSkillsShape(&'static str),

    #[error("embedded skills JSON is malformed: {0}")]
    MalformedSkillsJson(String),

    #[error("experience field has unsupported shape: {0}")]
    UnsupportedExperienceShape(&'static str),

    #[error("experience looks like JSON but is malformed: {0}")]
    MalformedExperienceJson(String),
}

/// Every shape the `skills` field is known to take.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SkillsInput {
    #[default]
    Absent,
    Flat(Vec<String>),
    Nested(Vec<Vec<String>>),
    Grouped(BTreeMap<String, Vec<String>>),
}

/// Every shape the experience / CV field is known to take.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExperienceInput {
    #[default]
    Absent,
    Text(String),
    Structured(Value),
}

/// Candidate profile as supplied by the caller. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub skills: SkillsInput,
    pub experience: ExperienceInput,
}

/// Canonical profile consumed by the scorers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedProfile {
    /// Deduplicated case-insensitively; spelling of the first occurrence is kept.
    pub skills: Vec<String>,
    pub experience_text: String,
}

fn strings_in(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

impl SkillsInput {
    pub fn from_value(value: &Value) -> Result<Self, ParseIssue> {
        match value {
            Value::Null => Ok(SkillsInput::Absent),
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.starts_with('[') || trimmed.starts_with('{') {
                    let decoded: Value = serde_json::from_str(trimmed)
                        .map_err(|e| ParseIssue::MalformedSkillsJson(e.to_string()))?;
                    Self::from_value(&decoded)
                } else {
                    Ok(SkillsInput::Flat(
                        trimmed
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ))
                }
            }
            Value::Array(items) if items.iter().any(Value::is_array) => Ok(SkillsInput::Nested(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => vec![s.clone()],
                        Value::Array(inner) => strings_in(inner),
                        _ => Vec::new(),
                    })
                    .filter(|group| !group.is_empty())
                    .collect(),
            )),
            Value::Array(items) => Ok(SkillsInput::Flat(strings_in(items))),
            Value::Object(map) => Ok(SkillsInput::Grouped(
                map.iter()
                    .filter_map(|(category, v)| {
                        v.as_array().map(|items| (category.clone(), strings_in(items)))
                    })
                    .collect(),
            )),
            Value::Bool(_) => Err(ParseIssue::UnsupportedSkillsShape("boolean")),
            Value::Number(_) => Err(ParseIssue::UnsupportedSkillsShape("number")),
        }
    }

    /// All skill strings in input order, flattened one level.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            SkillsInput::Absent => Vec::new(),
            SkillsInput::Flat(items) => items.iter().map(String::as_str).collect(),
            SkillsInput::Nested(groups) => groups.iter().flatten().map(String::as_str).collect(),
            SkillsInput::Grouped(map) => map.values().flatten().map(String::as_str).collect(),
        }
    }
}

impl ExperienceInput {
    pub fn from_value(value: &Value) -> Result<Self, ParseIssue> {
        match value {
            Value::Null => Ok(ExperienceInput::Absent),
            Value::String(s) => Ok(ExperienceInput::Text(s.clone())),
            Value::Object(_) => Ok(ExperienceInput::Structured(value.clone())),
            Value::Array(_) => Err(ParseIssue::UnsupportedExperienceShape("array")),
            Value::Bool(_) => Err(ParseIssue::UnsupportedExperienceShape("boolean")),
            Value::Number(_) => Err(ParseIssue::UnsupportedExperienceShape("number")),
        }
    }
}

/// Keys accepted for the experience / CV field; the first non-null one wins.
const EXPERIENCE_KEYS: &[&str] = &["experience", "cv", "cv_text", "resume"];

impl CandidateProfile {
    /// Never fails: unsupported shapes read as absent fields.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            debug!("candidate profile is not an object; treated as empty");
            return Self::default();
        };

        let skills = fields
            .get("skills")
            .map(|v| {
                SkillsInput::from_value(v).unwrap_or_else(|issue| {
                    debug!(%issue, "skills field treated as absent");
                    SkillsInput::Absent
                })
            })
            .unwrap_or_default();

        let experience = EXPERIENCE_KEYS
            .iter()
            .filter_map(|k| fields.get(*k))
            .find(|v| !v.is_null())
            .map(|v| {
                ExperienceInput::from_value(v).unwrap_or_else(|issue| {
                    debug!(%issue, "experience field treated as absent");
                    ExperienceInput::Absent
                })
            })
            .unwrap_or_default();

        Self { skills, experience }
    }
}

impl<'de> Deserialize<'de> for CandidateProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Explicit skills below this count are topped up from the CV's own `skills` field.
const EMBEDDED_SKILLS_THRESHOLD: usize = 5;

const WORK_KEYS: &[&str] = &["work_experience", "workExperience", "experience"];
const ROLE_TITLE_KEYS: &[&str] = &["title", "job_title", "jobTitle", "position", "role"];
const ROLE_DETAIL_KEYS: &[&str] = &["company", "description", "responsibilities"];
const EDUCATION_DETAIL_KEYS: &[&str] = &["degree", "field", "field_of_study"];
const SUMMARY_KEYS: &[&str] = &["summary", "objective", "professional_summary"];

#[derive(Debug, Default)]
struct SkillSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl SkillSet {
    fn extend<'a>(&mut self, skills: impl IntoIterator<Item = &'a str>) {
        for skill in skills {
            let trimmed = skill.trim();
            if trimmed.is_empty() {
                continue;
            }
            if self.seen.insert(trimmed.to_lowercase()) {
                self.items.push(trimmed.to_string());
            }
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Produces the canonical skill set and experience text. Never fails.
pub fn normalize_profile(profile: &CandidateProfile) -> NormalizedProfile {
    let mut skills = SkillSet::default();
    skills.extend(profile.skills.entries());

    let parsed = match &profile.experience {
        ExperienceInput::Text(raw) => parse_cv_json(raw).unwrap_or_else(|issue| {
            debug!(%issue, "keeping experience as raw text");
            None
        }),
        _ => None,
    };
    let cv = match &profile.experience {
        ExperienceInput::Structured(value) => Some(value),
        _ => parsed.as_ref(),
    };

    let experience_text = match (&profile.experience, cv) {
        (_, Some(cv)) => flatten_cv(cv),
        (ExperienceInput::Text(raw), None) => raw.clone(),
        _ => String::new(),
    };

    if skills.len() < EMBEDDED_SKILLS_THRESHOLD {
        if let Some(embedded) = cv.and_then(|cv| cv.get("skills")) {
            match SkillsInput::from_value(embedded) {
                Ok(extra) => skills.extend(extra.entries()),
                Err(issue) => debug!(%issue, "ignoring embedded CV skills"),
            }
        }
    }

    NormalizedProfile {
        skills: skills.items,
        experience_text,
    }
}

/// Decodes a JSON-encoded CV. `Ok(None)` when the text is not JSON-shaped at all.
fn parse_cv_json(raw: &str) -> Result<Option<Value>, ParseIssue> {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    serde_json::from_str::<Value>(trimmed)
        .map(Some)
        .map_err(|e| ParseIssue::MalformedExperienceJson(e.to_string()))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let joined = strings_in(items).join(" ");
            (!joined.trim().is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Concatenates the text-bearing fields of a parsed CV: roles, then education,
/// then summaries.
fn flatten_cv(cv: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(work) = WORK_KEYS.iter().find_map(|k| cv.get(*k)) {
        match work {
            Value::Array(roles) => {
                for role in roles {
                    if let Some(title) = ROLE_TITLE_KEYS
                        .iter()
                        .find_map(|k| role.get(*k).and_then(text_of))
                    {
                        parts.push(title);
                    }
                    parts.extend(
                        ROLE_DETAIL_KEYS
                            .iter()
                            .filter_map(|k| role.get(*k).and_then(text_of)),
                    );
                }
            }
            other => parts.extend(text_of(other)),
        }
    }

    if let Some(Value::Array(schools)) = cv.get("education") {
        for school in schools {
            parts.extend(
                EDUCATION_DETAIL_KEYS
                    .iter()
                    .filter_map(|k| school.get(*k).and_then(text_of)),
            );
        }
    }

    parts.extend(
        SUMMARY_KEYS
            .iter()
            .filter_map(|k| cv.get(*k).and_then(text_of)),
    );

    parts.join(" ")
}
