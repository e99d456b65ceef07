//! Keyword Density Scorer: plain token overlap between experience and description.

use std::collections::HashSet;

/// Lowercases, strips everything but word characters and whitespace, splits on
/// whitespace and keeps tokens longer than `min_len` characters.
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > min_len)
        .map(str::to_string)
        .collect()
}

/// `round(matches / description_tokens × max)`. Description tokens are counted with
/// repetition; candidate tokens form a set.
pub fn keyword_density(experience: &str, description: &str, min_len: usize, max: u32) -> u32 {
    let job_tokens = tokenize(description, min_len);
    if job_tokens.is_empty() {
        return 0;
    }
    let candidate: HashSet<String> = tokenize(experience, min_len).into_iter().collect();
    let matches = job_tokens.iter().filter(|t| candidate.contains(*t)).count();
    ((matches as f64 / job_tokens.len() as f64) * f64::from(max)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_short_tokens() {
        let tokens = tokenize("Built: data-pipelines, APIs & dashboards!", 4);
        assert_eq!(tokens, vec!["built", "datapipelines", "dashboards"]);
    }

    #[test]
    fn test_empty_description_scores_zero() {
        assert_eq!(keyword_density("anything at all", "", 4, 10), 0);
        assert_eq!(keyword_density("anything at all", "a an the", 4, 10), 0);
    }

    #[test]
    fn test_duplicates_in_description_counted() {
        let score = keyword_density("kafka streaming", "kafka kafka spark flink", 4, 10);
        // kafka twice out of four description tokens.
        assert_eq!(score, 5);
    }

    #[test]
    fn test_full_overlap_scores_max() {
        assert_eq!(
            keyword_density("roadmap strategy", "Roadmap, strategy.", 4, 10),
            10
        );
    }
}
