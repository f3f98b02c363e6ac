//! Score normalisation and result presentation.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuizId;

/// Final score of a submitted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
}

impl QuizResult {
    pub fn new(score: u32, total_questions: u32) -> Self {
        Self {
            score,
            total_questions,
        }
    }

    /// Qualitative tier, or `None` for an empty quiz.
    pub fn tier(&self) -> Option<Tier> {
        Tier::classify(self.score, self.total_questions)
    }

    /// `round(score / total * 100)`, or `None` for an empty quiz.
    pub fn percentage(&self) -> Option<u32> {
        percentage(self.score, self.total_questions)
    }
}

/// Qualitative performance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Perfect,
    Excellent,
    Good,
    NeedsImprovement,
}

impl Tier {
    /// Classify a score. Thresholds are evaluated with integer arithmetic so
    /// that e.g. 8/10 lands exactly on `Excellent`.
    pub fn classify(score: u32, total_questions: u32) -> Option<Tier> {
        if total_questions == 0 {
            return None;
        }
        let (score, total) = (u64::from(score), u64::from(total_questions));
        let tier = if score == total {
            Tier::Perfect
        } else if score * 10 >= total * 8 {
            Tier::Excellent
        } else if score * 10 >= total * 6 {
            Tier::Good
        } else {
            Tier::NeedsImprovement
        };
        Some(tier)
    }

    /// Message shown alongside the score.
    pub fn message(&self) -> &'static str {
        match self {
            Tier::Perfect => "Perfect score!",
            Tier::Excellent => "Excellent! Well done!",
            Tier::Good => "Good job! Keep practicing!",
            Tier::NeedsImprovement => "Keep learning! You can do better!",
        }
    }
}

/// Rounded percentage (half rounds up), `None` when `total_questions` is 0.
pub fn percentage(score: u32, total_questions: u32) -> Option<u32> {
    if total_questions == 0 {
        return None;
    }
    let (score, total) = (u64::from(score), u64::from(total_questions));
    let rounded = (score * 200 + total) / (total * 2);
    Some(u32::try_from(rounded).unwrap_or(u32::MAX))
}

/// Normalise a raw submission response into a score.
///
/// Reads the leading integer of the body (after trimming and removing a pair
/// of JSON string quotes). A body without a leading integer counts as 0, as
/// does a negative value.
pub fn normalize_score(raw: &str) -> u32 {
    let mut body = raw.trim();
    if body.len() >= 2 && body.starts_with('"') && body.ends_with('"') {
        body = body[1..body.len() - 1].trim();
    }

    let (negative, rest) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() {
        tracing::warn!(raw = %raw, "score response is not numeric, counting as 0");
        return 0;
    }
    if negative {
        tracing::warn!(raw = %raw, "negative score clamped to 0");
        return 0;
    }
    // Only overflow can fail here.
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// A completed attempt, ready for display or persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Quiz that was taken; lets a front end offer a retake.
    pub quiz_id: QuizId,
    /// Attempt this outcome belongs to.
    #[serde(default)]
    pub attempt_id: Uuid,
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub percentage: Option<u32>,
    #[serde(default)]
    pub tier: Option<Tier>,
    pub completed_at: DateTime<Utc>,
}

impl QuizOutcome {
    pub fn new(quiz_id: QuizId, attempt_id: Uuid, result: QuizResult) -> Self {
        Self {
            quiz_id,
            attempt_id,
            score: result.score,
            total_questions: result.total_questions,
            percentage: result.percentage(),
            tier: result.tier(),
            completed_at: Utc::now(),
        }
    }

    /// File name unique to this attempt: `result-<quiz>-<timestamp>-<attempt>.json`.
    pub fn file_name(&self) -> String {
        let timestamp = self.completed_at.format("%Y-%m-%dT%H%M%S");
        format!(
            "result-{}-{timestamp}-{}.json",
            self.quiz_id,
            self.attempt_id.simple()
        )
    }

    /// Save the outcome as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize outcome")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write outcome to {}", path.display()))?;
        Ok(())
    }

    /// Load an outcome from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read outcome from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse outcome JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_and_percentages_out_of_ten() {
        let cases = [
            (10, Tier::Perfect, 100),
            (8, Tier::Excellent, 80),
            (9, Tier::Excellent, 90),
            (6, Tier::Good, 60),
            (7, Tier::Good, 70),
            (5, Tier::NeedsImprovement, 50),
            (0, Tier::NeedsImprovement, 0),
        ];
        for (score, tier, pct) in cases {
            let result = QuizResult::new(score, 10);
            assert_eq!(result.tier(), Some(tier), "score {score}");
            assert_eq!(result.percentage(), Some(pct), "score {score}");
        }
    }

    #[test]
    fn zero_questions_has_no_tier() {
        let result = QuizResult::new(0, 0);
        assert_eq!(result.tier(), None);
        assert_eq!(result.percentage(), None);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), Some(33));
        assert_eq!(percentage(2, 3), Some(67));
        assert_eq!(percentage(1, 8), Some(13));
    }

    #[test]
    fn thresholds_are_inclusive_for_odd_totals() {
        // 4/5 = 0.8, 3/5 = 0.6
        assert_eq!(Tier::classify(4, 5), Some(Tier::Excellent));
        assert_eq!(Tier::classify(3, 5), Some(Tier::Good));
        assert_eq!(Tier::classify(2, 5), Some(Tier::NeedsImprovement));
    }

    #[test]
    fn score_above_total_is_not_perfect() {
        assert_eq!(Tier::classify(11, 10), Some(Tier::Excellent));
        assert_eq!(percentage(11, 10), Some(110));
    }

    #[test]
    fn normalize_numeric_bodies() {
        assert_eq!(normalize_score("7"), 7);
        assert_eq!(normalize_score(" 7\n"), 7);
        assert_eq!(normalize_score("\"7\""), 7);
        assert_eq!(normalize_score("+3"), 3);
        assert_eq!(normalize_score("7.9"), 7);
        assert_eq!(normalize_score("7 points"), 7);
    }

    #[test]
    fn normalize_malformed_bodies_to_zero() {
        assert_eq!(normalize_score(""), 0);
        assert_eq!(normalize_score("null"), 0);
        assert_eq!(normalize_score("{\"score\": 3}"), 0);
        assert_eq!(normalize_score("abc"), 0);
        assert_eq!(normalize_score("-4"), 0);
        assert_eq!(normalize_score("\""), 0);
    }

    #[test]
    fn normalize_saturates_on_overflow() {
        assert_eq!(normalize_score("99999999999999999999"), u32::MAX);
    }

    #[test]
    fn outcome_json_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("outcome.json");
        let attempt = Uuid::new_v4();
        let outcome = QuizOutcome::new(5, attempt, QuizResult::new(8, 10));
        outcome.save_json(&path).unwrap();

        let loaded = QuizOutcome::load_json(&path).unwrap();
        assert_eq!(loaded.quiz_id, 5);
        assert_eq!(loaded.attempt_id, attempt);
        assert_eq!(loaded.tier, Some(Tier::Excellent));
        assert_eq!(loaded.percentage, Some(80));
    }

    #[test]
    fn file_names_differ_between_attempts_in_the_same_second() {
        let first = QuizOutcome::new(5, Uuid::new_v4(), QuizResult::new(1, 2));
        let mut second = QuizOutcome::new(5, Uuid::new_v4(), QuizResult::new(2, 2));
        second.completed_at = first.completed_at;

        assert_ne!(first.file_name(), second.file_name());
        assert!(first.file_name().starts_with("result-5-"));
        assert!(first
            .file_name()
            .ends_with(&format!("{}.json", first.attempt_id.simple())));
    }
}
