use crate::error::{Error, Result};

pub const ANSWER_COUNT: usize = 30;

/// Reference key for the fixed 30-question test. Index = question position,
/// value = correct option (0..=4).
const ANSWER_KEY: [i64; ANSWER_COUNT] = [
    1, 2, 3, 1, 4, 3, 2, 0, 1, 1, 1, 1, 1, 2, 2, 4, 2, 1, 1, 1, 0, 0, 3, 1, 1, 1, 1, 3, 0, 0,
];

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: i64,
    pub level: &'static str,
    pub correct_count: i64,
    pub percentage: f64,
}

pub struct ScoringService;

impl ScoringService {
    /// Grades a full answer sheet. Pure and deterministic: same answers,
    /// same result.
    pub fn score(answers: &[i64]) -> Result<ScoreResult> {
        if answers.len() != ANSWER_COUNT {
            return Err(Error::BadRequest(format!(
                "expected {} answers, got {}",
                ANSWER_COUNT,
                answers.len()
            )));
        }
        for (i, &answer) in answers.iter().enumerate() {
            if !(0..=4).contains(&answer) {
                return Err(Error::BadRequest(format!(
                    "invalid answer at position {}: {} (must be an integer between 0 and 4)",
                    i, answer
                )));
            }
        }

        let correct_count = answers
            .iter()
            .zip(ANSWER_KEY.iter())
            .filter(|(a, k)| a == k)
            .count() as i64;
        let percentage = correct_count as f64 / ANSWER_COUNT as f64 * 100.0;

        let raw = if percentage >= 95.0 {
            145.0 + (percentage - 95.0) * 2.0
        } else if percentage >= 85.0 {
            130.0 + (percentage - 85.0) * 1.5
        } else if percentage >= 70.0 {
            115.0 + (percentage - 70.0) * 1.0
        } else if percentage >= 50.0 {
            100.0 + (percentage - 50.0) * 0.75
        } else if percentage >= 30.0 {
            85.0 + (percentage - 30.0) * 0.75
        } else {
            70.0 + percentage * 0.5
        };
        let score = (raw as i64).clamp(50, 200);

        Ok(ScoreResult {
            score,
            level: level_for(score),
            correct_count,
            percentage,
        })
    }
}

fn level_for(score: i64) -> &'static str {
    if score >= 140 {
        "Genius"
    } else if score >= 130 {
        "Gifted"
    } else if score >= 115 {
        "Above Average"
    } else if score >= 85 {
        "Average"
    } else {
        "Below Average"
    }
}
