use serde::{Deserialize, Serialize};

use crate::benchmarks::{
    PACE_RUSHING_RATIO, PACE_SLOW_RATIO, RUSHING_THRESHOLD, subject_benchmark,
};
use crate::session::attempt::{QuestionAttempt, Subject};

/// Ratio of a wrong answer's time to its subject benchmark above which the
/// fast/slow buckets call it slow. Deliberately 1.5 rather than the
/// classifier's 2.0 overthinking multiple: the buckets are an independent
/// recomputation from raw times, not a readback of stored mistake types.
const SLOW_BUCKET_RATIO: f64 = 1.5;

/// Accuracy-point drop between first and last third that flips `has_fatigue`.
const FATIGUE_DROP: f64 = 10.0;

/// Three-tier stamina cutoffs (distinct from the fatigue indicator).
const STAMINA_FATIGUED_DROP: f64 = 15.0;
const STAMINA_MODERATE_DROP: f64 = 8.0;
const STAMINA_MIN_ATTEMPTS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingStatus {
    OnPace,
    Rushing,
    Slow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaminaStatus {
    Strong,
    Moderate,
    Fatigued,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectTiming {
    pub subject: Subject,
    pub attempted: usize,
    pub avg_time: f64,
}

/// Timing aggregates for one session's attempt list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingAnalysis {
    pub avg_time_per_question: f64,
    pub subject_timings: Vec<SubjectTiming>,
    pub questions_over_pace: usize,
    pub percent_over_pace: f64,
    pub first_third_accuracy: f64,
    pub last_third_accuracy: f64,
    pub first_third_avg_time: f64,
    pub last_third_avg_time: f64,
    pub has_fatigue: bool,
    pub fast_correct: usize,
    pub fast_incorrect: usize,
    pub slow_correct: usize,
    pub slow_incorrect: usize,
}

impl PacingAnalysis {
    pub fn from_attempts(attempts: &[QuestionAttempt]) -> Self {
        let total = attempts.len();
        let total_time: f64 = attempts.iter().map(|a| a.time_spent).sum();
        let avg_time_per_question = if total > 0 {
            total_time / total as f64
        } else {
            0.0
        };

        let subject_timings = Subject::ALL
            .iter()
            .filter_map(|&subject| {
                let times: Vec<f64> = attempts
                    .iter()
                    .filter(|a| a.subject == subject)
                    .map(|a| a.time_spent)
                    .collect();
                if times.is_empty() {
                    return None;
                }
                Some(SubjectTiming {
                    subject,
                    attempted: times.len(),
                    avg_time: times.iter().sum::<f64>() / times.len() as f64,
                })
            })
            .collect();

        let questions_over_pace = attempts
            .iter()
            .filter(|a| a.time_spent > subject_benchmark(a.subject))
            .count();
        let percent_over_pace = if total > 0 {
            questions_over_pace as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let (first, last) = thirds(attempts);
        let first_third_accuracy = accuracy_of(first);
        let last_third_accuracy = accuracy_of(last);
        let has_fatigue = last_third_accuracy < first_third_accuracy - FATIGUE_DROP;

        // Fast/slow buckets recomputed from raw time ratios. Intentionally
        // independent of the stored mistake_type field (cross-validation for
        // the pattern detector).
        let mut fast_correct = 0;
        let mut fast_incorrect = 0;
        let mut slow_correct = 0;
        let mut slow_incorrect = 0;
        for a in attempts {
            let benchmark = subject_benchmark(a.subject);
            if a.is_correct {
                if a.time_spent < benchmark {
                    fast_correct += 1;
                } else if a.time_spent > benchmark {
                    slow_correct += 1;
                }
            } else {
                if a.time_spent < benchmark * RUSHING_THRESHOLD {
                    fast_incorrect += 1;
                } else if a.time_spent > benchmark * SLOW_BUCKET_RATIO {
                    slow_incorrect += 1;
                }
            }
        }

        Self {
            avg_time_per_question,
            subject_timings,
            questions_over_pace,
            percent_over_pace,
            first_third_accuracy,
            last_third_accuracy,
            first_third_avg_time: avg_time_of(first),
            last_third_avg_time: avg_time_of(last),
            has_fatigue,
            fast_correct,
            fast_incorrect,
            slow_correct,
            slow_incorrect,
        }
    }
}

/// First and last floor(n/3) attempts; middle third ignored. Both empty when
/// n < 3.
pub fn thirds(attempts: &[QuestionAttempt]) -> (&[QuestionAttempt], &[QuestionAttempt]) {
    let third = attempts.len() / 3;
    (&attempts[..third], &attempts[attempts.len() - third..])
}

/// Percent correct; empty group is 0 by convention.
pub fn accuracy_of(attempts: &[QuestionAttempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let correct = attempts.iter().filter(|a| a.is_correct).count();
    correct as f64 / attempts.len() as f64 * 100.0
}

fn avg_time_of(attempts: &[QuestionAttempt]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    attempts.iter().map(|a| a.time_spent).sum::<f64>() / attempts.len() as f64
}

/// Session-level pacing signal: total actual time vs total benchmark time.
/// Coarser than per-attempt mistake classification and computed separately.
pub fn pacing_status(attempts: &[QuestionAttempt]) -> PacingStatus {
    if attempts.is_empty() {
        return PacingStatus::OnPace;
    }

    let total_actual: f64 = attempts.iter().map(|a| a.time_spent).sum();
    let total_benchmark: f64 = attempts.iter().map(|a| subject_benchmark(a.subject)).sum();

    let ratio = total_actual / total_benchmark;
    if ratio < PACE_RUSHING_RATIO {
        PacingStatus::Rushing
    } else if ratio > PACE_SLOW_RATIO {
        PacingStatus::Slow
    } else {
        PacingStatus::OnPace
    }
}

/// Three-tier stamina signal over the same thirds split as the fatigue
/// indicator, with its own cutoffs. Short sessions read as strong.
pub fn stamina_status(attempts: &[QuestionAttempt]) -> StaminaStatus {
    if attempts.len() < STAMINA_MIN_ATTEMPTS {
        return StaminaStatus::Strong;
    }

    let (first, last) = thirds(attempts);
    let drop = accuracy_of(first) - accuracy_of(last);

    if drop > STAMINA_FATIGUED_DROP {
        StaminaStatus::Fatigued
    } else if drop > STAMINA_MODERATE_DROP {
        StaminaStatus::Moderate
    } else {
        StaminaStatus::Strong
    }
}
