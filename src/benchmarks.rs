use crate::session::attempt::{SubSkill, Subject};

/// Target seconds per question by subject, in `Subject` declaration order
/// (verbal, math, reading, language).
pub const SUBJECT_BENCHMARKS: [f64; 4] = [40.0, 60.0, 65.0, 30.0];

/// A wrong answer submitted in less than benchmark × this fraction is rushed.
pub const RUSHING_THRESHOLD: f64 = 0.5;
/// A wrong answer submitted in more than benchmark × this multiple is overthought.
pub const OVERTHINKING_THRESHOLD: f64 = 2.0;

/// Session-level pacing cutoffs: total actual / total benchmark time.
pub const PACE_RUSHING_RATIO: f64 = 0.7;
pub const PACE_SLOW_RATIO: f64 = 1.3;

pub fn subject_benchmark(subject: Subject) -> f64 {
    SUBJECT_BENCHMARKS[subject as usize]
}

/// Subskill-specific target where one is defined, otherwise the subject
/// default. Never fails: every subskill has a subject to fall back to.
pub fn benchmark_for(subject: Subject, sub_skill: SubSkill) -> f64 {
    subskill_benchmark(sub_skill).unwrap_or_else(|| subject_benchmark(subject))
}

fn subskill_benchmark(sub_skill: SubSkill) -> Option<f64> {
    match sub_skill {
        SubSkill::Logic => Some(50.0),
        SubSkill::WordProblem => Some(90.0),
        SubSkill::Geometry => Some(75.0),
        SubSkill::Comprehension => Some(70.0),
        SubSkill::Inference => Some(60.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_do_not_overlap() {
        for subject in Subject::ALL {
            let b = subject_benchmark(subject);
            assert!(b > 0.0);
            assert!(b * RUSHING_THRESHOLD < b * OVERTHINKING_THRESHOLD);
        }
    }

    #[test]
    fn test_subskill_override_beats_subject() {
        assert_eq!(benchmark_for(Subject::Verbal, SubSkill::Logic), 50.0);
        assert_eq!(benchmark_for(Subject::Math, SubSkill::WordProblem), 90.0);
    }

    #[test]
    fn test_missing_subskill_falls_back_to_subject() {
        assert_eq!(benchmark_for(Subject::Verbal, SubSkill::Analogy), 40.0);
        assert_eq!(benchmark_for(Subject::Math, SubSkill::Arithmetic), 60.0);
        assert_eq!(benchmark_for(Subject::Language, SubSkill::Grammar), 30.0);
    }
}
