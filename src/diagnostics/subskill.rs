use serde::{Deserialize, Serialize};

use crate::benchmarks::benchmark_for;
use crate::diagnostics::section::ErrorBreakdown;
use crate::session::attempt::{QuestionAttempt, SubSkill, Subject};

const WEAK_ACCURACY: f64 = 60.0;
const STRONG_ACCURACY: f64 = 80.0;
const FLAG_MIN_ATTEMPTS: usize = 3;
const RANK_MIN_ATTEMPTS: usize = 2;
const TOP_LIST_LEN: usize = 3;
const STRONG_LIST_FLOOR: f64 = 70.0;

/// Dominant error category for a subskill: the largest bucket if it holds
/// more than half the errors, otherwise mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DominantError {
    ContentGap,
    Rushing,
    Overthinking,
    Mixed,
    None,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubSkillDiagnostic {
    pub sub_skill: SubSkill,
    pub subject: Subject,
    pub label: String,
    pub attempted: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_time: f64,
    pub recommended_time: f64,
    pub error_type: DominantError,
    pub error_breakdown: ErrorBreakdown,
    pub is_weak: bool,
    pub is_strong: bool,
}

/// One diagnostic per subskill with at least one attempt. Ordered by first
/// appearance in the attempt list, so reruns over the same session are
/// byte-identical.
pub fn subskill_diagnostics(attempts: &[QuestionAttempt]) -> Vec<SubSkillDiagnostic> {
    let mut order: Vec<SubSkill> = Vec::new();
    for a in attempts {
        if !order.contains(&a.sub_skill) {
            order.push(a.sub_skill);
        }
    }

    order
        .into_iter()
        .map(|sub_skill| {
            let group: Vec<&QuestionAttempt> = attempts
                .iter()
                .filter(|a| a.sub_skill == sub_skill)
                .collect();
            let attempted = group.len();
            let correct = group.iter().filter(|a| a.is_correct).count();
            let accuracy = correct as f64 / attempted as f64 * 100.0;
            let avg_time =
                group.iter().map(|a| a.time_spent).sum::<f64>() / attempted as f64;
            let subject = group[0].subject;
            let error_breakdown = ErrorBreakdown::from_attempts(&group);

            SubSkillDiagnostic {
                sub_skill,
                subject,
                label: sub_skill.label().to_string(),
                attempted,
                correct,
                accuracy,
                avg_time,
                recommended_time: benchmark_for(subject, sub_skill),
                error_type: dominant_error(&error_breakdown),
                error_breakdown,
                is_weak: accuracy < WEAK_ACCURACY && attempted >= FLAG_MIN_ATTEMPTS,
                is_strong: accuracy >= STRONG_ACCURACY && attempted >= FLAG_MIN_ATTEMPTS,
            }
        })
        .collect()
}

fn dominant_error(breakdown: &ErrorBreakdown) -> DominantError {
    let total = breakdown.total();
    if total == 0 {
        return DominantError::None;
    }

    let max = breakdown
        .content_gaps
        .max(breakdown.rushing_errors)
        .max(breakdown.overthinking_errors);
    let half = total as f64 * 0.5;

    if max == breakdown.content_gaps && breakdown.content_gaps as f64 > half {
        DominantError::ContentGap
    } else if max == breakdown.rushing_errors && breakdown.rushing_errors as f64 > half {
        DominantError::Rushing
    } else if max == breakdown.overthinking_errors && breakdown.overthinking_errors as f64 > half {
        DominantError::Overthinking
    } else {
        DominantError::Mixed
    }
}

/// Lowest-accuracy subskills with enough attempts to rank, worst first.
pub fn top_weak_skills(skills: &[SubSkillDiagnostic]) -> Vec<SubSkillDiagnostic> {
    let mut ranked: Vec<&SubSkillDiagnostic> = skills
        .iter()
        .filter(|s| s.attempted >= RANK_MIN_ATTEMPTS)
        .collect();
    ranked.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    ranked.into_iter().take(TOP_LIST_LEN).cloned().collect()
}

/// Highest-accuracy subskills at or above 70%, best first.
pub fn top_strong_skills(skills: &[SubSkillDiagnostic]) -> Vec<SubSkillDiagnostic> {
    let mut ranked: Vec<&SubSkillDiagnostic> = skills
        .iter()
        .filter(|s| s.attempted >= RANK_MIN_ATTEMPTS && s.accuracy >= STRONG_LIST_FLOOR)
        .collect();
    ranked.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    ranked.into_iter().take(TOP_LIST_LEN).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testutil::attempt;

    fn skill(sub_skill: SubSkill, is_correct: bool, time_spent: f64) -> QuestionAttempt {
        attempt(sub_skill.subject(), sub_skill, is_correct, time_spent)
    }

    #[test]
    fn test_groups_finer_than_subject() {
        let attempts = vec![
            skill(SubSkill::Analogy, true, 30.0),
            skill(SubSkill::Synonym, false, 30.0),
            skill(SubSkill::Analogy, false, 30.0),
        ];
        let diags = subskill_diagnostics(&attempts);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].sub_skill, SubSkill::Analogy);
        assert_eq!(diags[0].attempted, 2);
        assert_eq!(diags[1].sub_skill, SubSkill::Synonym);
    }

    #[test]
    fn test_recommended_time_uses_subskill_override() {
        let attempts = vec![skill(SubSkill::WordProblem, true, 80.0)];
        let diags = subskill_diagnostics(&attempts);
        assert_eq!(diags[0].recommended_time, 90.0);
    }

    #[test]
    fn test_dominant_error_requires_majority() {
        // 2 rushing vs 1 content gap vs 1 overthinking: 2 of 4 is not > 50%
        let attempts = vec![
            skill(SubSkill::Arithmetic, false, 10.0),
            skill(SubSkill::Arithmetic, false, 12.0),
            skill(SubSkill::Arithmetic, false, 60.0),
            skill(SubSkill::Arithmetic, false, 130.0),
        ];
        let diags = subskill_diagnostics(&attempts);
        assert_eq!(diags[0].error_type, DominantError::Mixed);

        // 3 of 4 rushing is a clear majority
        let attempts = vec![
            skill(SubSkill::Arithmetic, false, 10.0),
            skill(SubSkill::Arithmetic, false, 12.0),
            skill(SubSkill::Arithmetic, false, 14.0),
            skill(SubSkill::Arithmetic, false, 60.0),
        ];
        let diags = subskill_diagnostics(&attempts);
        assert_eq!(diags[0].error_type, DominantError::Rushing);
    }

    #[test]
    fn test_no_errors_is_none() {
        let attempts = vec![skill(SubSkill::Grammar, true, 25.0)];
        assert_eq!(subskill_diagnostics(&attempts)[0].error_type, DominantError::None);
    }

    #[test]
    fn test_weak_and_strong_flags_need_three_attempts() {
        let two = vec![
            skill(SubSkill::Algebra, false, 60.0),
            skill(SubSkill::Algebra, false, 60.0),
        ];
        assert!(!subskill_diagnostics(&two)[0].is_weak);

        let three = vec![
            skill(SubSkill::Algebra, false, 60.0),
            skill(SubSkill::Algebra, false, 60.0),
            skill(SubSkill::Algebra, true, 60.0),
        ];
        let diag = &subskill_diagnostics(&three)[0];
        assert!(diag.is_weak);
        assert!(!diag.is_strong);
    }

    #[test]
    fn test_top_weak_ranked_ascending_with_two_attempt_floor() {
        let mut attempts = vec![skill(SubSkill::Geometry, false, 70.0)];
        for i in 0..4 {
            attempts.push(skill(SubSkill::Analogy, i < 1, 30.0)); // 25%
        }
        for i in 0..4 {
            attempts.push(skill(SubSkill::Grammar, i < 2, 25.0)); // 50%
        }
        for i in 0..4 {
            attempts.push(skill(SubSkill::Synonym, i < 3, 30.0)); // 75%
        }

        let diags = subskill_diagnostics(&attempts);
        let weak = top_weak_skills(&diags);
        // single-attempt geometry is excluded from ranking entirely
        assert_eq!(weak.len(), 3);
        assert_eq!(weak[0].sub_skill, SubSkill::Analogy);
        assert_eq!(weak[1].sub_skill, SubSkill::Grammar);
        assert_eq!(weak[2].sub_skill, SubSkill::Synonym);
    }

    #[test]
    fn test_top_strong_filters_below_seventy() {
        let mut attempts = Vec::new();
        for i in 0..4 {
            attempts.push(skill(SubSkill::Analogy, i < 2, 30.0)); // 50%
        }
        for i in 0..4 {
            attempts.push(skill(SubSkill::Grammar, i < 3, 25.0)); // 75%
        }
        for _ in 0..4 {
            attempts.push(skill(SubSkill::Synonym, true, 30.0)); // 100%
        }

        let diags = subskill_diagnostics(&attempts);
        let strong = top_strong_skills(&diags);
        assert_eq!(strong.len(), 2);
        assert_eq!(strong[0].sub_skill, SubSkill::Synonym);
        assert_eq!(strong[1].sub_skill, SubSkill::Grammar);
    }
}
