use serde::{Deserialize, Serialize};

use crate::diagnostics::pacing::{self, PacingAnalysis, PacingStatus};
use crate::diagnostics::subskill::{DominantError, SubSkillDiagnostic};
use crate::session::attempt::{QuestionAttempt, SubSkill, Subject};

const RULE_GAP_MIN_ATTEMPTS: usize = 3;
const RULE_GAP_MAX_ACCURACY: f64 = 50.0;
const PACING_MIN_ERRORS: usize = 2;
const STAMINA_MIN_ATTEMPTS: usize = 20;
const STAMINA_MIN_DROP: f64 = 10.0;
const STAMINA_HIGH_DROP: f64 = 20.0;
const ERROR_SHARE_MIN_INCORRECT: usize = 5;
const ERROR_SHARE_CUTOFF: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternType {
    RuleGap,
    Pacing,
    Stamina,
    AccuracyTime,
    Consistency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Which detection rule fired. Lets downstream consumers (the action plan)
/// react without parsing titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    SubSkillRuleGap,
    SubSkillRushing,
    SubSkillOverthinking,
    StaminaDrop,
    FastErrors,
    SlowErrors,
    AccurateButSlow,
    FastButInaccurate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternInsight {
    pub pattern_type: PatternType,
    pub kind: PatternKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub affected_sub_skill: Option<SubSkill>,
    pub affected_subject: Option<Subject>,
}

/// Scan aggregated diagnostics for notable behavioral patterns. Every rule
/// is evaluated independently; all that apply fire. Results come back sorted
/// by severity (stable among ties); the report truncates to its display cap.
pub fn detect_patterns(
    attempts: &[QuestionAttempt],
    skills: &[SubSkillDiagnostic],
    analysis: &PacingAnalysis,
    overall_accuracy: f64,
    pacing_status: PacingStatus,
) -> Vec<PatternInsight> {
    let mut patterns = Vec::new();

    for skill in skills {
        if skill.attempted >= RULE_GAP_MIN_ATTEMPTS
            && skill.accuracy < RULE_GAP_MAX_ACCURACY
            && skill.error_type == DominantError::ContentGap
        {
            let incorrect = skill.attempted - skill.correct;
            patterns.push(PatternInsight {
                pattern_type: PatternType::RuleGap,
                kind: PatternKind::SubSkillRuleGap,
                severity: Severity::High,
                title: format!("{} Needs Focus", skill.label),
                description: format!(
                    "You missed {incorrect} of {} {} questions, even when taking \
                     sufficient time. This indicates a knowledge gap that practice \
                     can fix.",
                    skill.attempted,
                    skill.label.to_lowercase()
                ),
                affected_sub_skill: Some(skill.sub_skill),
                affected_subject: Some(skill.subject),
            });
        }

        if skill.attempted >= RULE_GAP_MIN_ATTEMPTS
            && skill.error_breakdown.rushing_errors >= PACING_MIN_ERRORS
        {
            patterns.push(PatternInsight {
                pattern_type: PatternType::Pacing,
                kind: PatternKind::SubSkillRushing,
                severity: Severity::Medium,
                title: format!("Rushing on {}", skill.label),
                description: format!(
                    "{} errors in {} came from rushing. Aim for at least {}s per \
                     question.",
                    skill.error_breakdown.rushing_errors,
                    skill.label.to_lowercase(),
                    (skill.recommended_time * 0.7).round()
                ),
                affected_sub_skill: Some(skill.sub_skill),
                affected_subject: None,
            });
        }

        if skill.attempted >= RULE_GAP_MIN_ATTEMPTS
            && skill.error_breakdown.overthinking_errors >= PACING_MIN_ERRORS
        {
            patterns.push(PatternInsight {
                pattern_type: PatternType::Pacing,
                kind: PatternKind::SubSkillOverthinking,
                severity: Severity::Medium,
                title: format!("Overthinking {}", skill.label),
                description: format!(
                    "You're spending too much time on {} questions. Trust your \
                     instinct and move on after {}s.",
                    skill.label.to_lowercase(),
                    skill.recommended_time.round()
                ),
                affected_sub_skill: Some(skill.sub_skill),
                affected_subject: None,
            });
        }
    }

    if attempts.len() >= STAMINA_MIN_ATTEMPTS {
        let (first, last) = pacing::thirds(attempts);
        let drop = pacing::accuracy_of(first) - pacing::accuracy_of(last);
        if drop > STAMINA_MIN_DROP {
            let drop_question = (attempts.len() as f64 * 0.66).floor() as usize;
            patterns.push(PatternInsight {
                pattern_type: PatternType::Stamina,
                kind: PatternKind::StaminaDrop,
                severity: if drop > STAMINA_HIGH_DROP {
                    Severity::High
                } else {
                    Severity::Medium
                },
                title: "Accuracy Drops Late in Test".to_string(),
                description: format!(
                    "Accuracy drops by {}% after Question {drop_question}, \
                     indicating stamina fatigue. Build endurance with timed \
                     practice sessions.",
                    drop.round()
                ),
                affected_sub_skill: None,
                affected_subject: None,
            });
        }
    }

    // Speed vs accuracy correlation, from the independently recomputed
    // fast/slow buckets (0.5/1.5 ratios, not the classifier's 0.5/2.0).
    let incorrect_total = attempts.iter().filter(|a| !a.is_correct).count();
    if incorrect_total >= ERROR_SHARE_MIN_INCORRECT {
        let share = |count: usize| count as f64 / incorrect_total as f64;
        if share(analysis.fast_incorrect) > ERROR_SHARE_CUTOFF {
            patterns.push(PatternInsight {
                pattern_type: PatternType::AccuracyTime,
                kind: PatternKind::FastErrors,
                severity: Severity::High,
                title: "Speed Causing Errors".to_string(),
                description: format!(
                    "{}% of your mistakes happen when you rush. Slow down and \
                     read questions carefully.",
                    (share(analysis.fast_incorrect) * 100.0).round()
                ),
                affected_sub_skill: None,
                affected_subject: None,
            });
        }
        if share(analysis.slow_incorrect) > ERROR_SHARE_CUTOFF {
            patterns.push(PatternInsight {
                pattern_type: PatternType::AccuracyTime,
                kind: PatternKind::SlowErrors,
                severity: Severity::Medium,
                title: "Overthinking Causing Errors".to_string(),
                description: format!(
                    "{}% of mistakes happen on questions where you spent extra \
                     time. First instincts are often correct.",
                    (share(analysis.slow_incorrect) * 100.0).round()
                ),
                affected_sub_skill: None,
                affected_subject: None,
            });
        }
    }

    if overall_accuracy >= 75.0 && pacing_status == PacingStatus::Slow {
        patterns.push(PatternInsight {
            pattern_type: PatternType::Pacing,
            kind: PatternKind::AccurateButSlow,
            severity: Severity::Medium,
            title: "Good Accuracy, Needs Speed".to_string(),
            description: "Your accuracy is strong, but you may run out of time on \
                          full tests. Practice with stricter time limits."
                .to_string(),
            affected_sub_skill: None,
            affected_subject: None,
        });
    }

    if overall_accuracy < 60.0 && pacing_status == PacingStatus::Rushing {
        patterns.push(PatternInsight {
            pattern_type: PatternType::Pacing,
            kind: PatternKind::FastButInaccurate,
            severity: Severity::High,
            title: "Slow Down for Better Accuracy".to_string(),
            description: "You have time to spare but accuracy is suffering. Take \
                          an extra 10-15 seconds per question to read carefully."
                .to_string(),
            affected_sub_skill: None,
            affected_subject: None,
        });
    }

    // Stable sort keeps rule order among equal severities.
    patterns.sort_by_key(|p| p.severity);
    patterns
}
