use serde::{Deserialize, Serialize};

use crate::diagnostics::patterns::{PatternInsight, PatternKind, PatternType};
use crate::diagnostics::subskill::{DominantError, SubSkillDiagnostic};
use crate::session::attempt::{SubSkill, Subject};

const DEFAULT_MINUTES_PER_DAY: u32 = 15;
const RUSHING_MINUTES_PER_DAY: u32 = 10;
const MAX_GUIDANCE_LINES: usize = 4;
const MAX_PRIORITY_SKILLS: usize = 3;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionPlanItem {
    pub priority: u32,
    pub subject: Subject,
    pub sub_skill: SubSkill,
    pub label: String,
    pub minutes_per_day: u32,
    pub drill_type: String,
    pub max_seconds_per_question: u32,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionPlan {
    pub priority_skills: Vec<ActionPlanItem>,
    pub pacing_guidance: Vec<String>,
    pub daily_total_minutes: u32,
    pub summary: String,
}

/// Turn the top weak subskills and detected patterns into a daily practice
/// prescription.
pub fn synthesize(weak_skills: &[SubSkillDiagnostic], patterns: &[PatternInsight]) -> ActionPlan {
    let mut priority_skills = Vec::new();
    let mut pacing_guidance: Vec<String> = Vec::new();

    for (index, skill) in weak_skills.iter().take(MAX_PRIORITY_SKILLS).enumerate() {
        let mut minutes_per_day = DEFAULT_MINUTES_PER_DAY;
        let question_count = if skill.attempted <= 10 { 10 } else { 15 };
        let lower = skill.label.to_lowercase();
        let recommended = skill.recommended_time.round();
        let mut drill_type = format!("{question_count} {lower} questions");

        match skill.error_type {
            DominantError::Rushing => {
                drill_type.push_str(" with focus on careful reading");
                minutes_per_day = RUSHING_MINUTES_PER_DAY;
            }
            DominantError::Overthinking => {
                drill_type.push_str(&format!(" under {recommended}s each"));
                pacing_guidance.push(format!(
                    "Cap {lower} at {recommended}s; skip and return after {}s",
                    (skill.recommended_time * 1.5).round()
                ));
            }
            _ => drill_type.push_str(" with answer explanations review"),
        }

        let reason = if skill.accuracy < 50.0 {
            format!(
                "Only {}% accuracy needs improvement",
                skill.accuracy.round()
            )
        } else {
            format!(
                "Moderate accuracy ({}%) can be improved",
                skill.accuracy.round()
            )
        };

        priority_skills.push(ActionPlanItem {
            priority: index as u32 + 1,
            subject: skill.subject,
            sub_skill: skill.sub_skill,
            label: skill.label.clone(),
            minutes_per_day,
            drill_type,
            max_seconds_per_question: recommended as u32,
            reason,
        });
    }

    let speed_caused = patterns
        .iter()
        .any(|p| matches!(p.kind, PatternKind::SubSkillRushing | PatternKind::FastErrors));
    if speed_caused {
        pacing_guidance.push("Add 10-15 seconds to your average question time".to_string());
        pacing_guidance.push("Read each question twice before selecting an answer".to_string());
    }

    let overthinking = patterns.iter().any(|p| {
        matches!(
            p.kind,
            PatternKind::SubSkillOverthinking | PatternKind::SlowErrors
        )
    });
    if overthinking {
        pacing_guidance.push("Mark difficult questions and return to them".to_string());
        pacing_guidance.push("Trust your first instinct on questions you understand".to_string());
    }

    if patterns.iter().any(|p| p.pattern_type == PatternType::Stamina) {
        pacing_guidance
            .push("Practice with full-length timed sessions to build endurance".to_string());
        pacing_guidance.push("Take brief mental pauses every 25-30 questions".to_string());
    }

    pacing_guidance.dedup();
    pacing_guidance.truncate(MAX_GUIDANCE_LINES);

    let daily_total_minutes = priority_skills.iter().map(|s| s.minutes_per_day).sum();

    let summary = if priority_skills.is_empty() {
        "No weak areas right now — keep up the good work!".to_string()
    } else {
        let mut lines = vec!["Next focus:".to_string()];
        for skill in &priority_skills {
            lines.push(format!(
                "{}. {} – {} ({} min/day)",
                skill.priority,
                skill.subject.label(),
                skill.label.to_lowercase(),
                skill.minutes_per_day
            ));
        }
        lines.join("\n")
    };

    ActionPlan {
        priority_skills,
        pacing_guidance,
        daily_total_minutes,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::pacing::{PacingAnalysis, pacing_status};
    use crate::diagnostics::patterns::detect_patterns;
    use crate::diagnostics::subskill::{subskill_diagnostics, top_weak_skills};
    use crate::diagnostics::testutil::attempt;
    use crate::session::attempt::QuestionAttempt;

    fn plan_for(attempts: &[QuestionAttempt]) -> ActionPlan {
        let skills = subskill_diagnostics(attempts);
        let analysis = PacingAnalysis::from_attempts(attempts);
        let accuracy = crate::diagnostics::pacing::accuracy_of(attempts);
        let patterns =
            detect_patterns(attempts, &skills, &analysis, accuracy, pacing_status(attempts));
        let weak: Vec<_> = top_weak_skills(&skills)
            .into_iter()
            .filter(|s| s.is_weak)
            .collect();
        synthesize(&weak, &patterns)
    }

    fn drill(sub_skill: SubSkill, is_correct: bool, time_spent: f64) -> QuestionAttempt {
        attempt(sub_skill.subject(), sub_skill, is_correct, time_spent)
    }

    #[test]
    fn test_no_weak_skills_degenerate_case() {
        let attempts: Vec<_> = (0..10).map(|_| drill(SubSkill::Arithmetic, true, 50.0)).collect();
        let plan = plan_for(&attempts);
        assert!(plan.priority_skills.is_empty());
        assert_eq!(plan.daily_total_minutes, 0);
        assert!(plan.summary.contains("keep up the good work"));
    }

    #[test]
    fn test_rushing_skill_gets_shorter_daily_budget() {
        // 4 rushed analogy errors: weak, dominant error rushing
        let attempts: Vec<_> = (0..4).map(|_| drill(SubSkill::Analogy, false, 10.0)).collect();
        let plan = plan_for(&attempts);
        assert_eq!(plan.priority_skills.len(), 1);

        let item = &plan.priority_skills[0];
        assert_eq!(item.minutes_per_day, 10);
        assert!(item.drill_type.contains("careful reading"));
        assert_eq!(item.max_seconds_per_question, 40);
        assert!(item.reason.contains("needs improvement"));
        assert_eq!(plan.daily_total_minutes, 10);
    }

    #[test]
    fn test_overthinking_skill_adds_cap_guidance() {
        let attempts: Vec<_> = (0..4)
            .map(|i| drill(SubSkill::Arithmetic, i < 1, 130.0))
            .collect();
        let plan = plan_for(&attempts);

        let item = &plan.priority_skills[0];
        assert!(item.drill_type.contains("under 60s each"));
        assert!(
            plan.pacing_guidance
                .iter()
                .any(|g| g.contains("Cap arithmetic at 60s") && g.contains("return after 90s"))
        );
    }

    #[test]
    fn test_priorities_are_one_indexed_and_summed() {
        let mut attempts = Vec::new();
        for i in 0..4 {
            attempts.push(drill(SubSkill::Analogy, i < 1, 30.0));
        }
        for i in 0..4 {
            attempts.push(drill(SubSkill::Grammar, i < 2, 25.0));
        }
        for i in 0..4 {
            attempts.push(drill(SubSkill::Geometry, i < 2, 70.0));
        }
        let plan = plan_for(&attempts);
        assert_eq!(plan.priority_skills.len(), 3);
        assert_eq!(plan.priority_skills[0].priority, 1);
        assert_eq!(plan.priority_skills[2].priority, 3);
        assert_eq!(plan.daily_total_minutes, 45);
        assert!(plan.summary.starts_with("Next focus:"));
        assert_eq!(plan.summary.lines().count(), 4);
    }

    #[test]
    fn test_guidance_capped_at_four_lines() {
        // Rushing on two subskills + global fast errors + stamina drop
        let mut attempts = Vec::new();
        for _ in 0..10 {
            attempts.push(drill(SubSkill::Arithmetic, true, 50.0));
        }
        for _ in 0..4 {
            attempts.push(drill(SubSkill::Analogy, false, 8.0));
        }
        for _ in 0..4 {
            attempts.push(drill(SubSkill::Grammar, false, 5.0));
        }
        for _ in 0..6 {
            attempts.push(drill(SubSkill::Synonym, false, 9.0));
        }
        let plan = plan_for(&attempts);
        assert!(plan.pacing_guidance.len() <= 4);
    }
}
