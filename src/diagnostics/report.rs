use serde::{Deserialize, Serialize};

use crate::diagnostics::action_plan::{self, ActionPlan};
use crate::diagnostics::pacing::{self, PacingAnalysis, PacingStatus, StaminaStatus};
use crate::diagnostics::patterns::{self, PatternInsight};
use crate::diagnostics::section::{self, SectionDiagnostic};
use crate::diagnostics::subskill::{self, SubSkillDiagnostic};
use crate::session::attempt::{QuestionAttempt, Subject};
use crate::session::exam::ExamSession;

/// Display cap for pattern insights in the final report.
const MAX_INSIGHTS: usize = 5;

const STRENGTH_ACCURACY: f64 = 70.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionScore {
    pub subject: Subject,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Raw score rollup: one entry per subject (including empty ones, so the
/// entries always partition the session).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_score: usize,
    pub total_questions: usize,
    pub accuracy: f64,
    pub section_scores: Vec<SectionScore>,
}

impl ScoreSummary {
    pub fn from_attempts(attempts: &[QuestionAttempt]) -> Self {
        let total_questions = attempts.len();
        let total_score = attempts.iter().filter(|a| a.is_correct).count();
        let accuracy = if total_questions > 0 {
            total_score as f64 / total_questions as f64 * 100.0
        } else {
            0.0
        };

        let section_scores = Subject::ALL
            .iter()
            .map(|&subject| {
                let total = attempts.iter().filter(|a| a.subject == subject).count();
                let correct = attempts
                    .iter()
                    .filter(|a| a.subject == subject && a.is_correct)
                    .count();
                SectionScore {
                    subject,
                    correct,
                    total,
                    accuracy: if total > 0 {
                        correct as f64 / total as f64 * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        Self {
            total_score,
            total_questions,
            accuracy,
            section_scores,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_score: usize,
    pub total_questions: usize,
    pub accuracy_percent: f64,
    pub pacing_status: PacingStatus,
    pub stamina_status: StaminaStatus,
    pub plain_language_summary: String,
    pub strength_areas: Vec<String>,
    pub weakness_areas: Vec<String>,
}

/// Full diagnosis for one session. Derived, recomputed fresh from the
/// attempt list every time; regenerating from the same session yields
/// identical output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub overall: OverallSummary,
    pub score: ScoreSummary,
    pub pacing: PacingAnalysis,
    pub sections: Vec<SectionDiagnostic>,
    pub sub_skills: Vec<SubSkillDiagnostic>,
    pub top_weak_skills: Vec<SubSkillDiagnostic>,
    pub top_strong_skills: Vec<SubSkillDiagnostic>,
    pub patterns: Vec<PatternInsight>,
    pub action_plan: ActionPlan,
}

/// Run the full diagnostics pipeline over a session's attempts. Pure and
/// side-effect free; safe to call on in-progress sessions.
pub fn generate_report(session: &ExamSession) -> DiagnosticReport {
    let attempts = &session.attempts;

    let score = ScoreSummary::from_attempts(attempts);
    let analysis = PacingAnalysis::from_attempts(attempts);
    let pacing_status = pacing::pacing_status(attempts);
    let stamina_status = pacing::stamina_status(attempts);

    let sections = section::section_diagnostics(attempts);
    let sub_skills = subskill::subskill_diagnostics(attempts);
    let top_weak_skills = subskill::top_weak_skills(&sub_skills);
    let top_strong_skills = subskill::top_strong_skills(&sub_skills);

    let mut detected = patterns::detect_patterns(
        attempts,
        &sub_skills,
        &analysis,
        score.accuracy,
        pacing_status,
    );

    // The prescription only covers skills that are actually weak; a session
    // where every ranked skill is fine produces an empty plan.
    let plan_input: Vec<SubSkillDiagnostic> = top_weak_skills
        .iter()
        .filter(|s| s.is_weak)
        .cloned()
        .collect();
    // The plan reads every detected pattern; the display cap below applies
    // only to the reported list.
    let action_plan = action_plan::synthesize(&plan_input, &detected);
    detected.truncate(MAX_INSIGHTS);

    let overall = overall_summary(&score, pacing_status, stamina_status);

    DiagnosticReport {
        overall,
        score,
        pacing: analysis,
        sections,
        sub_skills,
        top_weak_skills,
        top_strong_skills,
        patterns: detected,
        action_plan,
    }
}

fn overall_summary(
    score: &ScoreSummary,
    pacing_status: PacingStatus,
    stamina_status: StaminaStatus,
) -> OverallSummary {
    let mut attempted: Vec<&SectionScore> = score
        .section_scores
        .iter()
        .filter(|s| s.total > 0)
        .collect();
    attempted.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));

    let strength_areas: Vec<String> = attempted
        .iter()
        .filter(|s| s.accuracy >= STRENGTH_ACCURACY)
        .map(|s| s.subject.label().to_string())
        .collect();
    let weakness_areas: Vec<String> = attempted
        .iter()
        .filter(|s| s.accuracy < STRENGTH_ACCURACY)
        .map(|s| s.subject.label().to_string())
        .collect();

    let plain_language_summary = if attempted.is_empty() {
        "No attempts recorded in this session yet.".to_string()
    } else if !strength_areas.is_empty() && !weakness_areas.is_empty() {
        let best = strength_areas
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(" and ");
        let worst = weakness_areas.join(" and ");
        let suffix = match pacing_status {
            PacingStatus::Slow => " where time runs long.",
            PacingStatus::Rushing => " where you may be rushing.",
            PacingStatus::OnPace => ".",
        };
        format!("You perform best on {best}. Most score loss comes from {worst}{suffix}")
    } else if strength_areas.len() == attempted.len() {
        let coda = if stamina_status == StaminaStatus::Fatigued {
            "Focus on building endurance for longer tests."
        } else {
            "Keep up the great work."
        };
        format!("Excellent overall performance across all sections! {coda}")
    } else {
        "There are opportunities for improvement in all sections. Focus on the \
         fundamentals and consistent practice."
            .to_string()
    };

    OverallSummary {
        total_score: score.total_score,
        total_questions: score.total_questions,
        accuracy_percent: score.accuracy,
        pacing_status,
        stamina_status,
        plain_language_summary,
        strength_areas,
        weakness_areas,
    }
}
