use serde::{Deserialize, Serialize};

use crate::benchmarks::subject_benchmark;
use crate::session::attempt::{MistakeType, QuestionAttempt, Subject};

/// Counts of stored mistake labels within one group of attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBreakdown {
    pub content_gaps: usize,
    pub rushing_errors: usize,
    pub overthinking_errors: usize,
}

impl ErrorBreakdown {
    pub fn from_attempts(attempts: &[&QuestionAttempt]) -> Self {
        let mut breakdown = Self::default();
        for a in attempts {
            match a.mistake_type {
                Some(MistakeType::ContentGap) => breakdown.content_gaps += 1,
                Some(MistakeType::Rushing) => breakdown.rushing_errors += 1,
                Some(MistakeType::Overthinking) => breakdown.overthinking_errors += 1,
                None => {}
            }
        }
        breakdown
    }

    pub fn total(&self) -> usize {
        self.content_gaps + self.rushing_errors + self.overthinking_errors
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionDiagnostic {
    pub subject: Subject,
    pub label: String,
    pub accuracy: f64,
    pub avg_time: f64,
    pub recommended_time: f64,
    pub percent_over_pace: f64,
    /// Points lost in this section (one per incorrect answer).
    pub net_score_impact: usize,
    pub total_questions: usize,
    pub correct_count: usize,
    pub insight: String,
    pub error_breakdown: ErrorBreakdown,
}

/// One diagnostic per subject with at least one attempt, in subject order.
pub fn section_diagnostics(attempts: &[QuestionAttempt]) -> Vec<SectionDiagnostic> {
    Subject::ALL
        .iter()
        .filter_map(|&subject| {
            let section: Vec<&QuestionAttempt> =
                attempts.iter().filter(|a| a.subject == subject).collect();
            let total = section.len();
            if total == 0 {
                return None;
            }

            let correct = section.iter().filter(|a| a.is_correct).count();
            let accuracy = correct as f64 / total as f64 * 100.0;
            let avg_time =
                section.iter().map(|a| a.time_spent).sum::<f64>() / total as f64;
            let recommended_time = subject_benchmark(subject);
            let over_pace = section
                .iter()
                .filter(|a| a.time_spent > recommended_time)
                .count();

            let mut diag = SectionDiagnostic {
                subject,
                label: subject.label().to_string(),
                accuracy,
                avg_time,
                recommended_time,
                percent_over_pace: over_pace as f64 / total as f64 * 100.0,
                net_score_impact: total - correct,
                total_questions: total,
                correct_count: correct,
                insight: String::new(),
                error_breakdown: ErrorBreakdown::from_attempts(&section),
            };
            diag.insight = section_insight(&diag);
            Some(diag)
        })
        .collect()
}

/// Narrated takeaway for one section. First matching rule wins.
fn section_insight(diag: &SectionDiagnostic) -> String {
    let label = &diag.label;
    let errors = &diag.error_breakdown;

    if errors.content_gaps > errors.rushing_errors + errors.overthinking_errors {
        if diag.accuracy < 60.0 {
            return format!(
                "{label} accuracy is low even when taking sufficient time, \
                 suggesting concept gaps that need targeted review."
            );
        }
        return format!(
            "{label} shows some content gaps. Focus on understanding core \
             concepts rather than speed."
        );
    }

    if errors.rushing_errors > errors.content_gaps {
        return format!(
            "{label} errors often come from rushing. Slow down and read each \
             question carefully."
        );
    }

    if errors.overthinking_errors > errors.content_gaps {
        return format!(
            "{label} questions are taking too long. Trust your first instinct \
             and move on after {}s.",
            diag.recommended_time.round()
        );
    }

    if diag.percent_over_pace > 40.0 {
        return format!(
            "{label} pacing needs work. You're spending {}s extra per question \
             on average.",
            (diag.avg_time - diag.recommended_time).round()
        );
    }

    if diag.accuracy >= 80.0 {
        return format!(
            "{label} is a strength! Maintain your approach and use extra time \
             for tougher sections."
        );
    }

    format!(
        "{label} performance is moderate. Consistent practice will improve \
         both accuracy and speed."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testutil::{attempt, math, verbal};
    use crate::session::attempt::SubSkill;

    #[test]
    fn test_empty_attempts_yield_no_sections() {
        assert!(section_diagnostics(&[]).is_empty());
    }

    #[test]
    fn test_math_section_metrics() {
        // 10 math attempts, 6 correct, all exactly at the 60s benchmark
        let attempts: Vec<_> = (0..10).map(|i| math(i < 6, 60.0)).collect();
        let sections = section_diagnostics(&attempts);
        assert_eq!(sections.len(), 1);

        let s = &sections[0];
        assert_eq!(s.subject, Subject::Math);
        assert_eq!(s.total_questions, 10);
        assert_eq!(s.correct_count, 6);
        assert!((s.accuracy - 60.0).abs() < 1e-9);
        assert_eq!(s.percent_over_pace, 0.0);
        assert_eq!(s.avg_time, 60.0);
        assert_eq!(s.net_score_impact, 4);
        // all four errors landed in the content-gap bucket (60s is between cutoffs)
        assert_eq!(s.error_breakdown.content_gaps, 4);
    }

    #[test]
    fn test_insight_content_gap_low_accuracy_wins_first() {
        let attempts: Vec<_> = (0..10).map(|i| math(i < 4, 60.0)).collect();
        let sections = section_diagnostics(&attempts);
        assert!(sections[0].insight.contains("sufficient time"));
    }

    #[test]
    fn test_insight_rushing_dominant() {
        let mut attempts: Vec<_> = (0..6).map(|_| math(true, 55.0)).collect();
        attempts.push(math(false, 10.0));
        attempts.push(math(false, 12.0));
        let sections = section_diagnostics(&attempts);
        assert!(sections[0].insight.contains("rushing"));
    }

    #[test]
    fn test_insight_overthinking_cites_recommended_time() {
        let mut attempts: Vec<_> = (0..6).map(|_| math(true, 55.0)).collect();
        attempts.push(math(false, 130.0));
        attempts.push(math(false, 140.0));
        let sections = section_diagnostics(&attempts);
        assert!(sections[0].insight.contains("60s"));
    }

    #[test]
    fn test_insight_content_gap_branch_even_at_high_accuracy() {
        // 2 content-gap errors outnumber 0 rushing+overthinking, so the
        // content-gap branch wins ahead of the accuracy >= 80 strength rule.
        let attempts: Vec<_> = (0..10).map(|i| math(i < 8, 55.0)).collect();
        let sections = section_diagnostics(&attempts);
        assert!(sections[0].insight.contains("content gaps"));
    }

    #[test]
    fn test_insight_strength_when_no_errors() {
        let attempts: Vec<_> = (0..10).map(|_| math(true, 55.0)).collect();
        let sections = section_diagnostics(&attempts);
        assert!(sections[0].insight.contains("strength"));
    }

    #[test]
    fn test_sections_ordered_by_subject() {
        let attempts = vec![
            attempt(Subject::Reading, SubSkill::Inference, true, 50.0),
            verbal(true, 30.0),
            math(true, 50.0),
        ];
        let subjects: Vec<Subject> = section_diagnostics(&attempts)
            .into_iter()
            .map(|s| s.subject)
            .collect();
        assert_eq!(subjects, vec![Subject::Verbal, Subject::Math, Subject::Reading]);
    }
}
