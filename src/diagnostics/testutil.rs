//! Attempt builders shared by the diagnostics test modules.

use chrono::Utc;

use crate::benchmarks::subject_benchmark;
use crate::diagnostics::mistake;
use crate::session::attempt::{Choice, Difficulty, QuestionAttempt, SubSkill, Subject};
use crate::session::exam::ExamMode;

/// Build an attempt the way the engine would: mistake type classified from
/// the raw time, over-pace derived from the subject benchmark.
pub(crate) fn attempt(
    subject: Subject,
    sub_skill: SubSkill,
    is_correct: bool,
    time_spent: f64,
) -> QuestionAttempt {
    QuestionAttempt {
        question_id: "q".to_string(),
        subject,
        sub_skill,
        difficulty: Difficulty::Medium,
        student_answer: if is_correct {
            Some(Choice::A)
        } else {
            Some(Choice::B)
        },
        correct_answer: Choice::A,
        is_correct,
        time_spent,
        timestamp: Utc::now(),
        session_id: "s1".to_string(),
        mode: ExamMode::QuickDrill,
        mistake_type: mistake::classify(is_correct, time_spent, subject, sub_skill),
        was_over_pace: time_spent > subject_benchmark(subject),
    }
}

pub(crate) fn math(is_correct: bool, time_spent: f64) -> QuestionAttempt {
    attempt(Subject::Math, SubSkill::Arithmetic, is_correct, time_spent)
}

pub(crate) fn verbal(is_correct: bool, time_spent: f64) -> QuestionAttempt {
    attempt(Subject::Verbal, SubSkill::Analogy, is_correct, time_spent)
}
