use crate::benchmarks::{OVERTHINKING_THRESHOLD, RUSHING_THRESHOLD, benchmark_for};
use crate::session::attempt::{MistakeType, SubSkill, Subject};

/// Label a submission against its pacing benchmark. Runs once, at
/// answer-submission time; the stored label is what the report reads.
///
/// Correct answers never carry a mistake type. For wrong answers the
/// boundaries are strict: exactly benchmark × 0.5 is not rushing, exactly
/// benchmark × 2.0 is not overthinking.
pub fn classify(
    is_correct: bool,
    time_spent: f64,
    subject: Subject,
    sub_skill: SubSkill,
) -> Option<MistakeType> {
    if is_correct {
        return None;
    }

    let benchmark = benchmark_for(subject, sub_skill);
    if time_spent < benchmark * RUSHING_THRESHOLD {
        Some(MistakeType::Rushing)
    } else if time_spent > benchmark * OVERTHINKING_THRESHOLD {
        Some(MistakeType::Overthinking)
    } else {
        Some(MistakeType::ContentGap)
    }
}
