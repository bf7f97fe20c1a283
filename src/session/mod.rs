pub mod attempt;
pub mod exam;

pub use attempt::{Choice, Difficulty, MistakeType, QuestionAttempt, SubSkill, Subject};
pub use exam::{ExamEngine, ExamMode, ExamSession, SubmitOutcome};
