use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::Question;
use crate::benchmarks::subject_benchmark;
use crate::diagnostics::mistake;
use crate::session::exam::ExamMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    Verbal,
    Math,
    Reading,
    Language,
}

impl Subject {
    pub const ALL: [Subject; 4] = [
        Subject::Verbal,
        Subject::Math,
        Subject::Reading,
        Subject::Language,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Verbal => "Verbal Reasoning",
            Subject::Math => "Mathematics",
            Subject::Reading => "Reading Comprehension",
            Subject::Language => "Language Skills",
        }
    }
}

/// Fine-grained question category nested under a subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubSkill {
    Analogy,
    Synonym,
    Logic,
    Classification,
    Arithmetic,
    Algebra,
    Geometry,
    WordProblem,
    MainIdea,
    Inference,
    Comprehension,
    Grammar,
    Punctuation,
    SentenceStructure,
}

impl SubSkill {
    pub fn subject(&self) -> Subject {
        match self {
            SubSkill::Analogy | SubSkill::Synonym | SubSkill::Logic | SubSkill::Classification => {
                Subject::Verbal
            }
            SubSkill::Arithmetic
            | SubSkill::Algebra
            | SubSkill::Geometry
            | SubSkill::WordProblem => Subject::Math,
            SubSkill::MainIdea | SubSkill::Inference | SubSkill::Comprehension => Subject::Reading,
            SubSkill::Grammar | SubSkill::Punctuation | SubSkill::SentenceStructure => {
                Subject::Language
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubSkill::Analogy => "Analogies",
            SubSkill::Synonym => "Synonyms",
            SubSkill::Logic => "Logic Problems",
            SubSkill::Classification => "Classification",
            SubSkill::Arithmetic => "Arithmetic",
            SubSkill::Algebra => "Algebra",
            SubSkill::Geometry => "Geometry",
            SubSkill::WordProblem => "Word Problems",
            SubSkill::MainIdea => "Main Idea",
            SubSkill::Inference => "Inference",
            SubSkill::Comprehension => "Passage Comprehension",
            SubSkill::Grammar => "Grammar",
            SubSkill::Punctuation => "Punctuation",
            SubSkill::SentenceStructure => "Sentence Structure",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One of the four answer slots. Doubles as an index into option arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MistakeType {
    ContentGap,
    Rushing,
    Overthinking,
}

/// One answer submission. `student_answer` of None means the question timed
/// out unanswered. `mistake_type` is set once at submission time and is None
/// iff the answer was correct.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionAttempt {
    pub question_id: String,
    pub subject: Subject,
    pub sub_skill: SubSkill,
    pub difficulty: Difficulty,
    pub student_answer: Option<Choice>,
    pub correct_answer: Choice,
    pub is_correct: bool,
    /// Seconds from question display to submission.
    pub time_spent: f64,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub mode: ExamMode,
    pub mistake_type: Option<MistakeType>,
    pub was_over_pace: bool,
}

impl QuestionAttempt {
    pub fn record(
        question: &Question,
        student_answer: Option<Choice>,
        time_spent: f64,
        now: DateTime<Utc>,
        session_id: &str,
        mode: ExamMode,
    ) -> Self {
        let time_spent = time_spent.max(0.0);
        let is_correct = student_answer == Some(question.correct_answer);
        let mistake_type = mistake::classify(
            is_correct,
            time_spent,
            question.subject,
            question.sub_skill,
        );

        Self {
            question_id: question.id.clone(),
            subject: question.subject,
            sub_skill: question.sub_skill,
            difficulty: question.difficulty,
            student_answer,
            correct_answer: question.correct_answer,
            is_correct,
            time_spent,
            timestamp: now,
            session_id: session_id.to_string(),
            mode,
            mistake_type,
            was_over_pace: time_spent > subject_benchmark(question.subject),
        }
    }
}
