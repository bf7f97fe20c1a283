use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::session::attempt::{Choice, Difficulty, SubSkill, Subject};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub subject: Subject,
    pub sub_skill: SubSkill,
    pub difficulty: Difficulty,
    pub text: String,
    /// Answer texts indexed by `Choice as usize`.
    pub options: [String; 4],
    pub correct_answer: Choice,
    pub explanation: Option<String>,
}

impl Question {
    pub fn option(&self, choice: Choice) -> &str {
        &self.options[choice as usize]
    }
}

/// Source of exam questions. The static content bank lives outside this
/// crate; UI code supplies an implementation.
pub trait QuestionBank {
    /// Draw up to `count` random questions. An empty `subjects` filter means
    /// all subjects. May return fewer than `count` if the bank runs short.
    fn random_questions(
        &self,
        count: usize,
        subjects: &[Subject],
        rng: &mut SmallRng,
    ) -> Vec<Question>;
}

/// In-memory bank over a fixed question list.
pub struct SliceBank {
    questions: Vec<Question>,
}

impl SliceBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionBank for SliceBank {
    fn random_questions(
        &self,
        count: usize,
        subjects: &[Subject],
        rng: &mut SmallRng,
    ) -> Vec<Question> {
        let mut pool: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| subjects.is_empty() || subjects.contains(&q.subject))
            .collect();
        pool.shuffle(rng);
        pool.into_iter().take(count).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bank() -> SliceBank {
        let mut questions = Vec::new();
        for (i, (subject, sub_skill)) in [
            (Subject::Verbal, SubSkill::Analogy),
            (Subject::Verbal, SubSkill::Synonym),
            (Subject::Math, SubSkill::Arithmetic),
            (Subject::Math, SubSkill::Algebra),
            (Subject::Reading, SubSkill::Inference),
        ]
        .into_iter()
        .enumerate()
        {
            questions.push(Question {
                id: format!("q{i}"),
                subject,
                sub_skill,
                difficulty: Difficulty::Easy,
                text: format!("question {i}"),
                options: std::array::from_fn(|j| format!("opt {j}")),
                correct_answer: Choice::A,
                explanation: None,
            });
        }
        SliceBank::new(questions)
    }

    #[test]
    fn test_subject_filter_respected() {
        let bank = bank();
        let mut rng = SmallRng::seed_from_u64(7);
        let drawn = bank.random_questions(10, &[Subject::Math], &mut rng);
        assert_eq!(drawn.len(), 2);
        assert!(drawn.iter().all(|q| q.subject == Subject::Math));
    }

    #[test]
    fn test_empty_filter_draws_from_all() {
        let bank = bank();
        let mut rng = SmallRng::seed_from_u64(7);
        let drawn = bank.random_questions(3, &[], &mut rng);
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn test_seeded_draw_is_deterministic() {
        let bank = bank();
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);
        let a: Vec<String> = bank
            .random_questions(5, &[], &mut rng_a)
            .into_iter()
            .map(|q| q.id)
            .collect();
        let b: Vec<String> = bank
            .random_questions(5, &[], &mut rng_b)
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(a, b);
    }
}
