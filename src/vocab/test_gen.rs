use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::session::attempt::Choice;
use crate::vocab::word::VocabularyWord;

const DISTRACTOR_COUNT: usize = 3;
/// Bounded fallback draws before giving up on unique distractors.
const MAX_FILLER_DRAWS: usize = 20;
const GENERIC_FILLER: &str = "none of these";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabTestType {
    Synonym,
    Antonym,
    Definition,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabTestQuestion {
    pub word_id: String,
    pub word: String,
    pub test_type: VocabTestType,
    pub question_text: String,
    /// Answer texts indexed by `Choice as usize`.
    pub options: [String; 4],
    pub correct_answer: Choice,
}

/// Build one multiple-choice question for a word: a correct answer plus
/// three distractors drawn from the other words' pools, shuffled into slots.
///
/// An antonym question for a word with no antonyms falls back to a synonym
/// question; a word with no synonyms falls back to a definition question
/// (every word has a definition). Distractor exhaustion degrades to generic
/// filler rather than failing.
pub fn build_test_question(
    word: &VocabularyWord,
    all_words: &[VocabularyWord],
    test_type: VocabTestType,
    rng: &mut SmallRng,
) -> VocabTestQuestion {
    let test_type = match test_type {
        VocabTestType::Antonym if word.antonyms.is_empty() => VocabTestType::Synonym,
        other => other,
    };
    let test_type = match test_type {
        VocabTestType::Synonym if word.synonyms.is_empty() => VocabTestType::Definition,
        other => other,
    };

    let (question_text, correct_answers, pool): (String, Vec<String>, Vec<String>) =
        match test_type {
            VocabTestType::Synonym => (
                format!("Which word is a synonym of \"{}\"?", word.word),
                word.synonyms.clone(),
                all_words
                    .iter()
                    .filter(|w| w.id != word.id)
                    .flat_map(|w| w.synonyms.iter().cloned())
                    .collect(),
            ),
            VocabTestType::Antonym => (
                format!("Which word is an antonym of \"{}\"?", word.word),
                word.antonyms.clone(),
                all_words
                    .iter()
                    .filter(|w| w.id != word.id)
                    .flat_map(|w| w.antonyms.iter().cloned())
                    .collect(),
            ),
            VocabTestType::Definition => (
                format!("What is the meaning of \"{}\"?", word.word),
                vec![word.definition.clone()],
                all_words
                    .iter()
                    .filter(|w| w.id != word.id)
                    .map(|w| w.definition.clone())
                    .collect(),
            ),
        };

    let correct = correct_answers
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| word.definition.clone());

    let mut distractors = pick_distractors(&correct_answers, &pool, rng);
    pad_distractors(&mut distractors, &correct, word, all_words, test_type, rng);

    let mut options: Vec<String> = Vec::with_capacity(4);
    options.push(correct.clone());
    options.extend(distractors.into_iter().take(DISTRACTOR_COUNT));
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|o| *o == correct)
        .unwrap_or_default();

    VocabTestQuestion {
        word_id: word.id.clone(),
        word: word.word.clone(),
        test_type,
        question_text,
        options: std::array::from_fn(|i| options[i].clone()),
        correct_answer: Choice::ALL[correct_index],
    }
}

/// Shuffle the pool and take the first distinct entries that don't match any
/// correct answer (case-insensitive).
fn pick_distractors(
    correct_answers: &[String],
    pool: &[String],
    rng: &mut SmallRng,
) -> Vec<String> {
    let mut available: Vec<&String> = pool
        .iter()
        .filter(|candidate| {
            !correct_answers
                .iter()
                .any(|c| c.eq_ignore_ascii_case(candidate))
        })
        .collect();
    available.shuffle(rng);

    let mut distractors: Vec<String> = Vec::new();
    for candidate in available {
        if distractors.len() == DISTRACTOR_COUNT {
            break;
        }
        if !distractors
            .iter()
            .any(|d| d.eq_ignore_ascii_case(candidate))
        {
            distractors.push(candidate.clone());
        }
    }
    distractors
}

/// Best-effort padding from random words when the pool came up short; a
/// generic filler closes any remaining gap.
fn pad_distractors(
    distractors: &mut Vec<String>,
    correct: &str,
    word: &VocabularyWord,
    all_words: &[VocabularyWord],
    test_type: VocabTestType,
    rng: &mut SmallRng,
) {
    let mut draws = 0;
    while distractors.len() < DISTRACTOR_COUNT && draws < MAX_FILLER_DRAWS {
        draws += 1;
        let Some(fallback) = all_words.choose(rng) else {
            break;
        };
        if fallback.id == word.id {
            continue;
        }
        let text = match test_type {
            VocabTestType::Definition => Some(fallback.definition.clone()),
            VocabTestType::Synonym => fallback.synonyms.first().cloned(),
            VocabTestType::Antonym => fallback
                .antonyms
                .first()
                .or(fallback.synonyms.first())
                .cloned(),
        };
        if let Some(text) = text
            && !text.eq_ignore_ascii_case(correct)
            && !distractors.iter().any(|d| d.eq_ignore_ascii_case(&text))
        {
            distractors.push(text);
        }
    }

    while distractors.len() < DISTRACTOR_COUNT {
        distractors.push(GENERIC_FILLER.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::word::{PartOfSpeech, VocabDifficulty};
    use rand::SeedableRng;

    fn word(id: &str, text: &str, synonyms: &[&str], antonyms: &[&str]) -> VocabularyWord {
        VocabularyWord {
            id: id.to_string(),
            word: text.to_string(),
            part_of_speech: PartOfSpeech::Adjective,
            definition: format!("definition of {text}"),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            antonyms: antonyms.iter().map(|s| s.to_string()).collect(),
            example_sentence: None,
            difficulty: VocabDifficulty::Medium,
            frequency: None,
        }
    }

    fn catalog() -> Vec<VocabularyWord> {
        vec![
            word("w1", "arduous", &["difficult", "strenuous"], &["easy"]),
            word("w2", "candid", &["frank", "honest"], &["evasive"]),
            word("w3", "frugal", &["thrifty", "sparing"], &["wasteful"]),
            word("w4", "placid", &["calm", "serene"], &["agitated"]),
            word("w5", "zealous", &["fervent", "ardent"], &["apathetic"]),
        ]
    }

    #[test]
    fn test_correct_answer_slot_holds_a_synonym() {
        let words = catalog();
        let mut rng = SmallRng::seed_from_u64(3);
        let q = build_test_question(&words[0], &words, VocabTestType::Synonym, &mut rng);

        assert_eq!(q.test_type, VocabTestType::Synonym);
        let correct_text = &q.options[q.correct_answer as usize];
        assert!(words[0].synonyms.contains(correct_text));
    }

    #[test]
    fn test_distractors_never_match_correct_answers() {
        let words = catalog();
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let q = build_test_question(&words[1], &words, VocabTestType::Synonym, &mut rng);
            for (i, option) in q.options.iter().enumerate() {
                if i != q.correct_answer as usize {
                    assert!(
                        !words[1]
                            .synonyms
                            .iter()
                            .any(|s| s.eq_ignore_ascii_case(option)),
                        "distractor '{option}' matches a synonym of the target"
                    );
                }
            }
        }
    }

    #[test]
    fn test_antonym_without_antonyms_falls_back_to_synonym() {
        let mut words = catalog();
        words[0].antonyms.clear();
        let mut rng = SmallRng::seed_from_u64(5);
        let q = build_test_question(&words[0], &words, VocabTestType::Antonym, &mut rng);
        assert_eq!(q.test_type, VocabTestType::Synonym);
    }

    #[test]
    fn test_tiny_catalog_pads_with_filler() {
        let words = vec![word("w1", "arduous", &["difficult"], &[])];
        let mut rng = SmallRng::seed_from_u64(5);
        let q = build_test_question(&words[0], &words, VocabTestType::Synonym, &mut rng);
        // only one word in the catalog: all three distractors are filler
        assert_eq!(q.options.iter().filter(|o| *o == GENERIC_FILLER).count(), 3);
        assert_eq!(q.options[q.correct_answer as usize], "difficult");
    }

    #[test]
    fn test_definition_question_uses_definitions() {
        let words = catalog();
        let mut rng = SmallRng::seed_from_u64(11);
        let q = build_test_question(&words[2], &words, VocabTestType::Definition, &mut rng);
        assert_eq!(q.options[q.correct_answer as usize], words[2].definition);
        assert!(q.question_text.contains("frugal"));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let words = catalog();
        let mut rng_a = SmallRng::seed_from_u64(9);
        let mut rng_b = SmallRng::seed_from_u64(9);
        let a = build_test_question(&words[3], &words, VocabTestType::Synonym, &mut rng_a);
        let b = build_test_question(&words[3], &words, VocabTestType::Synonym, &mut rng_b);
        assert_eq!(a.options, b.options);
        assert_eq!(a.correct_answer, b.correct_answer);
    }
}
