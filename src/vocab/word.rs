use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    High,
    Medium,
    Low,
}

/// Static catalog entry. Immutable during study; the catalog itself lives
/// outside this crate and is handed in as a slice.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub id: String,
    pub word: String,
    pub part_of_speech: PartOfSpeech,
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub example_sentence: Option<String>,
    pub difficulty: VocabDifficulty,
    pub frequency: Option<Frequency>,
}
