use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::store::schema::{VocabMasteryData, VocabSessionData};
use crate::store::{StateStore, VOCAB_MASTERY_KEY, VOCAB_SESSIONS_KEY};
use crate::vocab::mastery::{MasteryLevel, VocabMastery};
use crate::vocab::test_gen::{VocabTestQuestion, VocabTestType, build_test_question};
use crate::vocab::word::{PartOfSpeech, VocabularyWord};

/// Most recent sessions kept in history; older ones are dropped from the
/// front.
const SESSION_HISTORY_CAP: usize = 50;

/// avg response time above this marks a word as slow in the report.
const SLOW_WORD_SECONDS: f64 = 10.0;

const REPORT_LIST_CAP: usize = 10;
const REVIEW_RECOMMENDATION_PAD: usize = 5;
const REVIEW_RECOMMENDATION_CAP: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabMode {
    Learn,
    Test,
    Review,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabResponse {
    Correct,
    Incorrect,
    Known,
    Unknown,
    Unsure,
}

impl VocabResponse {
    /// Flashcard "known" counts the same as a correct test answer.
    pub fn is_correct(&self) -> bool {
        matches!(self, VocabResponse::Correct | VocabResponse::Known)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabInteraction {
    pub id: String,
    pub word_id: String,
    pub word: String,
    pub part_of_speech: PartOfSpeech,
    pub mode: VocabMode,
    pub test_type: Option<VocabTestType>,
    pub response: VocabResponse,
    pub time_spent_seconds: f64,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

/// One study sitting: interactions plus running attempted/correct totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabSession {
    pub id: String,
    pub mode: VocabMode,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub interactions: Vec<VocabInteraction>,
    pub words_attempted: u32,
    pub words_correct: u32,
    pub accuracy: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryBreakdown {
    pub new: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabReport {
    pub total_words_studied: usize,
    pub total_time_minutes: u32,
    pub accuracy: f64,
    pub mastery_breakdown: MasteryBreakdown,
    pub weak_words: Vec<VocabMastery>,
    pub recently_missed: Vec<VocabMastery>,
    pub slow_words: Vec<VocabMastery>,
    pub recommended_review_count: usize,
}

/// Drives vocabulary study: word selection per mode, interaction recording
/// with mastery updates, test-question generation, and session history.
pub struct VocabEngine<S: StateStore> {
    store: S,
    words: Vec<VocabularyWord>,
    mastery: Vec<VocabMastery>,
    session: Option<VocabSession>,
    session_words: Vec<VocabularyWord>,
    current_index: usize,
}

impl<S: StateStore> VocabEngine<S> {
    /// Load persisted mastery state over the given word catalog.
    pub fn new(store: S, words: Vec<VocabularyWord>) -> Result<Self> {
        let data: VocabMasteryData = crate::store::load_or_default(&store, VOCAB_MASTERY_KEY)?;
        Ok(Self {
            store,
            words,
            mastery: data.mastery,
            session: None,
            session_words: Vec::new(),
            current_index: 0,
        })
    }

    pub fn session(&self) -> Option<&VocabSession> {
        self.session.as_ref()
    }

    pub fn mastery(&self) -> &[VocabMastery] {
        &self.mastery
    }

    pub fn word_mastery(&self, word_id: &str) -> Option<&VocabMastery> {
        self.mastery.iter().find(|m| m.word_id == word_id)
    }

    pub fn current_word(&self) -> Option<&VocabularyWord> {
        self.session_words.get(self.current_index)
    }

    /// Begin a sitting. Review mode draws from due-or-unfinished words;
    /// `focus_on_weak` restricts the draw to unseen/new/learning words. A
    /// short draw is topped up from the rest of the catalog.
    pub fn start_session(
        &mut self,
        mode: VocabMode,
        word_count: usize,
        focus_on_weak: bool,
        rng: &mut SmallRng,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.session.is_some() {
            bail!("a vocabulary session is already in progress");
        }

        let mut selected: Vec<VocabularyWord> = if mode == VocabMode::Review {
            self.words
                .iter()
                .filter(|w| match self.word_mastery(&w.id) {
                    None => true,
                    Some(m) => m.is_due(now) || m.mastery_level != MasteryLevel::Mastered,
                })
                .cloned()
                .collect()
        } else if focus_on_weak {
            self.words
                .iter()
                .filter(|w| {
                    self.word_mastery(&w.id).is_none_or(|m| {
                        matches!(m.mastery_level, MasteryLevel::New | MasteryLevel::Learning)
                    })
                })
                .cloned()
                .collect()
        } else {
            self.words.clone()
        };
        selected.shuffle(rng);
        selected.truncate(word_count);

        if selected.len() < word_count {
            let mut remaining: Vec<VocabularyWord> = self
                .words
                .iter()
                .filter(|w| !selected.iter().any(|s| s.id == w.id))
                .cloned()
                .collect();
            remaining.shuffle(rng);
            remaining.truncate(word_count - selected.len());
            selected.extend(remaining);
        }

        self.session = Some(VocabSession {
            id: format!("vocab-{}", now.timestamp_millis()),
            mode,
            start_time: now,
            end_time: None,
            interactions: Vec::new(),
            words_attempted: 0,
            words_correct: 0,
            accuracy: 0.0,
        });
        self.session_words = selected;
        self.current_index = 0;
        Ok(())
    }

    pub fn next_word(&mut self) {
        if self.current_index + 1 < self.session_words.len() {
            self.current_index += 1;
        }
    }

    pub fn previous_word(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    /// Build a test question for the current word with a random test type.
    pub fn next_test_question(&self, rng: &mut SmallRng) -> Option<VocabTestQuestion> {
        let word = self.current_word()?;
        let test_type = *[
            VocabTestType::Synonym,
            VocabTestType::Antonym,
            VocabTestType::Definition,
        ]
        .choose(rng)
        .unwrap_or(&VocabTestType::Definition);
        Some(build_test_question(word, &self.words, test_type, rng))
    }

    /// Record one response: appends to the session, folds the response into
    /// the word's mastery state, and persists the mastery table.
    pub fn record_interaction(
        &mut self,
        word_id: &str,
        response: VocabResponse,
        test_type: Option<VocabTestType>,
        time_spent_seconds: f64,
        now: DateTime<Utc>,
    ) -> Result<VocabMastery> {
        let Some(session) = self.session.as_mut() else {
            bail!("no vocabulary session in progress");
        };
        let Some(word) = self.words.iter().find(|w| w.id == word_id) else {
            bail!("unknown word id '{word_id}'");
        };

        let is_correct = response.is_correct();
        session.interactions.push(VocabInteraction {
            id: format!("{}-i{}", session.id, session.interactions.len()),
            word_id: word.id.clone(),
            word: word.word.clone(),
            part_of_speech: word.part_of_speech,
            mode: session.mode,
            test_type,
            response,
            time_spent_seconds,
            timestamp: now,
            session_id: session.id.clone(),
        });
        session.words_attempted += 1;
        if is_correct {
            session.words_correct += 1;
        }
        session.accuracy = session.words_correct as f64 / session.words_attempted as f64 * 100.0;

        let updated = VocabMastery::record(
            self.mastery.iter_mut().find(|m| m.word_id == word.id),
            &word.id,
            &word.word,
            is_correct,
            time_spent_seconds,
            now,
        );
        if self.mastery.iter().all(|m| m.word_id != word_id) {
            self.mastery.push(updated.clone());
        }

        let data = VocabMasteryData {
            mastery: self.mastery.clone(),
            ..Default::default()
        };
        crate::store::save(&self.store, VOCAB_MASTERY_KEY, &data)?;
        Ok(updated)
    }

    /// Finalize the sitting: stamp the end time, append to capped history,
    /// and hand back a fresh study report.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Result<VocabReport> {
        let Some(mut session) = self.session.take() else {
            bail!("no vocabulary session in progress");
        };
        session.end_time = Some(now);

        let mut history: VocabSessionData =
            crate::store::load_or_default(&self.store, VOCAB_SESSIONS_KEY)?;
        history.sessions.push(session);
        if history.sessions.len() > SESSION_HISTORY_CAP {
            let excess = history.sessions.len() - SESSION_HISTORY_CAP;
            history.sessions.drain(..excess);
        }
        crate::store::save(&self.store, VOCAB_SESSIONS_KEY, &history)?;

        self.session_words.clear();
        self.current_index = 0;
        self.report(now)
    }

    /// Aggregate study report over the mastery table and session history.
    pub fn report(&self, now: DateTime<Utc>) -> Result<VocabReport> {
        let history: VocabSessionData =
            crate::store::load_or_default(&self.store, VOCAB_SESSIONS_KEY)?;
        let total_minutes: f64 = history
            .sessions
            .iter()
            .map(|s| {
                let end = s.end_time.unwrap_or(now);
                (end - s.start_time).num_seconds().max(0) as f64 / 60.0
            })
            .sum();

        let mut breakdown = MasteryBreakdown::default();
        for m in &self.mastery {
            match m.mastery_level {
                MasteryLevel::New => breakdown.new += 1,
                MasteryLevel::Learning => breakdown.learning += 1,
                MasteryLevel::Review => breakdown.review += 1,
                MasteryLevel::Mastered => breakdown.mastered += 1,
            }
        }
        // catalog words never studied count as new
        breakdown.new += self.words.len().saturating_sub(self.mastery.len());

        let total_correct: u32 = self.mastery.iter().map(|m| m.correct_count).sum();
        let total_attempts: u32 = self.mastery.iter().map(|m| m.total_interactions).sum();
        let accuracy = if total_attempts > 0 {
            total_correct as f64 / total_attempts as f64 * 100.0
        } else {
            0.0
        };

        let mut weak_words: Vec<VocabMastery> = self
            .mastery
            .iter()
            .filter(|m| {
                matches!(m.mastery_level, MasteryLevel::New | MasteryLevel::Learning)
            })
            .cloned()
            .collect();
        weak_words.sort_by(|a, b| {
            let rate = |m: &VocabMastery| {
                m.correct_count as f64 / m.total_interactions.max(1) as f64
            };
            rate(a).total_cmp(&rate(b))
        });
        weak_words.truncate(REPORT_LIST_CAP);

        let mut recently_missed: Vec<VocabMastery> = self
            .mastery
            .iter()
            .filter(|m| m.incorrect_count > 0)
            .cloned()
            .collect();
        recently_missed.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        recently_missed.truncate(REPORT_LIST_CAP);

        let mut slow_words: Vec<VocabMastery> = self
            .mastery
            .iter()
            .filter(|m| m.avg_time_seconds > SLOW_WORD_SECONDS)
            .cloned()
            .collect();
        slow_words.sort_by(|a, b| b.avg_time_seconds.total_cmp(&a.avg_time_seconds));
        slow_words.truncate(REPORT_LIST_CAP);

        let needs_review = self.mastery.iter().filter(|m| m.is_due(now)).count();

        Ok(VocabReport {
            total_words_studied: self.mastery.len(),
            total_time_minutes: total_minutes.round() as u32,
            accuracy,
            mastery_breakdown: breakdown,
            weak_words,
            recently_missed,
            slow_words,
            recommended_review_count: (needs_review + REVIEW_RECOMMENDATION_PAD)
                .min(REVIEW_RECOMMENDATION_CAP),
        })
    }

    /// Catalog words whose mastery record is due for review.
    pub fn words_for_review(&self, now: DateTime<Utc>) -> Vec<&VocabularyWord> {
        self.words
            .iter()
            .filter(|w| self.word_mastery(&w.id).is_some_and(|m| m.is_due(now)))
            .collect()
    }

    /// Catalog words still at the new or learning level.
    pub fn weak_words(&self) -> Vec<&VocabularyWord> {
        self.words
            .iter()
            .filter(|w| {
                self.word_mastery(&w.id).is_some_and(|m| {
                    matches!(m.mastery_level, MasteryLevel::New | MasteryLevel::Learning)
                })
            })
            .collect()
    }
}
