use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Four-stage spaced-repetition tier. Promotion is gated on a correct
/// streak; any incorrect response demotes one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasteryLevel {
    New,
    Learning,
    Review,
    Mastered,
}

impl MasteryLevel {
    /// Days until the next review at this level.
    pub fn spaced_interval_days(&self) -> i64 {
        match self {
            MasteryLevel::New => 0,
            MasteryLevel::Learning => 1,
            MasteryLevel::Review => 3,
            MasteryLevel::Mastered => 7,
        }
    }
}

/// Level transition for one response. `streak` is the consecutive-correct
/// count including this response. Promotion thresholds: new→learning at
/// streak 1, learning→review at 2, review→mastered at 3; an unmet threshold
/// leaves the level unchanged even on a correct answer.
pub fn next_level(current: MasteryLevel, is_correct: bool, streak: u32) -> MasteryLevel {
    if !is_correct {
        return match current {
            MasteryLevel::Mastered => MasteryLevel::Review,
            MasteryLevel::Review => MasteryLevel::Learning,
            MasteryLevel::Learning | MasteryLevel::New => MasteryLevel::New,
        };
    }

    match current {
        MasteryLevel::New if streak >= 1 => MasteryLevel::Learning,
        MasteryLevel::Learning if streak >= 2 => MasteryLevel::Review,
        MasteryLevel::Review if streak >= 3 => MasteryLevel::Mastered,
        _ => current,
    }
}

/// Per-word learner state. Created on first interaction, updated on every
/// subsequent one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabMastery {
    pub word_id: String,
    pub word: String,
    pub mastery_level: MasteryLevel,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub total_interactions: u32,
    pub avg_time_seconds: f64,
    pub last_seen: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
    pub streak: u32,
}

impl VocabMastery {
    fn first_interaction(
        word_id: &str,
        word: &str,
        is_correct: bool,
        time_seconds: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let streak = if is_correct { 1 } else { 0 };
        let level = next_level(MasteryLevel::New, is_correct, streak);
        Self {
            word_id: word_id.to_string(),
            word: word.to_string(),
            mastery_level: level,
            correct_count: is_correct as u32,
            incorrect_count: !is_correct as u32,
            total_interactions: 1,
            avg_time_seconds: time_seconds,
            last_seen: now,
            next_review_date: now + Duration::days(level.spaced_interval_days()),
            streak,
        }
    }

    /// Fold one response into the state: counts, running mean, streak, level
    /// transition, and the new spaced due date.
    pub fn apply(&mut self, is_correct: bool, time_seconds: f64, now: DateTime<Utc>) {
        self.streak = if is_correct { self.streak + 1 } else { 0 };
        self.mastery_level = next_level(self.mastery_level, is_correct, self.streak);

        if is_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }
        self.avg_time_seconds = (self.avg_time_seconds * self.total_interactions as f64
            + time_seconds)
            / (self.total_interactions + 1) as f64;
        self.total_interactions += 1;
        self.last_seen = now;
        self.next_review_date =
            now + Duration::days(self.mastery_level.spaced_interval_days());
    }

    /// Update an existing record in place or create one for a first
    /// interaction; returns the resulting state either way.
    pub fn record(
        existing: Option<&mut VocabMastery>,
        word_id: &str,
        word: &str,
        is_correct: bool,
        time_seconds: f64,
        now: DateTime<Utc>,
    ) -> VocabMastery {
        match existing {
            Some(mastery) => {
                mastery.apply(is_correct, time_seconds, now);
                mastery.clone()
            }
            None => Self::first_interaction(word_id, word, is_correct, time_seconds, now),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }
}
