use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::bank::{Question, QuestionBank};
use crate::session::attempt::{Choice, QuestionAttempt, Subject};
use crate::store::schema::ExamHistoryData;
use crate::store::{CURRENT_SESSION_KEY, EXAM_HISTORY_KEY, StateStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamMode {
    FullMock,
    VerbalPractice,
    MathPractice,
    ReadingPractice,
    LanguagePractice,
    QuickDrill,
}

impl ExamMode {
    pub fn name(&self) -> &'static str {
        match self {
            ExamMode::FullMock => "Full Mock Exam",
            ExamMode::VerbalPractice => "Verbal Skills Practice",
            ExamMode::MathPractice => "Math Practice",
            ExamMode::ReadingPractice => "Reading Comprehension",
            ExamMode::LanguagePractice => "Language Skills",
            ExamMode::QuickDrill => "Quick Drill",
        }
    }

    pub fn question_count(&self) -> usize {
        match self {
            ExamMode::FullMock => 300,
            ExamMode::VerbalPractice | ExamMode::MathPractice => 25,
            ExamMode::ReadingPractice | ExamMode::LanguagePractice => 20,
            ExamMode::QuickDrill => 15,
        }
    }

    /// Session time budget in seconds.
    pub fn time_limit_secs(&self) -> u32 {
        match self {
            ExamMode::FullMock => 180 * 60,
            ExamMode::VerbalPractice => 20 * 60,
            ExamMode::MathPractice => 30 * 60,
            ExamMode::ReadingPractice => 25 * 60,
            ExamMode::LanguagePractice => 15 * 60,
            ExamMode::QuickDrill => 12 * 60,
        }
    }

    /// Subject filter for the question draw; empty means all subjects.
    pub fn subjects(&self) -> &'static [Subject] {
        match self {
            ExamMode::FullMock | ExamMode::QuickDrill => &[],
            ExamMode::VerbalPractice => &[Subject::Verbal],
            ExamMode::MathPractice => &[Subject::Math],
            ExamMode::ReadingPractice => &[Subject::Reading],
            ExamMode::LanguagePractice => &[Subject::Language],
        }
    }
}

/// A bounded sequence of attempts under one mode and time budget. Attempts
/// are appended in question order and never removed or reordered; once
/// `is_complete` is set the session is immutable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamSession {
    pub id: String,
    pub mode: ExamMode,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_time_allowed: u32,
    pub attempts: Vec<QuestionAttempt>,
    pub is_complete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Advanced to the next question.
    Next,
    /// That was the last question; the session has been finalized.
    Completed,
}

/// Drives one exam session: question draw, timed answer recording, the
/// countdown tick, and persistence of the in-progress session and history.
pub struct ExamEngine<S: StateStore> {
    store: S,
    session: Option<ExamSession>,
    questions: Vec<Question>,
    current_index: usize,
    time_remaining: u32,
}

impl<S: StateStore> ExamEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: None,
            questions: Vec::new(),
            current_index: 0,
            time_remaining: 0,
        }
    }

    /// Load a previously persisted in-progress session, if any. Absent key
    /// means a fresh start; a corrupt blob is surfaced, not discarded.
    pub fn resume(&mut self) -> Result<Option<&ExamSession>> {
        self.session = crate::store::load_optional(&self.store, CURRENT_SESSION_KEY)?;
        if let Some(session) = &self.session {
            self.current_index = session.attempts.len();
            let elapsed: f64 = session.attempts.iter().map(|a| a.time_spent).sum();
            self.time_remaining = session
                .total_time_allowed
                .saturating_sub(elapsed.round() as u32);
        }
        Ok(self.session.as_ref())
    }

    pub fn start_session(
        &mut self,
        mode: ExamMode,
        bank: &impl QuestionBank,
        rng: &mut SmallRng,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.session.as_ref().is_some_and(|s| !s.is_complete) {
            bail!("a session is already in progress");
        }

        self.questions = bank.random_questions(mode.question_count(), mode.subjects(), rng);
        if self.questions.is_empty() {
            bail!("question bank returned no questions for mode '{}'", mode.name());
        }

        let session = ExamSession {
            id: format!("session-{}-{:08x}", now.timestamp_millis(), rng.next_u32()),
            mode,
            start_time: now,
            end_time: None,
            total_time_allowed: mode.time_limit_secs(),
            attempts: Vec::new(),
            is_complete: false,
        };
        self.time_remaining = session.total_time_allowed;
        self.current_index = 0;

        crate::store::save(&self.store, CURRENT_SESSION_KEY, &session)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Record one answer: a single atomic append plus a persistence write.
    /// `answer` of None records a timeout on the current question.
    pub fn submit_answer(
        &mut self,
        answer: Option<Choice>,
        time_spent: f64,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let Some(session) = self.session.as_mut() else {
            bail!("no session in progress");
        };
        if session.is_complete {
            bail!("session is already complete");
        }
        let Some(question) = self.questions.get(self.current_index) else {
            bail!("no question pending");
        };

        let attempt = QuestionAttempt::record(
            question,
            answer,
            time_spent,
            now,
            &session.id,
            session.mode,
        );
        session.attempts.push(attempt);
        crate::store::save(&self.store, CURRENT_SESSION_KEY, session)?;

        self.current_index += 1;
        if self.current_index >= self.questions.len() {
            self.end_session(now)?;
            Ok(SubmitOutcome::Completed)
        } else {
            Ok(SubmitOutcome::Next)
        }
    }

    /// One second of countdown. Returns true when the budget ran out and the
    /// session was finalized (same path as a manual end).
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if self.session.as_ref().is_none_or(|s| s.is_complete) {
            return Ok(false);
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.end_session(now)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Finalize the session: stamp the end time, append to history, clear
    /// the in-progress key.
    pub fn end_session(&mut self, now: DateTime<Utc>) -> Result<ExamSession> {
        let Some(session) = self.session.as_mut() else {
            bail!("no session in progress");
        };
        if !session.is_complete {
            session.end_time = Some(now);
            session.is_complete = true;

            let mut history: ExamHistoryData =
                crate::store::load_or_default(&self.store, EXAM_HISTORY_KEY)?;
            history.sessions.push(session.clone());
            crate::store::save(&self.store, EXAM_HISTORY_KEY, &history)?;
            self.store.remove(CURRENT_SESSION_KEY)?;
        }
        Ok(session.clone())
    }

    pub fn history(&self) -> Result<Vec<ExamSession>> {
        let history: ExamHistoryData =
            crate::store::load_or_default(&self.store, EXAM_HISTORY_KEY)?;
        Ok(history.sessions)
    }
}
