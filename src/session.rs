use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::key::Key;
use crate::scoring::{Outcome, Scoring};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Idle,
    Running,
    Finished,
}

/// How a session ends, fixed when the session is created
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mode {
    /// Ends when the whole text has been typed. `target_length` is the word
    /// count the text was generated for.
    Words { target_length: usize },
    /// Ends when the countdown reaches zero, or earlier if the text runs out.
    Time { limit_seconds: u64 },
}

impl Mode {
    pub fn limit_seconds(&self) -> Option<u64> {
        match self {
            Mode::Words { .. } => None,
            Mode::Time { limit_seconds } => Some(*limit_seconds),
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Time { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub from: Status,
    pub to: Status,
}

/// Which of the once-per-second tickers this session has armed.
///
/// The host owns the clock and forwards ticks only while `is_armed`; the
/// front end shows a live countdown only while `countdown_armed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tickers {
    elapsed: bool,
    countdown: bool,
}

impl Tickers {
    fn start(&mut self, mode: &Mode) {
        self.elapsed = true;
        self.countdown = mode.is_timed();
    }

    fn stop(&mut self) {
        self.elapsed = false;
        self.countdown = false;
    }

    pub fn is_armed(&self) -> bool {
        self.elapsed
    }

    pub fn countdown_armed(&self) -> bool {
        self.countdown
    }
}

/// Everything a front end needs to draw one frame, taken after a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub status: Status,
    pub mode: Mode,
    pub cursor_index: usize,
    pub text_length: usize,
    pub correct_count: usize,
    pub error_count: usize,
    pub words_per_minute: u32,
    pub accuracy_percent: u32,
    pub elapsed_seconds: u64,
    pub remaining_seconds: Option<u64>,
}

/// A single typing test over one reference text.
///
/// All counters change only through [`Session::apply_key`] and
/// [`Session::tick`]. Once finished, both are no-ops until [`Session::reset`].
#[derive(Debug)]
pub struct Session {
    reference: Vec<char>,
    mode: Mode,
    status: Status,
    typed: Vec<char>,
    correct_count: usize,
    error_count: usize,
    elapsed_seconds: u64,
    remaining_seconds: Option<u64>,
    tickers: Tickers,
    subscribers: Vec<Sender<StatusChange>>,
}

impl Session {
    pub fn new(reference_text: impl Into<String>, mode: Mode) -> Self {
        let reference: Vec<char> = reference_text.into().chars().collect();
        let remaining_seconds = mode.limit_seconds();

        // nothing to type, or no time to type it in
        let status = if reference.is_empty() || remaining_seconds == Some(0) {
            Status::Finished
        } else {
            Status::Idle
        };

        info!(
            text_length = reference.len(),
            ?mode,
            %status,
            "session created"
        );

        Self {
            reference,
            mode,
            status,
            typed: Vec::new(),
            correct_count: 0,
            error_count: 0,
            elapsed_seconds: 0,
            remaining_seconds,
            tickers: Tickers::default(),
            subscribers: Vec::new(),
        }
    }

    /// Receive every status transition of this session from now on
    pub fn subscribe(&mut self) -> Receiver<StatusChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn apply_key(&mut self, key: Key) -> Snapshot {
        if self.status == Status::Finished {
            return self.snapshot();
        }

        if self.status == Status::Idle {
            // any other key starts the clock, even one that is never scored
            if key.is_modifier() {
                return self.snapshot();
            }
            self.start();
        }

        match key {
            Key::Backspace => {
                if self.typed.pop().is_some() {
                    trace!(cursor = self.cursor_index(), "backspace");
                }
            }
            Key::Char(c) if self.cursor_index() < self.reference.len() => {
                let expected = self.reference[self.cursor_index()];
                if c == expected {
                    self.correct_count += 1;
                } else {
                    self.error_count += 1;
                }
                self.typed.push(c);
            }
            _ => {}
        }

        if self.cursor_index() == self.reference.len() {
            self.finish();
        }

        self.snapshot()
    }

    /// Advance the clocks by one second. Only a running session ticks.
    pub fn tick(&mut self) -> Snapshot {
        if self.status != Status::Running {
            return self.snapshot();
        }

        self.elapsed_seconds += 1;

        if let Some(remaining) = self.remaining_seconds.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.finish();
            }
        }

        self.snapshot()
    }

    /// Start over with the same mode, typing either `new_text` or the current
    /// text again. Everything else starts from scratch; only subscribers carry
    /// over, and they are told about the status change.
    pub fn reset(&mut self, new_text: Option<String>) {
        self.tickers.stop();

        let text = new_text.unwrap_or_else(|| self.reference_text());
        let subscribers = std::mem::take(&mut self.subscribers);
        let from = self.status;

        *self = Session::new(text, self.mode);
        self.subscribers = subscribers;

        if from != self.status {
            let to = self.status;
            self.status = from;
            self.transition(to);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let scoring = self.scoring();

        Snapshot {
            status: self.status,
            mode: self.mode,
            cursor_index: self.cursor_index(),
            text_length: self.reference.len(),
            correct_count: self.correct_count,
            error_count: self.error_count,
            words_per_minute: scoring.words_per_minute(),
            accuracy_percent: scoring.accuracy_percent(),
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds,
        }
    }

    pub fn scoring(&self) -> Scoring<'_> {
        Scoring {
            reference: &self.reference,
            typed: &self.typed,
            correct_count: self.correct_count,
            error_count: self.error_count,
            elapsed_seconds: self.elapsed_seconds,
        }
    }

    pub fn classify(&self, position: usize) -> Outcome {
        self.scoring().classify(position)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn reference(&self) -> &[char] {
        &self.reference
    }

    pub fn reference_text(&self) -> String {
        self.reference.iter().collect()
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn cursor_index(&self) -> usize {
        self.typed.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.remaining_seconds
    }

    pub fn tickers(&self) -> Tickers {
        self.tickers
    }

    pub fn words_per_minute(&self) -> u32 {
        self.scoring().words_per_minute()
    }

    pub fn accuracy_percent(&self) -> u32 {
        self.scoring().accuracy_percent()
    }

    fn start(&mut self) {
        self.tickers.start(&self.mode);
        self.transition(Status::Running);
    }

    fn finish(&mut self) {
        self.tickers.stop();
        self.transition(Status::Finished);
        info!(
            wpm = self.words_per_minute(),
            accuracy = self.accuracy_percent(),
            errors = self.error_count,
            elapsed = self.elapsed_seconds,
            "session finished"
        );
    }

    fn transition(&mut self, to: Status) {
        let change = StatusChange {
            from: self.status,
            to,
        };
        debug!(from = %change.from, to = %change.to, "status change");
        self.status = to;
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }
}
