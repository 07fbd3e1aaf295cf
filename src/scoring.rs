/// Characters counted as one word when converting keystrokes to wpm.
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Untyped,
    Correct,
    Incorrect,
}

/// Read-only view over the text being typed and what has been entered so far.
///
/// Holds no state of its own; every metric is recomputed from the counters it
/// borrows, so it always reflects the latest transition.
#[derive(Clone, Copy, Debug)]
pub struct Scoring<'a> {
    pub reference: &'a [char],
    pub typed: &'a [char],
    pub correct_count: usize,
    pub error_count: usize,
    pub elapsed_seconds: u64,
}

impl Scoring<'_> {
    pub fn cursor_index(&self) -> usize {
        self.typed.len()
    }

    pub fn classify(&self, position: usize) -> Outcome {
        match (self.typed.get(position), self.reference.get(position)) {
            (Some(typed), Some(expected)) if typed == expected => Outcome::Correct,
            (Some(_), _) => Outcome::Incorrect,
            (None, _) => Outcome::Untyped,
        }
    }

    pub fn words_per_minute(&self) -> u32 {
        words_per_minute(self.correct_count, self.elapsed_seconds)
    }

    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.cursor_index(), self.error_count)
    }
}

pub fn words_per_minute(correct_count: usize, elapsed_seconds: u64) -> u32 {
    if elapsed_seconds == 0 {
        return 0;
    }

    let words = correct_count as f64 / CHARS_PER_WORD;
    let minutes = elapsed_seconds as f64 / 60.0;

    (words / minutes).round() as u32
}

/// Accuracy over the positions visited so far, 100 before any input.
///
/// Errors are never taken back by backspace, so they can outnumber the
/// current cursor; the numerator saturates at zero.
pub fn accuracy_percent(cursor_index: usize, error_count: usize) -> u32 {
    if cursor_index == 0 {
        return 100;
    }

    let accurate = cursor_index.saturating_sub(error_count) as f64;

    ((accurate / cursor_index as f64) * 100.0).round() as u32
}
