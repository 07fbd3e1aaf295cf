//! Story generation: where the text for a typing session comes from.
//!
//! A session never asks for text itself. The host builds a [`StoryRequest`],
//! hands it to a [`StoryProvider`] and only creates a session once a story
//! came back.

pub mod formatter;
pub mod words;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use formatter::{CompositeFormatter, StoryFormatter, ALPHABET};
pub use words::WordList;

/// How many times [`RetryingProvider`] calls its inner provider at most
pub const DEFAULT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub include_punctuation: bool,
    pub include_numbers: bool,
    pub include_alphabet: bool,
    pub target_word_count: usize,
    /// Different seeds give different stories for the same options
    pub uniqueness_seed: String,
}

impl StoryRequest {
    pub fn is_plain(&self) -> bool {
        !self.include_punctuation && !self.include_numbers && !self.include_alphabet
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub story: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("unable to load word list: {0}")]
    WordList(String),

    #[error("word list contains no words")]
    EmptyWordList,

    #[error("story provider unavailable: {0}")]
    Unavailable(String),

    /// Every attempt of a [`RetryingProvider`] failed; `last` is the final cause
    #[error("story generation failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: usize,
        last: Box<StoryError>,
    },
}

pub trait StoryProvider {
    fn generate(&self, request: &StoryRequest) -> Result<Story, StoryError>;
}

impl<P: StoryProvider + ?Sized> StoryProvider for Box<P> {
    fn generate(&self, request: &StoryRequest) -> Result<Story, StoryError> {
        (**self).generate(request)
    }
}

/// Builds stories from the bundled word list.
///
/// Output is a pure function of the request, so a repeated seed replays the
/// same story.
#[derive(Debug, Clone)]
pub struct WordListProvider {
    words: WordList,
}

impl WordListProvider {
    pub fn new(words: WordList) -> Self {
        Self { words }
    }

    pub fn english() -> Result<Self, StoryError> {
        Ok(Self::new(WordList::english()?))
    }
}

impl StoryProvider for WordListProvider {
    fn generate(&self, request: &StoryRequest) -> Result<Story, StoryError> {
        if request.is_plain() && request.target_word_count == 0 {
            return Ok(Story {
                story: String::new(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed_to_u64(&request.uniqueness_seed));
        let words = self.words.pick(&mut rng, request.target_word_count);

        let formatter = CompositeFormatter::build_from_flags(
            request.include_punctuation,
            request.include_numbers,
            request.include_alphabet,
        );
        let story = formatter.format(words, &mut rng).join(" ");

        debug!(
            words = request.target_word_count,
            chars = story.chars().count(),
            "generated story"
        );

        Ok(Story { story })
    }
}

fn seed_to_u64(seed: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    hasher.finish()
}

/// Always hands out the same text, e.g. a prompt given on the command line
#[derive(Debug, Clone)]
pub struct FixedStoryProvider {
    story: String,
}

impl FixedStoryProvider {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
        }
    }
}

impl StoryProvider for FixedStoryProvider {
    fn generate(&self, _request: &StoryRequest) -> Result<Story, StoryError> {
        Ok(Story {
            story: self.story.clone(),
        })
    }
}

/// Calls the inner provider again when it fails, up to `attempts` times
#[derive(Debug, Clone)]
pub struct RetryingProvider<P> {
    inner: P,
    attempts: usize,
}

impl<P: StoryProvider> RetryingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_attempts(inner, DEFAULT_ATTEMPTS)
    }

    pub fn with_attempts(inner: P, attempts: usize) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
        }
    }
}

impl<P: StoryProvider> StoryProvider for RetryingProvider<P> {
    fn generate(&self, request: &StoryRequest) -> Result<Story, StoryError> {
        let mut last = None;

        for attempt in 1..=self.attempts {
            match self.inner.generate(request) {
                Ok(story) => return Ok(story),
                Err(err) => {
                    warn!(attempt, error = %err, "story generation failed");
                    last = Some(err);
                }
            }
        }

        Err(StoryError::Exhausted {
            attempts: self.attempts,
            last: Box::new(last.unwrap_or(StoryError::EmptyWordList)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn request(words: usize, seed: &str) -> StoryRequest {
        StoryRequest {
            include_punctuation: false,
            include_numbers: false,
            include_alphabet: false,
            target_word_count: words,
            uniqueness_seed: seed.to_string(),
        }
    }

    #[test]
    fn test_plain_story_has_requested_words() {
        let provider = WordListProvider::english().unwrap();
        let story = provider.generate(&request(25, "a")).unwrap().story;

        assert_eq!(story.split(' ').count(), 25);
        assert!(story.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
    }

    #[test]
    fn test_same_seed_same_story() {
        let provider = WordListProvider::english().unwrap();
        let a = provider.generate(&request(10, "seed-1")).unwrap();
        let b = provider.generate(&request(10, "seed-1")).unwrap();
        let c = provider.generate(&request(10, "seed-2")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_plain_words_is_empty() {
        let provider = WordListProvider::english().unwrap();
        let story = provider.generate(&request(0, "x")).unwrap();
        assert_eq!(story.story, "");
    }

    #[test]
    fn test_zero_words_with_alphabet() {
        let provider = WordListProvider::english().unwrap();
        let mut req = request(0, "x");
        req.include_alphabet = true;

        assert_eq!(provider.generate(&req).unwrap().story, ALPHABET);
    }

    #[test]
    fn test_all_options() {
        let provider = WordListProvider::english().unwrap();
        let req = StoryRequest {
            include_punctuation: true,
            include_numbers: true,
            include_alphabet: true,
            target_word_count: 40,
            uniqueness_seed: "all".into(),
        };
        let story = provider.generate(&req).unwrap().story;

        assert!(story.contains(ALPHABET));
        assert!(story.chars().any(|c| c.is_ascii_digit()));
        assert!(story.ends_with(['.', '!', '?']));
    }

    #[test]
    fn test_fixed_provider() {
        let provider = FixedStoryProvider::new("custom prompt");
        let story = provider.generate(&request(99, "ignored")).unwrap();
        assert_eq!(story.story, "custom prompt");
    }

    struct Flaky {
        failures: Cell<usize>,
        calls: Cell<usize>,
    }

    impl StoryProvider for Flaky {
        fn generate(&self, _request: &StoryRequest) -> Result<Story, StoryError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(StoryError::Unavailable("offline".into()));
            }
            Ok(Story {
                story: "back online".into(),
            })
        }
    }

    #[test]
    fn test_retry_recovers() {
        let provider = RetryingProvider::new(Flaky {
            failures: Cell::new(2),
            calls: Cell::new(0),
        });

        let story = provider.generate(&request(1, "r")).unwrap();
        assert_eq!(story.story, "back online");
        assert_eq!(provider.inner.calls.get(), 3);
    }

    #[test]
    fn test_retry_gives_up() {
        let provider = RetryingProvider::new(Flaky {
            failures: Cell::new(10),
            calls: Cell::new(0),
        });

        let err = provider.generate(&request(1, "r")).unwrap_err();
        assert_eq!(provider.inner.calls.get(), DEFAULT_ATTEMPTS);
        assert_eq!(
            err.to_string(),
            "story generation failed after 3 attempts: story provider unavailable: offline"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoryError::WordList("english.json not bundled".into()).to_string(),
            "unable to load word list: english.json not bundled"
        );
        assert_eq!(
            StoryError::EmptyWordList.to_string(),
            "word list contains no words"
        );

        let err: Box<dyn std::error::Error> = Box::new(StoryError::Unavailable("offline".into()));
        assert_eq!(err.to_string(), "story provider unavailable: offline");
    }

    #[test]
    fn test_boxed_provider() {
        let provider: Box<dyn StoryProvider> = Box::new(FixedStoryProvider::new("boxed"));
        assert_eq!(provider.generate(&request(1, "b")).unwrap().story, "boxed");
    }
}
