use rand::Rng;

/// The literal alphabet embedded in stories when requested
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// One step of turning picked words into a story
pub trait StoryFormatter {
    fn format(&self, words: Vec<String>, rng: &mut dyn rand::RngCore) -> Vec<String>;
}

/// Swaps some words for numbers
pub struct NumberFormatter;

impl StoryFormatter for NumberFormatter {
    fn format(&self, words: Vec<String>, rng: &mut dyn rand::RngCore) -> Vec<String> {
        let count = words.len();
        let mut words: Vec<String> = words
            .into_iter()
            .map(|word| {
                if rng.gen_bool(0.15) {
                    random_number(rng)
                } else {
                    word
                }
            })
            .collect();

        // make sure at least one number shows up
        if count > 0 && !words.iter().any(|w| w.chars().all(|c| c.is_ascii_digit())) {
            let idx = rng.gen_range(0..count);
            words[idx] = random_number(rng);
        }

        words
    }
}

fn random_number(rng: &mut dyn rand::RngCore) -> String {
    match rng.gen_range(0..10) {
        0..=5 => rng.gen_range(0..100).to_string(),
        6..=8 => rng.gen_range(100..2100).to_string(),
        _ => rng.gen_range(10_000..1_000_000).to_string(),
    }
}

/// Places the full alphabet somewhere in the story
pub struct AlphabetFormatter;

impl StoryFormatter for AlphabetFormatter {
    fn format(&self, mut words: Vec<String>, rng: &mut dyn rand::RngCore) -> Vec<String> {
        let idx = rng.gen_range(0..=words.len());
        words.insert(idx, ALPHABET.to_string());
        words
    }
}

/// Groups words into sentences with capitals, commas and end marks
pub struct PunctuationFormatter;

impl StoryFormatter for PunctuationFormatter {
    fn format(&self, words: Vec<String>, rng: &mut dyn rand::RngCore) -> Vec<String> {
        let mut result = Vec::with_capacity(words.len());
        let mut sentence_left = 0;
        let last = words.len().saturating_sub(1);

        for (i, word) in words.into_iter().enumerate() {
            let starts_sentence = sentence_left == 0;
            if starts_sentence {
                sentence_left = rng.gen_range(5..=12);
            }
            sentence_left -= 1;

            let mut formatted = if starts_sentence && word != ALPHABET {
                capitalize_first_letter(&word)
            } else {
                word
            };

            if sentence_left == 0 || i == last {
                let end = match rng.gen_range(0..100) {
                    0..=79 => '.',
                    80..=91 => '!',
                    _ => '?',
                };
                formatted.push(end);
                sentence_left = 0;
            } else if rng.gen_bool(0.12) {
                formatted.push(',');
            }

            result.push(formatted);
        }

        result
    }
}

pub fn capitalize_first_letter(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Runs formatters in order
#[derive(Default)]
pub struct CompositeFormatter {
    formatters: Vec<Box<dyn StoryFormatter>>,
}

impl CompositeFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_formatter(mut self, formatter: Box<dyn StoryFormatter>) -> Self {
        self.formatters.push(formatter);
        self
    }

    pub fn build_from_flags(punctuation: bool, numbers: bool, alphabet: bool) -> Self {
        let mut composite = CompositeFormatter::new();

        if numbers {
            composite = composite.add_formatter(Box::new(NumberFormatter));
        }
        if alphabet {
            composite = composite.add_formatter(Box::new(AlphabetFormatter));
        }
        // last, so the alphabet and numbers end up inside sentences
        if punctuation {
            composite = composite.add_formatter(Box::new(PunctuationFormatter));
        }

        composite
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl StoryFormatter for CompositeFormatter {
    fn format(&self, words: Vec<String>, rng: &mut dyn rand::RngCore) -> Vec<String> {
        self.formatters
            .iter()
            .fold(words, |words, formatter| formatter.format(words, rng))
    }
}
