use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use super::StoryError;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// A bundled list of words to build stories from
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn load(name: &str) -> Result<Self, StoryError> {
        let file_name = format!("{name}.json");
        let file = WORDS_DIR
            .get_file(&file_name)
            .ok_or_else(|| StoryError::WordList(format!("{file_name} not bundled")))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| StoryError::WordList(format!("{file_name} is not utf-8")))?;

        let list: WordList = serde_json::from_str(contents)
            .map_err(|e| StoryError::WordList(format!("{file_name}: {e}")))?;

        if list.words.is_empty() {
            return Err(StoryError::EmptyWordList);
        }

        Ok(list)
    }

    pub fn english() -> Result<Self, StoryError> {
        Self::load("english")
    }

    /// Draw `count` words, repeating words when the list is shorter
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
        (0..count)
            .filter_map(|_| self.words.choose(rng).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_english_is_bundled() {
        let list = WordList::english().unwrap();

        assert_eq!(list.name, "english");
        assert_eq!(list.size as usize, list.words.len());
        assert!(list.words.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn test_missing_list() {
        let err = WordList::load("klingon").unwrap_err();
        assert!(matches!(err, StoryError::WordList(_)));
    }

    #[test]
    fn test_pick_more_than_available() {
        let list = WordList {
            name: "tiny".into(),
            size: 2,
            words: vec!["ab".into(), "cd".into()],
        };
        let mut rng = StdRng::seed_from_u64(7);

        let picked = list.pick(&mut rng, 9);
        assert_eq!(picked.len(), 9);
        assert!(picked.iter().all(|w| w == "ab" || w == "cd"));
    }

    #[test]
    fn test_pick_zero() {
        let list = WordList::english().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(list.pick(&mut rng, 0).is_empty());
    }
}
