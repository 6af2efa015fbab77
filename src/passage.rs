use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// A named collection of reference texts embedded in the binary.
#[derive(Deserialize, Clone, Debug)]
pub struct PassageSet {
    pub name: String,
    pub passages: Vec<String>,
}

impl PassageSet {
    pub fn new(file_name: &str) -> Self {
        let file = PASSAGE_DIR
            .get_file(format!("{file_name}.json"))
            .expect("Passage file not found");

        let file_as_str = file
            .contents_utf8()
            .expect("Unable to interpret file as a string");

        from_str(file_as_str).expect("Unable to deserialize passage json")
    }

    /// The default text shown when the app starts.
    pub fn first(&self) -> &str {
        self.passages.first().map(String::as_str).unwrap_or("")
    }

    pub fn random(&self) -> &str {
        self.passages
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("")
    }
}
