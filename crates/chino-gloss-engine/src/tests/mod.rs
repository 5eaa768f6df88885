use serde_json::Map;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::models::{Furigana, Word};

/// Create a temporary annotation store directory
pub fn create_test_store_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file with content inside a test directory
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

pub fn tokens(surfaces: &[&str]) -> Vec<String> {
    surfaces.iter().map(|s| s.to_string()).collect()
}

/// One plain (reading-less) furigana piece per morpheme
pub fn furigana(surfaces: &[&str]) -> Vec<Vec<Furigana>> {
    surfaces.iter().map(|s| vec![Furigana::from(*s)]).collect()
}

pub fn word(id: &str) -> Word {
    Word {
        id: id.to_string(),
        rest: Map::new(),
    }
}
