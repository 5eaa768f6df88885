use crate::models::{SentenceDb, StoredSentence, sentence_hash};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid store directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sentence records on disk, one `<hash>.json` file per sentence.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    root: PathBuf,
}

impl AnnotationStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::InvalidRoot(root));
        }
        Ok(Self { root })
    }

    /// Opens `root`, creating it first if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, sentence: &str) -> PathBuf {
        self.root.join(format!("{}.json", sentence_hash(sentence)))
    }

    /// Write a record, replacing any earlier one for the same sentence
    pub fn save(&self, record: &StoredSentence) -> Result<PathBuf, StoreError> {
        let path = self.record_path(&record.sentence);
        let mut record = record.clone();
        record.hash = Some(sentence_hash(&record.sentence));
        let json = serde_json::to_string_pretty(&record).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json)?;
        log::info!("saved {:?} to {}", record.sentence, path.display());
        Ok(path)
    }

    /// Saves records with something in them and deletes empty ones.
    ///
    /// Returns `true` when a record was written.
    pub fn persist(&self, record: &StoredSentence) -> Result<bool, StoreError> {
        if record.data.is_empty() {
            self.delete(&record.sentence)?;
            Ok(false)
        } else {
            self.save(record)?;
            Ok(true)
        }
    }

    pub fn load(&self, sentence: &str) -> Result<Option<StoredSentence>, StoreError> {
        let path = self.record_path(sentence);
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Returns `true` when there was a record to delete.
    pub fn delete(&self, sentence: &str) -> Result<bool, StoreError> {
        let path = self.record_path(sentence);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        log::info!("deleted record for {sentence:?}");
        Ok(true)
    }

    /// Every record in the store, keyed by sentence. Non-JSON files are ignored.
    pub fn load_all(&self) -> Result<SentenceDb, StoreError> {
        let mut db = SentenceDb::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "json"
            {
                let record = read_record(&path)?;
                db.insert(record.sentence.clone(), record);
            }
        }
        Ok(db)
    }
}

fn read_record(path: &Path) -> Result<StoredSentence, StoreError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
