use crate::error::{EditorError, Result};
use crate::vector::ProbabilityVector;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// String key-value storage the editor snapshots into.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(EditorError::Storage {
                message: format!("invalid storage key {key:?}"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

pub fn encode_snapshot(vector: &ProbabilityVector) -> Result<String> {
    Ok(serde_json::to_string(vector)?)
}

pub fn decode_snapshot(text: &str) -> Result<ProbabilityVector> {
    let values: Vec<f64> = serde_json::from_str(text)?;
    ProbabilityVector::from_values(values)
}

/// Reads the stored vector, falling back to the default pair when the key is
/// missing or unreadable.
pub fn load_or_default(store: &dyn Store, key: &str) -> ProbabilityVector {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            tracing::debug!(key, "no stored probabilities, using default");
            return ProbabilityVector::default();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored probabilities");
            return ProbabilityVector::default();
        }
    };

    match decode_snapshot(&text) {
        Ok(vector) => vector,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable snapshot");
            ProbabilityVector::default()
        }
    }
}

/// Coalesces snapshot writes: only the latest payload is kept, and it is
/// written once no newer one has arrived for `window`.
#[derive(Clone, Debug)]
pub struct DebouncedWriter {
    key: String,
    window: Duration,
    pending: Option<Pending>,
}

#[derive(Clone, Debug)]
struct Pending {
    payload: String,
    due: Instant,
}

impl DebouncedWriter {
    pub fn new(key: impl Into<String>, window: Duration) -> Self {
        Self {
            key: key.into(),
            window,
            pending: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule(&mut self, vector: &ProbabilityVector, now: Instant) -> Result<()> {
        self.pending = Some(Pending {
            payload: encode_snapshot(vector)?,
            due: now + self.window,
        });
        Ok(())
    }

    /// Writes the pending snapshot if its quiet period has elapsed.
    pub fn poll(&mut self, store: &mut dyn Store, now: Instant) -> Result<bool> {
        let due = matches!(&self.pending, Some(p) if now >= p.due);
        if !due {
            return Ok(false);
        }
        self.flush(store)
    }

    pub fn flush(&mut self, store: &mut dyn Store) -> Result<bool> {
        let Some(p) = self.pending.take() else {
            return Ok(false);
        };
        if let Err(e) = store.set(&self.key, &p.payload) {
            self.pending = Some(p);
            return Err(e);
        }
        tracing::debug!(key = %self.key, "snapshot written");
        Ok(true)
    }
}
