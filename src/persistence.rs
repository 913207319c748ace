use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::PersistenceError;
use crate::util::time;

/// Seconds between periodic saves
pub const AUTOSAVE_INTERVAL_SECS: u64 = 60 * 5;

/// Subdirectory of the data directory that receives PDF exports
pub const EXPORT_DIR: &str = "exports";

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Saves and loads notes as JSON files in a data directory
#[derive(Debug, Clone)]
pub struct NoteStore {
    data_dir: PathBuf,
}

impl NoteStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, name: &str) -> PersistenceResult<PathBuf> {
        join_bare(&self.data_dir, name)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(EXPORT_DIR)
    }

    /// Writes `doc` under its own name and marks it saved
    pub fn save(&self, doc: &mut Document) -> PersistenceResult<PathBuf> {
        let path = self.path_for(doc.name())?;
        fs::create_dir_all(&self.data_dir)?;

        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&path, json)?;

        doc.mark_saved(time::timestamp_secs());
        log::info!("Saved notes to {}", path.display());
        Ok(path)
    }

    /// Reads the notes stored as `name`
    pub fn load(&self, name: &str) -> PersistenceResult<Document> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(PersistenceError::NotFound(name.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let mut doc: Document = serde_json::from_str(&json)?;
        doc.rename(name);
        doc.mark_saved(time::timestamp_secs());
        log::info!("Loaded {} blocks from {}", doc.len(), path.display());
        Ok(doc)
    }

    /// Names of all saved notes, sorted
    pub fn list(&self) -> PersistenceResult<Vec<String>> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&self.data_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Writes a rendered PDF as `<stem>.pdf` in the export directory
    pub fn write_export(&self, stem: &str, pdf: &[u8]) -> PersistenceResult<PathBuf> {
        let dir = self.export_dir();
        let path = join_bare(&dir, &format!("{stem}.pdf"))?;
        fs::create_dir_all(&dir)?;
        fs::write(&path, pdf)?;
        log::info!("Exported {} bytes to {}", pdf.len(), path.display());
        Ok(path)
    }

    /// Periodic saving applies only to notes the user has named
    pub fn should_autosave(&self, doc: &Document, now: u64) -> bool {
        if doc.name_is_new() {
            return false;
        }
        match doc.last_saved() {
            Some(last) => now.saturating_sub(last) > AUTOSAVE_INTERVAL_SECS,
            None => true,
        }
    }
}

/// Joins `name` onto `dir` when it is a bare file name.
/// Anything else could escape the directory.
fn join_bare(dir: &Path, name: &str) -> PersistenceResult<PathBuf> {
    match Path::new(name).file_name() {
        Some(file) if file == name => Ok(dir.join(file)),
        _ => Err(PersistenceError::InvalidName(name.to_string())),
    }
}
