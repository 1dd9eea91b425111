//! JSON persistence of the quiz session between CLI runs.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::CoreError;
use crate::session::QuizSession;

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/session.json`.
    pub fn default_location() -> Result<Self, CoreError> {
        Ok(Self::new(data_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored session, or a fresh one if the file is missing or unreadable.
    pub fn load(&self) -> QuizSession {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return QuizSession::new(),
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "discarding corrupt session file"
            );
            QuizSession::new()
        })
    }

    pub fn save(&self, session: &QuizSession) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
