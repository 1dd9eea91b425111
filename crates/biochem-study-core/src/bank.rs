//! Study content: module catalog, practice questions, quiz questions and
//! flashcards.
//!
//! Difficulty labels arrive as loose strings ("Core", "Advanced", "intro")
//! and are collapsed into [`DifficultyBand`] while deserializing, so nothing
//! downstream ever branches on a raw label.

use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BankError;
use crate::planner::DifficultyBand;

const BUILTIN_BANK: &str = include_str!("../data/biomed_bank.json");

fn band_from_label<'de, D>(deserializer: D) -> Result<DifficultyBand, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    Ok(DifficultyBand::from_label(&label))
}

/// A curriculum module. Its id and focus areas feed topic selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub hours_planned: u32,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub lab_skills: Vec<String>,
    #[serde(deserialize_with = "band_from_label")]
    pub difficulty: DifficultyBand,
    #[serde(default)]
    pub upcoming_check: String,
    #[serde(default)]
    pub callout: String,
}

/// Open-ended practice item (stem, model answer, rationale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub id: u32,
    pub stem: String,
    pub answer: String,
    pub rationale: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "band_from_label")]
    pub difficulty: DifficultyBand,
}

/// Multiple-choice quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    pub topic: String,
    #[serde(deserialize_with = "band_from_label")]
    pub difficulty: DifficultyBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: u32,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Everything a quiz request can draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBank {
    #[serde(default)]
    pub modules: Vec<ModuleDefinition>,
    #[serde(default)]
    pub practice_questions: Vec<PracticeQuestion>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

impl QuestionBank {
    /// The bundled biomedical review bank.
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(BUILTIN_BANK)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, BankError> {
        let json = std::fs::read_to_string(path).map_err(|source| BankError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Distinct quiz-question topics, in first-seen order.
    pub fn question_topics(&self) -> Vec<String> {
        self.quiz_questions
            .iter()
            .map(|q| q.topic.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}
