//! # Biochem Study Core Library
//!
//! This library provides the core logic for the biochem study quiz engine.
//! Every operation is available through the standalone `biochem-study` CLI,
//! which is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Planner**: Pure topic selection, difficulty weighting and seeded
//!   shuffling
//! - **Quiz**: Request pipeline assembling a question batch from a bank
//! - **Timer**: A wall-clock-based session countdown driven by an injectable
//!   scheduler, with drift reconciliation against server time
//! - **Storage**: TOML-based configuration and JSON session persistence
//!
//! ## Key Components
//!
//! - [`LocalStudyApi`]: Answers quiz requests from a [`QuestionBank`]
//! - [`QuizSession`]: Client-side session context threaded through requests
//! - [`SessionTimer`]: Session countdown state machine
//! - [`Config`]: Application configuration management

pub mod bank;
pub mod error;
pub mod planner;
pub mod quiz;
pub mod session;
pub mod storage;
pub mod timer;

pub use bank::{Flashcard, ModuleDefinition, PracticeQuestion, QuestionBank, QuizQuestion};
pub use error::{BankError, ConfigError, CoreError};
pub use planner::{DifficultyBand, DifficultyCounts, DifficultyWeights};
pub use quiz::{LocalStudyApi, QuizPlan, QuizRequest, QuizResponse, StudyApi};
pub use session::QuizSession;
pub use storage::{Config, SessionFile};
pub use timer::{SessionTimer, TimerOptions, TimerSnapshot, TimerState};
