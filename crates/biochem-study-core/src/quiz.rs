//! Quiz request pipeline.
//!
//! ```text
//! request -> resolve topics -> filter pool -> seeded shuffle
//!         -> scale difficulty -> walk plan slots -> pick one question per slot
//! ```
//!
//! [`StudyApi`] is the seam the presentation layer talks to. [`LocalStudyApi`]
//! answers from an in-memory [`QuestionBank`]; transport, latency and retries
//! belong to whoever wraps it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bank::{PracticeQuestion, QuestionBank, QuizQuestion};
use crate::error::CoreError;
use crate::planner::{
    plan_slots, randomize_questions, scale_difficulty, select_topics, BandOverrides,
    DifficultyBand, DifficultyCounts, DifficultyScaling, TopicSelection,
};
use crate::session::new_token;
use crate::storage::BankConfig;

/// Parameters for one quiz question request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub topic_ids: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Defaults to 1; values below 1 are raised to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_performance: Option<BandOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_difficulty_mix: Option<BandOverrides>,
}

impl QuizRequest {
    pub fn batch_size(&self) -> i64 {
        self.batch_size.unwrap_or(1).max(1)
    }

    /// `topic_ids` followed by `topic_id`.
    pub fn requested_topics(&self) -> Vec<String> {
        self.topic_ids
            .iter()
            .chain(self.topic_id.iter())
            .cloned()
            .collect()
    }
}

/// What a request committed to: resolved topics and per-band counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPlan {
    pub topics: Vec<String>,
    pub difficulty_assignments: DifficultyCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub session_id: String,
    pub sequence: u32,
    pub total: u32,
    pub question: QuizQuestion,
    pub plan: QuizPlan,
    /// Ids of every question picked for the planned batch, in slot order.
    #[serde(default)]
    pub selection: Vec<u32>,
}

/// The two calls the presentation layer makes.
pub trait StudyApi {
    fn fetch_practice_questions(&self) -> Result<Vec<PracticeQuestion>, CoreError>;

    fn request_quiz_question(&self, request: &QuizRequest) -> Result<QuizResponse, CoreError>;
}

/// [`StudyApi`] backed by an in-memory bank.
#[derive(Debug, Clone)]
pub struct LocalStudyApi {
    bank: QuestionBank,
    question_topics: Vec<String>,
}

impl LocalStudyApi {
    pub fn new(bank: QuestionBank) -> Self {
        let question_topics = bank.question_topics();
        Self {
            bank,
            question_topics,
        }
    }

    /// API over the bank `config` points at, the built-in one by default.
    pub fn from_config(config: &BankConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.load()?))
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Narrow the request to topics the bank actually has questions for.
    ///
    /// Falls back to the explicitly requested topics that exist, then to every
    /// bank topic.
    pub fn resolve_topics(&self, request: &QuizRequest) -> Vec<String> {
        let requested = request.requested_topics();
        let limit = usize::try_from(request.batch_size()).unwrap_or(usize::MAX);
        let selected = select_topics(&TopicSelection {
            modules: &self.bank.modules,
            requested_topics: &requested,
            focus_areas: &request.focus_areas,
            limit,
        });

        let known = |topic: &String| self.question_topics.contains(topic);

        let valid: Vec<String> = selected.into_iter().filter(|t| known(t)).collect();
        if !valid.is_empty() {
            return valid;
        }

        let requested_valid: Vec<String> = requested.into_iter().filter(|t| known(t)).collect();
        if !requested_valid.is_empty() {
            return requested_valid;
        }

        self.question_topics.clone()
    }

    /// Questions on any of `topics`; the whole bank when that leaves nothing.
    pub fn filter_pool(&self, topics: &[String]) -> Vec<QuizQuestion> {
        if topics.is_empty() {
            return self.bank.quiz_questions.clone();
        }
        let wanted: HashSet<&str> = topics.iter().map(String::as_str).collect();
        let pool: Vec<QuizQuestion> = self
            .bank
            .quiz_questions
            .iter()
            .filter(|q| wanted.contains(q.topic.as_str()))
            .cloned()
            .collect();
        if pool.is_empty() {
            self.bank.quiz_questions.clone()
        } else {
            pool
        }
    }
}

impl Default for LocalStudyApi {
    fn default() -> Self {
        Self::new(QuestionBank::default())
    }
}

/// Pick one question per slot from `pool`, preferring a band match.
///
/// For each slot the first remaining question of that band is taken; when the
/// band is exhausted the front of the remaining pool is taken instead. Slots
/// are consumed lazily and iteration stops once the pool runs dry, so the
/// result holds at most `pool.len()` questions.
pub fn select_questions_for_plan(
    pool: &[QuizQuestion],
    plan_order: impl IntoIterator<Item = DifficultyBand>,
) -> Vec<QuizQuestion> {
    let mut working = pool.to_vec();
    let mut selections = Vec::with_capacity(pool.len());

    for band in plan_order {
        if working.is_empty() {
            break;
        }
        let index = working
            .iter()
            .position(|q| q.difficulty == band)
            .unwrap_or(0);
        selections.push(working.remove(index));
    }
    selections
}

impl StudyApi for LocalStudyApi {
    fn fetch_practice_questions(&self) -> Result<Vec<PracticeQuestion>, CoreError> {
        Ok(self.bank.practice_questions.clone())
    }

    fn request_quiz_question(&self, request: &QuizRequest) -> Result<QuizResponse, CoreError> {
        let batch_size = request.batch_size();
        let session_id = request.session_id.clone().unwrap_or_else(new_token);
        let topics = self.resolve_topics(request);
        let pool = self.filter_pool(&topics);

        let seed = request.seed.as_deref().unwrap_or(&session_id);
        let shuffled = randomize_questions(&pool, Some(seed));

        let difficulty_assignments = scale_difficulty(&DifficultyScaling {
            total_questions: batch_size,
            template_mix: request.template_difficulty_mix.as_ref(),
            learner_confidence: request.learner_confidence,
            recent_performance: request.recent_performance.as_ref(),
        });
        let planned = difficulty_assignments.total();
        let selections =
            select_questions_for_plan(&shuffled, plan_slots(&difficulty_assignments));

        if selections.len() < usize::try_from(planned).unwrap_or(usize::MAX) {
            tracing::warn!(
                planned,
                selected = selections.len(),
                pool = shuffled.len(),
                "question pool smaller than planned batch"
            );
        }

        let question = selections
            .first()
            .or_else(|| shuffled.first())
            .cloned()
            .ok_or(CoreError::NoQuestionsAvailable)?;

        tracing::debug!(
            session_id = %session_id,
            topics = ?topics,
            intro = difficulty_assignments.intro,
            core = difficulty_assignments.core,
            advanced = difficulty_assignments.advanced,
            question_id = question.id,
            "assembled quiz plan"
        );

        let sequence = request
            .session_sequence
            .unwrap_or(if planned > 0 { 1 } else { 0 });
        let total = if planned > 0 {
            planned
        } else {
            u32::try_from(shuffled.len()).unwrap_or(u32::MAX)
        };

        Ok(QuizResponse {
            session_id,
            sequence,
            total,
            question,
            plan: QuizPlan {
                topics,
                difficulty_assignments,
            },
            selection: selections.iter().map(|q| q.id).collect(),
        })
    }
}
