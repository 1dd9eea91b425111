//! Client-side quiz session context.
//!
//! The session is an owned value the caller threads through requests: build a
//! request from it, send it, then fold the response back in.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::quiz::{QuizPlan, QuizRequest, QuizResponse};

/// Random UUID, or `sess_<millis>_<n>` when the OS RNG is unavailable.
///
/// Uniqueness is best-effort.
pub fn new_token() -> String {
    let mut bytes = [0u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "os rng unavailable, using timestamp token");
            fallback_token()
        }
    }
}

fn fallback_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("sess_{}_{}", now.as_millis(), now.subsec_nanos() % 1000)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub session_id: Option<String>,
    pub sequence: u32,
    pub seed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_plan: Option<QuizPlan>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Fresh session: no id yet, sequence 0, newly generated seed.
    pub fn new() -> Self {
        Self {
            session_id: None,
            sequence: 0,
            seed: new_token(),
            last_plan: None,
        }
    }

    /// A request carrying this session's id, seed and next sequence number.
    pub fn request(&self) -> QuizRequest {
        QuizRequest {
            session_id: self.session_id.clone(),
            session_sequence: Some(self.sequence.saturating_add(1)),
            seed: Some(self.seed.clone()),
            ..QuizRequest::default()
        }
    }

    /// Record the outcome of a request. The plan replaces any earlier one.
    pub fn apply_response(&mut self, response: &QuizResponse) {
        self.session_id = Some(response.session_id.clone());
        self.sequence = response.sequence;
        self.last_plan = Some(response.plan.clone());
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::quiz::{LocalStudyApi, StudyApi};

    #[test]
    fn tokens_are_distinct() {
        assert_ne!(new_token(), new_token());
        assert_eq!(new_token().len(), 36);
    }

    #[test]
    fn fallback_token_shape() {
        let token = fallback_token();
        assert!(token.starts_with("sess_"));
        assert_eq!(token.split('_').count(), 3);
    }

    #[test]
    fn request_threads_session_context() {
        let session = QuizSession {
            session_id: Some("abc".into()),
            sequence: 4,
            seed: "seed".into(),
            last_plan: None,
        };
        let request = session.request();
        assert_eq!(request.session_id.as_deref(), Some("abc"));
        assert_eq!(request.session_sequence, Some(5));
        assert_eq!(request.seed.as_deref(), Some("seed"));
    }

    #[test]
    fn apply_then_reset() {
        let api = LocalStudyApi::new(QuestionBank::builtin().unwrap());
        let mut session = QuizSession::new();
        let original_seed = session.seed.clone();

        let response = api.request_quiz_question(&session.request()).unwrap();
        session.apply_response(&response);
        assert_eq!(session.session_id.as_deref(), Some(response.session_id.as_str()));
        assert_eq!(session.sequence, 1);
        assert_eq!(session.last_plan.as_ref(), Some(&response.plan));

        let next = api.request_quiz_question(&session.request()).unwrap();
        assert_eq!(next.session_id, response.session_id);
        assert_eq!(next.sequence, 2);

        session.reset();
        assert!(session.session_id.is_none());
        assert_eq!(session.sequence, 0);
        assert!(session.last_plan.is_none());
        assert_ne!(session.seed, original_seed);
    }
}
