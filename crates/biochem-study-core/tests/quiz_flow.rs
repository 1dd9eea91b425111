//! End-to-end quiz planning against the built-in bank.

use std::collections::HashSet;

use biochem_study_core::planner::{randomize_questions, DifficultyCounts};
use biochem_study_core::{
    CoreError, LocalStudyApi, QuestionBank, QuizRequest, QuizSession, StudyApi,
};

fn api() -> LocalStudyApi {
    LocalStudyApi::new(QuestionBank::builtin().expect("builtin bank parses"))
}

#[test]
fn default_weights_plan_five_questions() {
    let api = api();
    let request = QuizRequest {
        batch_size: Some(5),
        learner_confidence: Some(0.6),
        seed: Some("five-question-plan".into()),
        ..Default::default()
    };

    let response = api.request_quiz_question(&request).unwrap();
    assert_eq!(
        response.plan.difficulty_assignments,
        DifficultyCounts {
            intro: 1,
            core: 3,
            advanced: 1
        }
    );
    assert_eq!(response.total, 5);
    assert_eq!(response.sequence, 1);
    assert_eq!(response.selection.len(), 5);

    let distinct: HashSet<u32> = response.selection.iter().copied().collect();
    assert_eq!(distinct.len(), 5);
    assert_eq!(response.selection[0], response.question.id);
}

#[test]
fn requested_topic_restricts_question() {
    let api = api();
    let request = QuizRequest {
        topic_ids: vec!["metabolism".into()],
        ..Default::default()
    };

    let response = api.request_quiz_question(&request).unwrap();
    assert_eq!(response.question.topic, "metabolism");
    assert_eq!(response.plan.topics, vec!["metabolism"]);
    assert_eq!(response.total, 1);
}

#[test]
fn same_seed_gives_same_response() {
    let api = api();
    let request = QuizRequest {
        batch_size: Some(3),
        seed: Some("repeatable".into()),
        session_id: Some("fixed".into()),
        ..Default::default()
    };

    let first = api.request_quiz_question(&request).unwrap();
    let second = api.request_quiz_question(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn session_id_seeds_shuffle_when_seed_missing() {
    let api = api();
    let topics = vec!["immuno".to_string()];
    let expected = randomize_questions(&api.filter_pool(&topics), Some("learner-42"));

    let request = QuizRequest {
        topic_id: Some("immuno".into()),
        session_id: Some("learner-42".into()),
        ..Default::default()
    };
    let response = api.request_quiz_question(&request).unwrap();
    assert_eq!(response.session_id, "learner-42");
    assert!(expected.iter().any(|q| q.id == response.question.id));
    assert_eq!(response.question.topic, "immuno");
}

#[test]
fn empty_bank_reports_no_questions() {
    let api = LocalStudyApi::default();
    let err = api
        .request_quiz_question(&QuizRequest::default())
        .unwrap_err();
    assert!(matches!(err, CoreError::NoQuestionsAvailable));
    assert_eq!(err.to_string(), "No questions available for this criteria");
}

#[test]
fn session_threads_through_consecutive_requests() {
    let api = api();
    let mut session = QuizSession::new();

    for expected in 1..=3 {
        let response = api.request_quiz_question(&session.request()).unwrap();
        assert_eq!(response.sequence, expected);
        session.apply_response(&response);
    }
    assert_eq!(session.sequence, 3);
    assert!(session.last_plan.is_some());
}

#[test]
fn practice_questions_come_back_in_bank_order() {
    let api = api();
    let ids: Vec<u32> = api
        .fetch_practice_questions()
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}
