use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::db::models::{AnswerOption, Question, Test, User};
use crate::db::types::UserRole;
use crate::test_support;

struct Fixture {
    teacher: User,
    student: User,
    test: Test,
    q1: Question,
    q1_a: AnswerOption,
    q1_b: AnswerOption,
    q1_c: AnswerOption,
    q2: Question,
    q2_right: AnswerOption,
    q2_wrong: AnswerOption,
}

/// Two questions: Q1 has two correct options (a, b) and one wrong (c),
/// Q2 has a single correct option.
async fn seed(pool: &PgPool) -> Fixture {
    let teacher = test_support::insert_user(pool, "seed_teacher", "pass", UserRole::Teacher).await;
    let student = test_support::insert_user(pool, "seed_student", "pass", UserRole::Student).await;
    let test = test_support::insert_test(pool, "Graded test", None, teacher.id).await;

    let q1 = test_support::insert_question(pool, test.id, "Pick both correct options").await;
    let q1_a = test_support::insert_option(pool, q1.id, "a", true).await;
    let q1_b = test_support::insert_option(pool, q1.id, "b", true).await;
    let q1_c = test_support::insert_option(pool, q1.id, "c", false).await;

    let q2 = test_support::insert_question(pool, test.id, "Pick the one correct option").await;
    let q2_right = test_support::insert_option(pool, q2.id, "right", true).await;
    let q2_wrong = test_support::insert_option(pool, q2.id, "wrong", false).await;

    Fixture { teacher, student, test, q1, q1_a, q1_b, q1_c, q2, q2_right, q2_wrong }
}

#[tokio::test]
async fn student_view_hides_answer_key() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/student/tests/{}", fx.test.id),
            None,
        ))
        .await
        .expect("get test");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["id"], fx.test.id);
    let questions = body["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 2);
    for question in questions {
        for option in question["options"].as_array().expect("options") {
            assert!(option.get("is_correct").is_none(), "option leaks key: {option}");
        }
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/student/tests", None))
        .await
        .expect("list tests");

    assert_eq!(response.status(), StatusCode::OK);
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().expect("tests").len(), 1);
    assert_eq!(listed[0]["questions"].as_array().expect("questions").len(), 2);
    assert!(listed[0]["questions"][0]["options"][0].get("is_correct").is_none());
}

#[tokio::test]
async fn exact_match_scores_one_of_two() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let payload = json!({
        "test_id": fx.test.id,
        "answers": [
            { "question_id": fx.q1.id, "selected_option_ids": [fx.q1_a.id, fx.q1_b.id] },
            { "question_id": fx.q2.id, "selected_option_ids": [fx.q2_wrong.id] }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(payload),
        ))
        .await
        .expect("submit");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["score"], 1);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["percentage"], 50.0);
}

#[tokio::test]
async fn partial_selection_scores_zero_for_question() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    // Q1 needs both a and b; picking only a earns nothing. Q2 is omitted
    // entirely and also earns nothing.
    let payload = json!({
        "test_id": fx.test.id,
        "answers": [
            { "question_id": fx.q1.id, "selected_option_ids": [fx.q1_a.id] }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(payload),
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["score"], 0);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["percentage"], 0.0);
}

#[tokio::test]
async fn superset_selection_scores_zero_for_question() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let payload = json!({
        "test_id": fx.test.id,
        "answers": [
            {
                "question_id": fx.q1.id,
                "selected_option_ids": [fx.q1_a.id, fx.q1_b.id, fx.q1_c.id]
            },
            { "question_id": fx.q2.id, "selected_option_ids": [fx.q2_right.id] }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(payload),
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["score"], 1);
    assert_eq!(body["percentage"], 50.0);
}

#[tokio::test]
async fn unknown_question_ids_are_skipped() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let payload = json!({
        "test_id": fx.test.id,
        "answers": [
            { "question_id": 999_999, "selected_option_ids": [1] },
            { "question_id": fx.q2.id, "selected_option_ids": [fx.q2_right.id] }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(payload),
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["score"], 1);
    assert_eq!(body["total_questions"], 2);

    // The unknown answer earns nothing but is still stored verbatim.
    let result_id = body["result_id"].as_i64().expect("result id");
    let answers = crate::repositories::results::list_answers_by_result(ctx.state.db(), result_id)
        .await
        .expect("answers");
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].question_id, 999_999);
}

#[tokio::test]
async fn teacher_cannot_submit() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.teacher.id),
            Some(json!({ "test_id": fx.test.id, "answers": [] })),
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Only students can submit tests");
}

#[tokio::test]
async fn submit_for_missing_test_returns_404() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(json!({ "test_id": 424_242, "answers": [] })),
        ))
        .await
        .expect("submit");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Test not found");
}

#[tokio::test]
async fn result_detail_flags_selections_and_ownership() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let payload = json!({
        "test_id": fx.test.id,
        "answers": [
            { "question_id": fx.q1.id, "selected_option_ids": [fx.q1_a.id, fx.q1_b.id] },
            { "question_id": fx.q2.id, "selected_option_ids": [fx.q2_wrong.id] }
        ]
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/student/submit?student_id={}", fx.student.id),
            Some(payload),
        ))
        .await
        .expect("submit");
    let submitted = test_support::read_json(response).await;
    let result_id = submitted["result_id"].as_i64().expect("result id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/student/results/{result_id}?student_id={}", fx.student.id),
            None,
        ))
        .await
        .expect("result detail");

    assert_eq!(response.status(), StatusCode::OK);
    let detail = test_support::read_json(response).await;
    assert_eq!(detail["score"], 1);
    assert_eq!(detail["test_title"], "Graded test");

    let questions = detail["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["is_correct"], true);
    assert_eq!(questions[1]["is_correct"], false);

    let q1_options = questions[0]["options"].as_array().expect("options");
    let selected: Vec<bool> =
        q1_options.iter().map(|o| o["was_selected"].as_bool().unwrap()).collect();
    assert_eq!(selected, vec![true, true, false]);

    // Another student may not read it.
    let intruder =
        test_support::insert_user(ctx.state.db(), "intruder", "pass", UserRole::Student).await;
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/student/results/{result_id}?student_id={}", intruder.id),
            None,
        ))
        .await
        .expect("result detail");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "You can only view your own results");
}

#[tokio::test]
async fn missing_result_returns_404() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/student/results/777?student_id={}", fx.student.id),
            None,
        ))
        .await
        .expect("result detail");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Result not found");
}

#[tokio::test]
async fn my_results_lists_own_attempts() {
    let ctx = test_support::setup_test_context().await;
    let fx = seed(ctx.state.db()).await;

    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/student/submit?student_id={}", fx.student.id),
                Some(json!({
                    "test_id": fx.test.id,
                    "answers": [
                        { "question_id": fx.q2.id, "selected_option_ids": [fx.q2_right.id] }
                    ]
                })),
            ))
            .await
            .expect("submit");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/student/my-results?student_id={}", fx.student.id),
            None,
        ))
        .await
        .expect("my results");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let rows = body.as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "seed_student");
    assert_eq!(rows[0]["test_title"], "Graded test");
    assert_eq!(rows[0]["score"], 1);
}
