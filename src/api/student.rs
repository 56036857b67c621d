//! Student-facing endpoints: browsing tests without answer keys, submitting
//! answers for grading, and reviewing past results.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use sqlx::types::Json as SqlJson;
use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::api::guards::{self, StudentQuery};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{AnswerOption, Test};
use crate::repositories;
use crate::schemas::result::{
    DetailedResultResponse, OptionReview, QuestionReview, ResultResponse, SubmitResponse,
    TestSubmit,
};
use crate::schemas::test::{QuestionStudentResponse, TestStudentResponse};
use crate::services::grading;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/tests", get(list_available_tests))
        .route("/tests/:test_id", get(get_test_for_student))
        .route("/submit", post(submit_test))
        .route("/results/:result_id", get(get_result_detail))
        .route("/my-results", get(my_results))
}

async fn list_available_tests(
    State(state): State<AppState>,
) -> Result<Json<Vec<TestStudentResponse>>, ApiError> {
    let tests = repositories::tests::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tests"))?;

    let mut views = Vec::with_capacity(tests.len());
    for test in tests {
        let questions = student_questions(state.db(), test.id).await?;
        views.push(TestStudentResponse::from_db(test, questions));
    }

    Ok(Json(views))
}

async fn get_test_for_student(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
) -> Result<Json<TestStudentResponse>, ApiError> {
    let test = fetch_test(state.db(), test_id).await?;
    let questions = student_questions(state.db(), test_id).await?;
    Ok(Json(TestStudentResponse::from_db(test, questions)))
}

async fn student_questions(
    pool: &PgPool,
    test_id: i64,
) -> Result<Vec<QuestionStudentResponse>, ApiError> {
    let questions = repositories::questions::list_by_test(pool, test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    let options = repositories::questions::list_options_by_test(pool, test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load options"))?;

    let mut by_question: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
    for option in options {
        by_question.entry(option.question_id).or_default().push(option);
    }

    Ok(questions
        .into_iter()
        .map(|question| {
            let options = by_question.remove(&question.id).unwrap_or_default();
            QuestionStudentResponse::from_db(question, options)
        })
        .collect())
}

async fn submit_test(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
    Json(payload): Json<TestSubmit>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let student =
        guards::require_student(state.db(), query.student_id, "Only students can submit tests")
            .await?;

    let test = fetch_test(state.db(), payload.test_id).await?;
    let total_questions = repositories::questions::count_by_test(state.db(), test.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count questions"))? as i32;

    // Grade first, then persist the result and its answer rows in one
    // transaction. Answers naming a question id that does not exist are
    // skipped for scoring, but every submitted answer is still recorded.
    let mut score = 0;
    for answer in &payload.answers {
        let question = repositories::questions::find_by_id(state.db(), answer.question_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load question"))?;
        let Some(question) = question else {
            continue;
        };

        let correct_ids = repositories::questions::correct_option_ids(state.db(), question.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load correct options"))?;
        if grading::is_correct_answer(&correct_ids, &answer.selected_option_ids) {
            score += 1;
        }
    }

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to open transaction"))?;

    let result = repositories::results::create(
        &mut *tx,
        repositories::results::CreateResult {
            user_id: student.id,
            test_id: test.id,
            score,
            total_questions,
            completed_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create result"))?;

    for answer in payload.answers {
        repositories::results::create_answer(
            &mut *tx,
            result.id,
            answer.question_id,
            SqlJson(answer.selected_option_ids),
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store answer"))?;
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    tracing::info!(
        result_id = result.id,
        student_id = student.id,
        test_id = test.id,
        score,
        "graded submission"
    );

    Ok(Json(SubmitResponse {
        result_id: result.id,
        score,
        total_questions,
        percentage: grading::percentage(score, total_questions),
    }))
}

async fn get_result_detail(
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<DetailedResultResponse>, ApiError> {
    let result = repositories::results::find_by_id(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load result"))?
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    if result.user_id != query.student_id {
        return Err(ApiError::Forbidden("You can only view your own results"));
    }

    // The review is rendered against the test as it exists now; results for
    // deleted tests are removed with the test.
    let test = repositories::tests::fetch_one_by_id(state.db(), result.test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load test"))?;
    let questions = repositories::questions::list_by_test(state.db(), test.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    let answers = repositories::results::list_answers_by_result(state.db(), result.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load answers"))?;

    let mut selections: HashMap<i64, Vec<i64>> = HashMap::new();
    for answer in answers {
        // First stored answer for a question wins.
        selections.entry(answer.question_id).or_insert(answer.selected_options.0);
    }

    let mut reviews = Vec::with_capacity(questions.len());
    for question in questions {
        let options = repositories::questions::list_options_by_question(state.db(), question.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load options"))?;
        let selected = selections.get(&question.id).cloned().unwrap_or_default();

        let correct_ids: Vec<i64> =
            options.iter().filter(|o| o.is_correct).map(|o| o.id).collect();
        let is_correct = grading::is_correct_answer(&correct_ids, &selected);

        let options = options
            .into_iter()
            .map(|option| OptionReview {
                id: option.id,
                text: option.option_text,
                is_correct: option.is_correct,
                was_selected: selected.contains(&option.id),
            })
            .collect();

        reviews.push(QuestionReview {
            question_text: question.question_text,
            options,
            is_correct,
        });
    }

    Ok(Json(DetailedResultResponse {
        id: result.id,
        score: result.score,
        total_questions: result.total_questions,
        completed_at: format_primitive(result.completed_at),
        test_title: test.title,
        questions: reviews,
    }))
}

async fn my_results(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    let rows = repositories::results::list_summaries_by_user(state.db(), query.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(Json(rows.into_iter().map(ResultResponse::from_row).collect()))
}

async fn fetch_test(pool: &PgPool, test_id: i64) -> Result<Test, ApiError> {
    repositories::tests::find_by_id(pool, test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load test"))?
        .ok_or_else(|| ApiError::NotFound("Test not found".to_string()))
}

#[cfg(test)]
mod tests;
