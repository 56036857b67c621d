//! Teacher-facing reporting: result listings and aggregate statistics.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{self, TeacherQuery};
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::result::{ResultResponse, StatisticsResponse, TestStatistics};
use crate::services::grading;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/results", get(all_results))
        .route("/results/test/:test_id", get(results_by_test))
        .route("/results/student/:student_id", get(results_by_student))
        .route("/statistics", get(statistics))
}

async fn all_results(
    State(state): State<AppState>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    guards::require_teacher(state.db(), query.teacher_id, "Only teachers can view all results")
        .await?;

    let rows = repositories::results::list_summaries(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(Json(rows.into_iter().map(ResultResponse::from_row).collect()))
}

async fn results_by_test(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    guards::require_teacher(state.db(), query.teacher_id, "Only teachers can view results")
        .await?;

    repositories::tests::find_by_id(state.db(), test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load test"))?
        .ok_or_else(|| ApiError::NotFound("Test not found".to_string()))?;

    let rows = repositories::results::list_summaries_by_test(state.db(), test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(Json(rows.into_iter().map(ResultResponse::from_row).collect()))
}

async fn results_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<Vec<ResultResponse>>, ApiError> {
    guards::require_teacher(state.db(), query.teacher_id, "Only teachers can view results")
        .await?;

    repositories::users::find_by_id_and_role(state.db(), student_id, UserRole::Student)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let rows = repositories::results::list_summaries_by_user(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(Json(rows.into_iter().map(ResultResponse::from_row).collect()))
}

async fn statistics(
    State(state): State<AppState>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    guards::require_teacher(state.db(), query.teacher_id, "Only teachers can view statistics")
        .await?;

    let total_tests = repositories::tests::count_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count tests"))?;
    let total_students = repositories::users::count_by_role(state.db(), UserRole::Student)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count students"))?;
    let total_attempts = repositories::results::count_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count results"))?;

    let tests = repositories::tests::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list tests"))?;
    let mut tests_statistics = Vec::with_capacity(tests.len());

    for test in tests {
        let (attempts, avg_score) = repositories::results::attempt_stats(state.db(), test.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to aggregate results"))?;
        let question_count = repositories::questions::count_by_test(state.db(), test.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count questions"))?;

        // The percentage is derived from the unrounded mean score.
        let avg_percentage = if attempts > 0 && question_count > 0 {
            grading::round2(avg_score / question_count as f64 * 100.0)
        } else {
            0.0
        };

        tests_statistics.push(TestStatistics {
            test_id: test.id,
            test_title: test.title,
            attempts,
            avg_score: grading::round2(avg_score),
            avg_percentage,
        });
    }

    Ok(Json(StatisticsResponse {
        total_tests,
        total_students,
        total_attempts,
        tests_statistics,
    }))
}
