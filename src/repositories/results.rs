use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{TestResult, UserAnswer};

const COLUMNS: &str = "id, user_id, test_id, score, total_questions, completed_at";

const ANSWER_COLUMNS: &str = "id, result_id, question_id, selected_options";

const SUMMARY_QUERY: &str = "\
    SELECT r.id, r.user_id, r.test_id, r.score, r.total_questions, r.completed_at,
           u.username, t.title AS test_title
    FROM test_results r
    JOIN users u ON u.id = r.user_id
    JOIN tests t ON t.id = r.test_id";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ResultSummaryRow {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) test_id: i64,
    pub(crate) score: i32,
    pub(crate) total_questions: i32,
    pub(crate) completed_at: PrimitiveDateTime,
    pub(crate) username: String,
    pub(crate) test_title: String,
}

pub(crate) struct CreateResult {
    pub user_id: i64,
    pub test_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateResult,
) -> Result<TestResult, sqlx::Error> {
    sqlx::query_as::<_, TestResult>(&format!(
        "INSERT INTO test_results (user_id, test_id, score, total_questions, completed_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.test_id)
    .bind(params.score)
    .bind(params.total_questions)
    .bind(params.completed_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<TestResult>, sqlx::Error> {
    sqlx::query_as::<_, TestResult>(&format!("SELECT {COLUMNS} FROM test_results WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create_answer(
    executor: impl sqlx::PgExecutor<'_>,
    result_id: i64,
    question_id: i64,
    selected_options: Json<Vec<i64>>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO user_answers (result_id, question_id, selected_options) VALUES ($1, $2, $3)")
        .bind(result_id)
        .bind(question_id)
        .bind(selected_options)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn list_answers_by_result(
    pool: &PgPool,
    result_id: i64,
) -> Result<Vec<UserAnswer>, sqlx::Error> {
    sqlx::query_as::<_, UserAnswer>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM user_answers WHERE result_id = $1 ORDER BY id"
    ))
    .bind(result_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_summaries(pool: &PgPool) -> Result<Vec<ResultSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultSummaryRow>(&format!("{SUMMARY_QUERY} ORDER BY r.id"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_summaries_by_test(
    pool: &PgPool,
    test_id: i64,
) -> Result<Vec<ResultSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultSummaryRow>(&format!(
        "{SUMMARY_QUERY} WHERE r.test_id = $1 ORDER BY r.id"
    ))
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_summaries_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<ResultSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultSummaryRow>(&format!(
        "{SUMMARY_QUERY} WHERE r.user_id = $1 ORDER BY r.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM test_results").fetch_one(pool).await
}

/// Attempt count and mean score for one test, in a single aggregate query.
pub(crate) async fn attempt_stats(pool: &PgPool, test_id: i64) -> Result<(i64, f64), sqlx::Error> {
    sqlx::query_as::<_, (i64, f64)>(
        "SELECT COUNT(*), COALESCE(AVG(score::float8), 0)::float8
         FROM test_results
         WHERE test_id = $1",
    )
    .bind(test_id)
    .fetch_one(pool)
    .await
}
