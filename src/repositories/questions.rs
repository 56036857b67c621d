use sqlx::PgPool;

use crate::db::models::{AnswerOption, Question};

const COLUMNS: &str = "id, test_id, question_text";

const OPTION_COLUMNS: &str = "id, question_id, option_text, is_correct";

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    test_id: i64,
    question_text: &str,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (test_id, question_text) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(test_id)
    .bind(question_text)
    .fetch_one(executor)
    .await
}

/// Global lookup by id, deliberately not scoped to a test: grading accepts
/// answers whose question id belongs to any test and skips unknown ids.
pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_test(
    pool: &PgPool,
    test_id: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE test_id = $1 ORDER BY id"
    ))
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_test(pool: &PgPool, test_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE test_id = $1")
        .bind(test_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete_by_test(
    executor: impl sqlx::PgExecutor<'_>,
    test_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM questions WHERE test_id = $1").bind(test_id).execute(executor).await?;
    Ok(())
}

pub(crate) async fn create_option(
    executor: impl sqlx::PgExecutor<'_>,
    question_id: i64,
    option_text: &str,
    is_correct: bool,
) -> Result<AnswerOption, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "INSERT INTO options (question_id, option_text, is_correct)
         VALUES ($1, $2, $3)
         RETURNING {OPTION_COLUMNS}"
    ))
    .bind(question_id)
    .bind(option_text)
    .bind(is_correct)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_options_by_question(
    pool: &PgPool,
    question_id: i64,
) -> Result<Vec<AnswerOption>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM options WHERE question_id = $1 ORDER BY id"
    ))
    .bind(question_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_options_by_test(
    pool: &PgPool,
    test_id: i64,
) -> Result<Vec<AnswerOption>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOption>(
        "SELECT o.id, o.question_id, o.option_text, o.is_correct
         FROM options o
         JOIN questions q ON q.id = o.question_id
         WHERE q.test_id = $1
         ORDER BY o.id",
    )
    .bind(test_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn correct_option_ids(
    pool: &PgPool,
    question_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM options WHERE question_id = $1 AND is_correct")
        .bind(question_id)
        .fetch_all(pool)
        .await
}
