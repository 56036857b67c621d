use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::repositories::results::ResultSummaryRow;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerSubmit {
    pub(crate) question_id: i64,
    pub(crate) selected_option_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestSubmit {
    pub(crate) test_id: i64,
    pub(crate) answers: Vec<AnswerSubmit>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitResponse {
    pub(crate) result_id: i64,
    pub(crate) score: i32,
    pub(crate) total_questions: i32,
    pub(crate) percentage: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) test_id: i64,
    pub(crate) score: i32,
    pub(crate) total_questions: i32,
    pub(crate) completed_at: String,
    pub(crate) username: String,
    pub(crate) test_title: String,
}

impl ResultResponse {
    pub(crate) fn from_row(row: ResultSummaryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            test_id: row.test_id,
            score: row.score,
            total_questions: row.total_questions,
            completed_at: format_primitive(row.completed_at),
            username: row.username,
            test_title: row.test_title,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionReview {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) is_correct: bool,
    pub(crate) was_selected: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionReview {
    pub(crate) question_text: String,
    pub(crate) options: Vec<OptionReview>,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DetailedResultResponse {
    pub(crate) id: i64,
    pub(crate) score: i32,
    pub(crate) total_questions: i32,
    pub(crate) completed_at: String,
    pub(crate) test_title: String,
    pub(crate) questions: Vec<QuestionReview>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TestStatistics {
    pub(crate) test_id: i64,
    pub(crate) test_title: String,
    pub(crate) attempts: i64,
    pub(crate) avg_score: f64,
    pub(crate) avg_percentage: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatisticsResponse {
    pub(crate) total_tests: i64,
    pub(crate) total_students: i64,
    pub(crate) total_attempts: i64,
    pub(crate) tests_statistics: Vec<TestStatistics>,
}
