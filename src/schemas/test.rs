use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::{AnswerOption, Question, Test};
use crate::repositories::tests::TestSummaryRow;

#[derive(Debug, Deserialize)]
pub(crate) struct OptionCreate {
    pub(crate) option_text: String,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionCreate {
    pub(crate) question_text: String,
    pub(crate) options: Vec<OptionCreate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) questions: Vec<QuestionCreate>,
}

/// Partial update: absent fields keep their value. A present `questions`
/// list, even an empty one, replaces every existing question.
#[derive(Debug, Deserialize)]
pub(crate) struct TestUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) questions: Option<Vec<QuestionCreate>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionResponse {
    pub(crate) id: i64,
    pub(crate) option_text: String,
    pub(crate) is_correct: bool,
}

impl OptionResponse {
    pub(crate) fn from_db(option: AnswerOption) -> Self {
        Self { id: option.id, option_text: option.option_text, is_correct: option.is_correct }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) question_text: String,
    pub(crate) options: Vec<OptionResponse>,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question, options: Vec<AnswerOption>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            options: options.into_iter().map(OptionResponse::from_db).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TestResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) created_at: String,
    pub(crate) questions: Vec<QuestionResponse>,
}

impl TestResponse {
    pub(crate) fn from_db(test: Test, questions: Vec<QuestionResponse>) -> Self {
        Self {
            id: test.id,
            title: test.title,
            description: test.description,
            teacher_id: test.teacher_id,
            created_at: format_primitive(test.created_at),
            questions,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TestListResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) questions_count: i64,
}

impl TestListResponse {
    pub(crate) fn from_row(row: TestSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: format_primitive(row.created_at),
            questions_count: row.questions_count,
        }
    }
}

/// Student-facing option view: correctness flags are withheld.
#[derive(Debug, Serialize)]
pub(crate) struct OptionStudentResponse {
    pub(crate) id: i64,
    pub(crate) option_text: String,
}

impl OptionStudentResponse {
    pub(crate) fn from_db(option: AnswerOption) -> Self {
        Self { id: option.id, option_text: option.option_text }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionStudentResponse {
    pub(crate) id: i64,
    pub(crate) question_text: String,
    pub(crate) options: Vec<OptionStudentResponse>,
}

impl QuestionStudentResponse {
    pub(crate) fn from_db(question: Question, options: Vec<AnswerOption>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            options: options.into_iter().map(OptionStudentResponse::from_db).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TestStudentResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) questions: Vec<QuestionStudentResponse>,
}

impl TestStudentResponse {
    pub(crate) fn from_db(test: Test, questions: Vec<QuestionStudentResponse>) -> Self {
        Self { id: test.id, title: test.title, description: test.description, questions }
    }
}
