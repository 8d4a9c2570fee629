use serde::Serialize;

use crate::models::quiz_type::QuizType;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i32,
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub question: String,
    pub image: Option<String>,
    #[serde(flatten)]
    pub details: QuestionDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuestionDetails {
    Scenario(ScenarioDetails),
    Statements(StatementDetails),
    Appropriateness(AppropriatenessDetails),
    Sequence(SequenceDetails),
    FillInBlank(FillInBlankDetails),
    Choice(ChoiceDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOption {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl QuizOption {
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn image(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: None,
            image: Some(path.into()),
        }
    }
}

/// Label of the option at zero-based `index`.
pub fn option_label(index: usize) -> String {
    format!("Option {}", index + 1)
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceDetails {
    pub options: Vec<QuizOption>,
    pub correct_answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillInBlankDetails {
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceDetails {
    pub steps: Vec<String>,
    /// One-based positions into `steps`, listed in the correct order.
    pub correct_order: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub statement: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementDetails {
    pub options: Vec<QuizOption>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppropriatenessDetails {
    pub options: Vec<QuizOption>,
    pub least_appropriate: String,
    pub most_appropriate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubQuestionDisplay {
    Text,
    Image,
    TextWithImage,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubQuestion {
    pub number: usize,
    pub display: SubQuestionDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub options: Vec<QuizOption>,
    pub correct_answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioDetails {
    pub sub_questions: Vec<SubQuestion>,
}
