use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::quiz_type::{Layout, QuizType};
use crate::services::quiz_service::QuizRequest;
use crate::utils::text::strip_quotes;

pub const DEFAULT_SUBJECT: &str = "default subject";
pub const DEFAULT_TONE: &str = "neutral";
pub const DEFAULT_QUIZ_TYPE: i64 = 100;

/// Integer parameter that may arrive as a JSON number or as text
/// (query strings are always text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlexibleInt {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for FlexibleInt {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IntOrText {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match IntOrText::deserialize(deserializer)? {
            IntOrText::Int(i) => FlexibleInt::Int(i),
            IntOrText::Float(f) if f.fract() == 0.0 => FlexibleInt::Int(f as i64),
            IntOrText::Float(f) => FlexibleInt::Text(f.to_string()),
            IntOrText::Text(s) => FlexibleInt::Text(s),
        })
    }
}

impl FlexibleInt {
    pub fn to_int(&self, name: &str) -> Result<i64> {
        match self {
            FlexibleInt::Int(i) => Ok(*i),
            FlexibleInt::Text(s) => s.trim().parse().map_err(|_| {
                Error::BadRequest(format!("The '{}' parameter must be an integer", name))
            }),
        }
    }
}

fn required_int(value: &Option<FlexibleInt>, name: &str) -> Result<i64> {
    match value {
        Some(v) => v.to_int(name),
        None => Err(Error::BadRequest(format!(
            "The '{}' parameter must be an integer",
            name
        ))),
    }
}

pub fn parse_quiz_type(code: i64) -> Result<QuizType> {
    QuizType::from_code(code)
        .ok_or_else(|| Error::BadRequest(format!("Invalid quiz type: {}", code)))
}

/// Body of `POST /api/quiz` and query of `GET /generate_quiz`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    pub number: Option<FlexibleInt>,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(max = 50))]
    pub tone: Option<String>,
    pub quiz_type: Option<FlexibleInt>,
}

impl GenerateQuizRequest {
    pub fn into_request(self) -> Result<QuizRequest> {
        self.validate()?;

        let number = match &self.number {
            Some(v) => v.to_int("number")?,
            None => 1,
        };
        let code = match &self.quiz_type {
            Some(v) => v.to_int("quiz_type")?,
            None => DEFAULT_QUIZ_TYPE,
        };

        let subject = self
            .subject
            .as_deref()
            .map(strip_quotes)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        let tone = self
            .tone
            .as_deref()
            .map(strip_quotes)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TONE.to_string());

        Ok(QuizRequest {
            number,
            subject,
            tone,
            quiz_type: parse_quiz_type(code)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListImagesQuery {
    pub quiz_type: Option<FlexibleInt>,
}

impl ListImagesQuery {
    pub fn quiz_type(&self) -> Result<Option<QuizType>> {
        match &self.quiz_type {
            Some(v) => Ok(Some(parse_quiz_type(v.to_int("quiz_type")?)?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteImagesQuery {
    pub start_index: Option<FlexibleInt>,
    pub end_index: Option<FlexibleInt>,
    pub quiz_type: Option<FlexibleInt>,
}

/// Validated inclusive range of positions within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRange {
    pub quiz_type: QuizType,
    pub start: usize,
    pub end: usize,
}

impl DeleteImagesQuery {
    pub fn into_range(self) -> Result<DeleteRange> {
        let start = required_int(&self.start_index, "start_index")?;
        let end = required_int(&self.end_index, "end_index")?;
        let code = required_int(&self.quiz_type, "quiz_type")?;

        if start < 0 || end < start {
            return Err(Error::BadRequest(
                "Invalid index range provided for deletion".to_string(),
            ));
        }

        Ok(DeleteRange {
            quiz_type: parse_quiz_type(code)?,
            start: start as usize,
            end: end as usize,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteImagesResponse {
    pub message: String,
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizTypeInfo {
    pub code: u16,
    pub name: QuizType,
    pub description: &'static str,
    pub layout: &'static str,
    pub has_banner: bool,
    /// Older codes accepted as synonyms for this type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<u16>,
}

impl From<QuizType> for QuizTypeInfo {
    fn from(quiz_type: QuizType) -> Self {
        let layout = match quiz_type.layout() {
            Layout::Choice(_) => "choice",
            Layout::FillInBlank => "fill_in_blank",
            Layout::Sequence { .. } => "sequence",
            Layout::Statements { .. } => "statements",
            Layout::Appropriateness => "appropriateness",
            Layout::Scenario { .. } => "scenario",
        };
        Self {
            code: quiz_type.code(),
            name: quiz_type,
            description: quiz_type.description(),
            layout,
            has_banner: quiz_type.has_banner(),
            aliases: quiz_type.aliases(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizTypesResponse {
    pub max_questions: usize,
    pub quiz_types: Vec<QuizTypeInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_and_quotes_are_stripped() {
        let req = GenerateQuizRequest {
            subject: Some("\"Biology\"".into()),
            ..Default::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(req.subject, "Biology");
        assert_eq!(req.tone, DEFAULT_TONE);
        assert_eq!(req.number, 1);
        assert_eq!(req.quiz_type, QuizType::MultipleChoice);

        let req = GenerateQuizRequest::default().into_request().unwrap();
        assert_eq!(req.subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn numbers_accept_text_and_json_numbers() {
        let req: GenerateQuizRequest =
            serde_json::from_str(r#"{"number": "3", "quiz_type": 200}"#).unwrap();
        let req = req.into_request().unwrap();
        assert_eq!(req.number, 3);
        assert_eq!(req.quiz_type, QuizType::Checkbox);
    }

    #[test]
    fn unknown_quiz_type_is_a_bad_request() {
        let req = GenerateQuizRequest {
            quiz_type: Some(FlexibleInt::Int(123)),
            ..Default::default()
        };
        assert!(matches!(req.into_request(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn delete_range_requires_ordered_non_negative_bounds() {
        let query = DeleteImagesQuery {
            start_index: Some(FlexibleInt::Text("3".into())),
            end_index: Some(FlexibleInt::Text("1".into())),
            quiz_type: Some(FlexibleInt::Text("600".into())),
        };
        match query.into_range() {
            Err(Error::BadRequest(msg)) => {
                assert_eq!(msg, "Invalid index range provided for deletion")
            }
            other => panic!("unexpected: {:?}", other),
        }

        let query = DeleteImagesQuery {
            start_index: Some(FlexibleInt::Text("x".into())),
            ..Default::default()
        };
        match query.into_range() {
            Err(Error::BadRequest(msg)) => {
                assert_eq!(msg, "The 'start_index' parameter must be an integer")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
