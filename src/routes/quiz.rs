use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::dto::quiz_dto::{GenerateQuizRequest, QuizTypeInfo, QuizTypesResponse};
use crate::error::Result;
use crate::models::question::Question;
use crate::models::quiz_type::QuizType;
use crate::AppState;

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Query(params): Query<GenerateQuizRequest>,
) -> Result<Json<Vec<Question>>> {
    let request = params.into_request()?;
    let questions = state.quiz_service.generate_quiz(&request).await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<Json<Vec<Question>>> {
    let request = payload.into_request()?;
    let questions = state.quiz_service.generate_quiz(&request).await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn list_quiz_types(State(state): State<AppState>) -> Json<QuizTypesResponse> {
    Json(QuizTypesResponse {
        max_questions: state.quiz_service.max_questions(),
        quiz_types: QuizType::ALL.into_iter().map(QuizTypeInfo::from).collect(),
    })
}
