// src/handlers/students.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::student::{CreateStudentPayload, StudentFeeRecord, UpdateStudentPayload},
    payments::listing::{ClassifiedStudent, ListingParams},
};

// GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    params(ListingParams),
    responses(
        (status = 200, description = "Elenco classificado para hoje", body = Vec<ClassifiedStudent>),
        (status = 400, description = "Filtro ou ordenação inválidos"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_students(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(params): Query<ListingParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = app_state.clock.today();

    let students = app_state
        .student_service
        .list(user.owner_id(), today, &params)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(students))
}

// POST /api/students
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    request_body = CreateStudentPayload,
    responses(
        (status = 201, description = "Aluno cadastrado", body = StudentFeeRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Limite de alunos do plano atingido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_student(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateStudentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let student = app_state
        .student_service
        .create(user.owner_id(), app_state.clock.today(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(student)))
}

// GET /api/students/{id}
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "ID do aluno")),
    responses(
        (status = 200, description = "Aluno", body = StudentFeeRecord),
        (status = 404, description = "Aluno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_student(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let student = app_state
        .student_service
        .get(user.owner_id(), student_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(student))
}

// PUT /api/students/{id}
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    request_body = UpdateStudentPayload,
    params(("id" = i64, Path, description = "ID do aluno")),
    responses(
        (status = 200, description = "Aluno atualizado", body = StudentFeeRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Aluno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_student(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(student_id): Path<i64>,
    Json(payload): Json<UpdateStudentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let student = app_state
        .student_service
        .update(user.owner_id(), student_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(student))
}

// DELETE /api/students/{id}
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "ID do aluno")),
    responses(
        (status = 204, description = "Aluno removido"),
        (status = 404, description = "Aluno não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_student(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .student_service
        .delete(user.owner_id(), student_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
