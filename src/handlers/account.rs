// src/handlers/account.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::coach::{plan_catalog, AccountOverview, CheckoutPayload, PlanOffer},
};

// GET /api/plans (público)
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Plans",
    responses((status = 200, description = "Planos disponíveis", body = Vec<PlanOffer>))
)]
pub async fn list_plans() -> Json<Vec<PlanOffer>> {
    Json(plan_catalog())
}

// GET /api/account
#[utoipa::path(
    get,
    path = "/api/account",
    tag = "Plans",
    responses(
        (status = 200, description = "Plano atual e ocupação do time", body = AccountOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_account(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .plan_service
        .account_overview(user.owner_id())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(overview))
}

// POST /api/account/checkout
#[utoipa::path(
    post,
    path = "/api/account/checkout",
    tag = "Plans",
    request_body = CheckoutPayload,
    responses(
        (status = 200, description = "Plano atualizado", body = AccountOverview),
        (status = 400, description = "Plano inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .plan_service
        .checkout(user.owner_id(), &payload.plan)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(overview))
}
