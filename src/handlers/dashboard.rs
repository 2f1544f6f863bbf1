// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::DashboardOverview,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards de atrasados, próximos vencimentos e em dia", body = DashboardOverview),
        (status = 401, description = "Não autorizado"),
        (status = 500, description = "Falha ao carregar o painel")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .dashboard_service
        .overview(user.owner_id(), app_state.clock.today())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(overview))
}
