// src/handlers/billing.rs

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::billing::ReminderReport,
};

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Sem segredo configurado, qualquer chamada é aceita.
fn cron_secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    match expected {
        None => true,
        Some(expected) => headers
            .get(CRON_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|given| given == expected),
    }
}

// POST/GET /api/cron/billing-reminders
#[utoipa::path(
    post,
    path = "/api/cron/billing-reminders",
    tag = "Billing",
    params(("x-cron-secret" = Option<String>, Header, description = "Segredo do agendador")),
    responses(
        (status = 200, description = "Rodada de cobranças executada", body = ReminderReport),
        (status = 401, description = "Segredo do agendador inválido"),
        (status = 500, description = "Serviço de e-mail não configurado")
    )
)]
pub async fn run_billing_reminders(
    State(app_state): State<AppState>,
    locale: Locale,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if !cron_secret_matches(app_state.cron_secret.as_deref(), &headers) {
        return Err(AppError::InvalidCronSecret.to_api_error(&locale));
    }

    let report = app_state
        .billing_service
        .run_reminders(app_state.clock.today(), Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn secret_check() {
        let mut headers = HeaderMap::new();
        assert!(cron_secret_matches(None, &headers));
        assert!(!cron_secret_matches(Some("abc"), &headers));

        headers.insert(CRON_SECRET_HEADER, HeaderValue::from_static("xyz"));
        assert!(!cron_secret_matches(Some("abc"), &headers));

        headers.insert(CRON_SECRET_HEADER, HeaderValue::from_static("abc"));
        assert!(cron_secret_matches(Some("abc"), &headers));
    }
}
