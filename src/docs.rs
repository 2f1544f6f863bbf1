// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::payments;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Students ---
        handlers::students::list_students,
        handlers::students::create_student,
        handlers::students::get_student,
        handlers::students::update_student,
        handlers::students::delete_student,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Plans ---
        handlers::account::list_plans,
        handlers::account::get_account,
        handlers::account::checkout,

        // --- Billing ---
        handlers::billing::run_billing_reminders,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Students ---
            models::student::PaymentStatus,
            models::student::StudentFeeRecord,
            models::student::CreateStudentPayload,
            models::student::UpdateStudentPayload,
            payments::classifier::DerivedStatus,
            payments::listing::StatusFilter,
            payments::listing::SortKey,
            payments::listing::ClassifiedStudent,

            // --- Dashboard ---
            payments::aggregator::WarningReason,
            payments::aggregator::RecordWarning,
            payments::aggregator::PaymentSummary,
            models::dashboard::DashboardOverview,

            // --- Plans ---
            models::coach::PlanTier,
            models::coach::Occupancy,
            models::coach::AccountOverview,
            models::coach::CheckoutPayload,
            models::coach::PlanOffer,

            // --- Billing ---
            models::billing::ReminderReport,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Treinador"),
        (name = "Students", description = "Elenco e mensalidades"),
        (name = "Dashboard", description = "Resumo financeiro do time"),
        (name = "Plans", description = "Planos, limites e checkout"),
        (name = "Billing", description = "Envio automático de cobranças")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
