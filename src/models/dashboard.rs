// src/models/dashboard.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::coach::{Occupancy, PlanTier},
    payments::aggregator::PaymentSummary,
};

/// Tudo o que a tela inicial do treinador mostra de uma vez.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// Data usada na classificação.
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub reference_date: NaiveDate,
    pub summary: PaymentSummary,
    pub plan_tier: PlanTier,
    pub occupancy: Occupancy,
}
