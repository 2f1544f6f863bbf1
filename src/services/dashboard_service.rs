// src/services/dashboard_service.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CoachRepository, StudentRepository},
    models::{dashboard::DashboardOverview, student::StudentFeeRecord},
    payments::{
        aggregator::{PaymentSummary, SummaryBuilder},
        classifier::{due_soon_window, DerivedStatus},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    student_repo: StudentRepository,
    coach_repo: CoachRepository,
}

/// Monta o resumo a partir das consultas parciais do painel.
///
/// Os atrasados chegam como linhas (para somar os valores); as demais faixas chegam
/// só como contagem. Linhas sem vencimento viram avisos.
pub fn summary_from_parts(
    today: NaiveDate,
    overdue_rows: &[StudentFeeRecord],
    due_soon_count: u64,
    paid_count: u64,
    undated_rows: &[StudentFeeRecord],
    total_count: u64,
) -> PaymentSummary {
    SummaryBuilder::new(today)
        .add_records(overdue_rows)
        .add_records(undated_rows)
        .add_bucket_count(DerivedStatus::DueSoon, due_soon_count)
        .add_bucket_count(DerivedStatus::Paid, paid_count)
        .with_total_count(total_count)
        .build()
}

fn as_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl DashboardService {
    pub fn new(student_repo: StudentRepository, coach_repo: CoachRepository) -> Self {
        Self { student_repo, coach_repo }
    }

    /// Consultas em paralelo. Se qualquer uma falhar, o painel inteiro falha e as
    /// demais são abandonadas.
    pub async fn overview(&self, owner_id: Uuid, today: NaiveDate) -> Result<DashboardOverview, AppError> {
        let (_, window_end) = due_soon_window(today);

        let result = tokio::try_join!(
            self.student_repo.list_overdue(owner_id, today),
            self.student_repo.count_due_soon(owner_id, due_soon_window(today)),
            self.student_repo.count_paid_bucket(owner_id, window_end),
            self.student_repo.list_missing_due_date(owner_id),
            self.student_repo.count(owner_id),
            self.coach_repo.get(owner_id),
        );

        let (overdue_rows, due_soon, paid, undated_rows, total, account) = match result {
            Ok(parts) => parts,
            // Conta inexistente continua sendo 404
            Err(AppError::CoachAccountNotFound) => return Err(AppError::CoachAccountNotFound),
            Err(e) => {
                tracing::error!(owner_id = %owner_id, error = ?e, "Falha em consulta do painel");
                return Err(AppError::DashboardUnavailable(e.to_string()));
            }
        };

        let summary = summary_from_parts(
            today,
            &overdue_rows,
            as_count(due_soon),
            as_count(paid),
            &undated_rows,
            as_count(total),
        );

        if !summary.warnings.is_empty() {
            tracing::warn!(
                owner_id = %owner_id,
                count = summary.warnings.len(),
                "Alunos sem data de vencimento ficaram fora do resumo"
            );
        }

        Ok(DashboardOverview {
            reference_date: today,
            summary,
            plan_tier: account.plan_tier,
            occupancy: account.occupancy(total),
        })
    }
}
