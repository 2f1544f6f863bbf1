// src/services/student_service.rs

use chrono::{Days, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CoachRepository, StudentRepository},
    models::student::{
        parse_due_date, CreateStudentPayload, StudentChanges, StudentFeeRecord, UpdateStudentPayload,
    },
    payments::listing::{build_listing, ClassifiedStudent, ListingParams},
};

/// Prazo padrão do primeiro vencimento.
const DEFAULT_DUE_IN_DAYS: u64 = 30;

fn invalid_due_date() -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new("invalid_date_format");
    err.message = Some("Data de vencimento inválida (use AAAA-MM-DD).".into());
    errors.add("due_date", err);
    AppError::ValidationError(errors)
}

fn normalize_guardian_name(raw: Option<String>) -> Option<String> {
    raw.map(|name| name.trim().to_string()).filter(|name| !name.is_empty())
}

/// Campos de criação com os padrões aplicados para o dia `today`.
pub fn changes_from_create(payload: CreateStudentPayload, today: NaiveDate) -> Result<StudentChanges, AppError> {
    let due_date = match payload.due_date.as_deref() {
        Some(raw) => parse_due_date(raw).ok_or_else(invalid_due_date)?,
        None => today
            .checked_add_days(Days::new(DEFAULT_DUE_IN_DAYS))
            .unwrap_or(NaiveDate::MAX),
    };

    Ok(StudentChanges {
        student_name: payload.student_name.trim().to_string(),
        guardian_name: normalize_guardian_name(payload.guardian_name),
        guardian_email: payload.guardian_email.trim().to_string(),
        fee_amount: payload.fee_amount,
        due_date,
        payment_status: payload.payment_status,
    })
}

pub fn changes_from_update(payload: UpdateStudentPayload) -> Result<StudentChanges, AppError> {
    let due_date = parse_due_date(&payload.due_date).ok_or_else(invalid_due_date)?;

    Ok(StudentChanges {
        student_name: payload.student_name.trim().to_string(),
        guardian_name: normalize_guardian_name(payload.guardian_name),
        guardian_email: payload.guardian_email.trim().to_string(),
        fee_amount: payload.fee_amount,
        due_date,
        payment_status: payload.payment_status,
    })
}

#[derive(Clone)]
pub struct StudentService {
    student_repo: StudentRepository,
    coach_repo: CoachRepository,
    pool: PgPool,
}

impl StudentService {
    pub fn new(student_repo: StudentRepository, coach_repo: CoachRepository, pool: PgPool) -> Self {
        Self { student_repo, coach_repo, pool }
    }

    /// Lista do elenco, classificada para `today`.
    pub async fn list(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        params: &ListingParams,
    ) -> Result<Vec<ClassifiedStudent>, AppError> {
        let records = self.student_repo.list_by_owner(owner_id).await?;
        Ok(build_listing(records, today, params.status, params.sort))
    }

    pub async fn get(&self, owner_id: Uuid, student_id: i64) -> Result<StudentFeeRecord, AppError> {
        self.student_repo
            .find_by_id(owner_id, student_id)
            .await?
            .ok_or(AppError::StudentNotFound(student_id))
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        payload: CreateStudentPayload,
    ) -> Result<StudentFeeRecord, AppError> {
        let changes = changes_from_create(payload, today)?;

        // Conta e insere na mesma transação, com a linha da conta travada
        let mut tx = self.pool.begin().await?;

        let account = self
            .coach_repo
            .lock_for_update(&mut *tx, owner_id)
            .await?
            .ok_or(AppError::CoachAccountNotFound)?;

        let current_count = self.student_repo.count_by_owner(&mut *tx, owner_id).await?;

        if !account.has_room_for_another(current_count) {
            tracing::warn!(
                owner_id = %owner_id,
                current_count,
                limit = account.student_limit,
                "Cadastro bloqueado pelo limite do plano"
            );
            return Err(AppError::StudentLimitReached(account.student_limit));
        }

        let student = self
            .student_repo
            .insert(&mut *tx, owner_id, today, &changes)
            .await?;

        tx.commit().await?;

        Ok(student)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        student_id: i64,
        payload: UpdateStudentPayload,
    ) -> Result<StudentFeeRecord, AppError> {
        let changes = changes_from_update(payload)?;

        self.student_repo
            .update(owner_id, student_id, &changes)
            .await?
            .ok_or(AppError::StudentNotFound(student_id))
    }

    pub async fn delete(&self, owner_id: Uuid, student_id: i64) -> Result<(), AppError> {
        if !self.student_repo.delete(owner_id, student_id).await? {
            return Err(AppError::StudentNotFound(student_id));
        }
        tracing::info!(owner_id = %owner_id, student_id, "Aluno removido");
        Ok(())
    }
}
