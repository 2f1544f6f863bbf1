// src/db/student_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::student::{StudentChanges, StudentFeeRecord},
};

const STUDENT_COLUMNS: &str = r#"
    id, owner_id, student_name, guardian_name, guardian_email, enrollment_date,
    fee_amount, due_date, payment_status, last_reminder_at, created_at
"#;

#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CRUD (sempre restrito ao treinador dono)
    // =========================================================================

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<StudentFeeRecord>, AppError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE owner_id = $1 ORDER BY due_date ASC NULLS LAST, id ASC"
        );
        let students = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    pub async fn find_by_id(
        &self,
        owner_id: Uuid,
        student_id: i64,
    ) -> Result<Option<StudentFeeRecord>, AppError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND owner_id = $2");
        let student = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(student_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    pub async fn count_by_owner<'e, E>(&self, executor: E, owner_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Contagem sem transação (telas de consulta).
    pub async fn count(&self, owner_id: Uuid) -> Result<i64, AppError> {
        self.count_by_owner(&self.pool, owner_id).await
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        enrollment_date: NaiveDate,
        changes: &StudentChanges,
    ) -> Result<StudentFeeRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO students (
                owner_id, student_name, guardian_name, guardian_email,
                enrollment_date, fee_amount, due_date, payment_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {STUDENT_COLUMNS}
            "#
        );
        let student = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(owner_id)
            .bind(&changes.student_name)
            .bind(changes.guardian_name.as_deref())
            .bind(&changes.guardian_email)
            .bind(enrollment_date)
            .bind(changes.fee_amount)
            .bind(changes.due_date)
            .bind(changes.payment_status)
            .fetch_one(executor)
            .await?;

        Ok(student)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        student_id: i64,
        changes: &StudentChanges,
    ) -> Result<Option<StudentFeeRecord>, AppError> {
        let sql = format!(
            r#"
            UPDATE students
            SET student_name = $3, guardian_name = $4, guardian_email = $5,
                fee_amount = $6, due_date = $7, payment_status = $8
            WHERE id = $1 AND owner_id = $2
            RETURNING {STUDENT_COLUMNS}
            "#
        );
        let student = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(student_id)
            .bind(owner_id)
            .bind(&changes.student_name)
            .bind(changes.guardian_name.as_deref())
            .bind(&changes.guardian_email)
            .bind(changes.fee_amount)
            .bind(changes.due_date)
            .bind(changes.payment_status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    /// Retorna `false` se nada foi apagado (aluno inexistente ou de outro treinador).
    pub async fn delete(&self, owner_id: Uuid, student_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1 AND owner_id = $2")
            .bind(student_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  CONSULTAS DO PAINEL
    //  Os predicados repetem as regras do classificador para a data informada.
    // =========================================================================

    /// Pendentes com vencimento já passado (linhas completas, para somar os valores).
    pub async fn list_overdue(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<StudentFeeRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE owner_id = $1 AND payment_status = 'PENDING' AND due_date < $2
            ORDER BY due_date ASC, id ASC
            "#
        );
        let students = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(owner_id)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    /// Pendentes com vencimento dentro da janela `[start, end]`.
    pub async fn count_due_soon(
        &self,
        owner_id: Uuid,
        window: (NaiveDate, NaiveDate),
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM students
            WHERE owner_id = $1 AND payment_status = 'PENDING'
              AND due_date BETWEEN $2 AND $3
            "#,
        )
        .bind(owner_id)
        .bind(window.0)
        .bind(window.1)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Faixa "em dia": pagos mais pendentes que vencem depois do fim da janela.
    pub async fn count_paid_bucket(&self, owner_id: Uuid, window_end: NaiveDate) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM students
            WHERE owner_id = $1 AND due_date IS NOT NULL
              AND (payment_status = 'PAID' OR due_date > $2)
            "#,
        )
        .bind(owner_id)
        .bind(window_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Registros sem vencimento, que viram avisos no painel.
    pub async fn list_missing_due_date(&self, owner_id: Uuid) -> Result<Vec<StudentFeeRecord>, AppError> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE owner_id = $1 AND due_date IS NULL ORDER BY id"
        );
        let students = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    // =========================================================================
    //  COBRANÇAS
    // =========================================================================

    /// Atrasados de todos os treinadores que não receberam lembrete desde `cutoff`.
    pub async fn list_reminder_candidates(
        &self,
        today: NaiveDate,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<StudentFeeRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE payment_status = 'PENDING' AND due_date < $1
              AND (last_reminder_at IS NULL OR last_reminder_at < $2)
            ORDER BY owner_id, due_date, id
            "#
        );
        let students = sqlx::query_as::<_, StudentFeeRecord>(&sql)
            .bind(today)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    pub async fn mark_reminded(&self, student_id: i64, sent_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE students SET last_reminder_at = $2 WHERE id = $1")
            .bind(student_id)
            .bind(sent_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
