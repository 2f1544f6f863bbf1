// src/db/coach_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::coach::{CoachAccount, PlanTier},
};

#[derive(Clone)]
pub struct CoachRepository {
    pool: PgPool,
}

impl CoachRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toda conta nasce no plano Free.
    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        coach_id: Uuid,
    ) -> Result<CoachAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, CoachAccount>(
            r#"
            INSERT INTO coach_accounts (id, plan_tier, student_limit)
            VALUES ($1, $2, $3)
            RETURNING id, plan_tier, student_limit, updated_at
            "#,
        )
        .bind(coach_id)
        .bind(PlanTier::Free)
        .bind(PlanTier::Free.student_limit())
        .fetch_one(executor)
        .await?;

        Ok(account)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        coach_id: Uuid,
    ) -> Result<Option<CoachAccount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, CoachAccount>(
            "SELECT id, plan_tier, student_limit, updated_at FROM coach_accounts WHERE id = $1",
        )
        .bind(coach_id)
        .fetch_optional(executor)
        .await?;

        Ok(account)
    }

    /// Trava a linha da conta até o fim da transação (cadastros concorrentes respeitam o limite).
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        coach_id: Uuid,
    ) -> Result<Option<CoachAccount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, CoachAccount>(
            "SELECT id, plan_tier, student_limit, updated_at FROM coach_accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(coach_id)
        .fetch_optional(executor)
        .await?;

        Ok(account)
    }

    /// Atalho sem executor explícito, para as consultas paralelas do painel.
    pub async fn get(&self, coach_id: Uuid) -> Result<CoachAccount, AppError> {
        self.find_by_id(&self.pool, coach_id)
            .await?
            .ok_or(AppError::CoachAccountNotFound)
    }

    /// Troca de plano feita pelo checkout.
    pub async fn update_plan(
        &self,
        coach_id: Uuid,
        plan_tier: PlanTier,
        student_limit: i32,
    ) -> Result<CoachAccount, AppError> {
        sqlx::query_as::<_, CoachAccount>(
            r#"
            UPDATE coach_accounts
            SET plan_tier = $2, student_limit = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, plan_tier, student_limit, updated_at
            "#,
        )
        .bind(coach_id)
        .bind(plan_tier)
        .bind(student_limit)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CoachAccountNotFound)
    }

    /// Planos de vários treinadores de uma vez (usado pelo envio de cobranças).
    pub async fn find_plans(&self, coach_ids: &[Uuid]) -> Result<Vec<(Uuid, PlanTier)>, AppError> {
        let plans = sqlx::query_as::<_, (Uuid, PlanTier)>(
            "SELECT id, plan_tier FROM coach_accounts WHERE id = ANY($1)",
        )
        .bind(coach_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }
}
