// src/services/plan_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CoachRepository, StudentRepository},
    models::coach::{AccountOverview, CoachAccount, PlanTier},
};

#[derive(Clone)]
pub struct PlanService {
    coach_repo: CoachRepository,
    student_repo: StudentRepository,
}

fn overview(account: &CoachAccount, current_count: i64) -> AccountOverview {
    AccountOverview {
        plan_tier: account.plan_tier,
        plan_name: account.plan_tier.display_name().to_string(),
        occupancy: account.occupancy(current_count),
    }
}

impl PlanService {
    pub fn new(coach_repo: CoachRepository, student_repo: StudentRepository) -> Self {
        Self { coach_repo, student_repo }
    }

    pub async fn account_overview(&self, owner_id: Uuid) -> Result<AccountOverview, AppError> {
        let account = self.coach_repo.get(owner_id).await?;
        let current_count = self.student_repo.count(owner_id).await?;

        Ok(overview(&account, current_count))
    }

    /// Troca o plano do treinador. Só `vip` e `premium` são aceitos.
    pub async fn checkout(&self, owner_id: Uuid, plan: &str) -> Result<AccountOverview, AppError> {
        let tier = PlanTier::parse_purchasable(plan).ok_or_else(|| AppError::InvalidPlan(plan.to_string()))?;

        let account = self
            .coach_repo
            .update_plan(owner_id, tier, tier.student_limit())
            .await?;

        tracing::info!(owner_id = %owner_id, plan = ?tier, "Plano atualizado via checkout");

        let current_count = self.student_repo.count(owner_id).await?;
        Ok(overview(&account, current_count))
    }
}
