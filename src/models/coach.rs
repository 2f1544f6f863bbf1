// src/models/coach.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Valor gravado em `student_limit` para planos sem limite.
pub const UNLIMITED_STUDENTS: i32 = 99_999;

pub const FREE_STUDENT_LIMIT: i32 = 10;
pub const VIP_STUDENT_LIMIT: i32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_tier", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Vip,
    Premium,
}

impl PlanTier {
    pub fn display_name(self) -> &'static str {
        match self {
            PlanTier::Free => "Plano Free",
            PlanTier::Vip => "Plano VIP",
            PlanTier::Premium => "Plano Premium",
        }
    }

    pub fn student_limit(self) -> i32 {
        match self {
            PlanTier::Free => FREE_STUDENT_LIMIT,
            PlanTier::Vip => VIP_STUDENT_LIMIT,
            PlanTier::Premium => UNLIMITED_STUDENTS,
        }
    }

    /// Interpreta o plano vindo do checkout ("vip", "PREMIUM"...). O Free não é comprável.
    pub fn parse_purchasable(raw: &str) -> Option<PlanTier> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vip" => Some(PlanTier::Vip),
            "premium" => Some(PlanTier::Premium),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoachAccount {
    pub id: Uuid,
    pub plan_tier: PlanTier,
    #[schema(example = 150)]
    pub student_limit: i32,
    pub updated_at: DateTime<Utc>,
}

impl CoachAccount {
    pub fn is_unlimited(&self) -> bool {
        self.student_limit >= UNLIMITED_STUDENTS
    }

    /// `true` quando ainda cabe mais um aluno no plano.
    pub fn has_room_for_another(&self, current_count: i64) -> bool {
        self.is_unlimited() || current_count < i64::from(self.student_limit)
    }

    pub fn occupancy(&self, current_count: i64) -> Occupancy {
        if self.is_unlimited() {
            return Occupancy {
                current_count,
                student_limit: None,
                percent_used: None,
            };
        }

        let limit = i64::from(self.student_limit.max(0));
        let percent_used = if limit == 0 {
            100.0
        } else {
            (current_count as f64 / limit as f64) * 100.0
        };

        Occupancy {
            current_count,
            student_limit: Some(self.student_limit),
            percent_used: Some(percent_used),
        }
    }
}

/// Ocupação do time (alunos atuais / limite do plano).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    pub current_count: i64,
    /// `None` = ilimitado
    pub student_limit: Option<i32>,
    pub percent_used: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub plan_tier: PlanTier,
    #[schema(example = "Plano VIP")]
    pub plan_name: String,
    pub occupancy: Occupancy,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[schema(example = "vip")]
    pub plan: String,
}

/// Item do catálogo de planos exibido na página de planos.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanOffer {
    pub tier: PlanTier,
    #[schema(example = "Plano VIP")]
    pub name: String,
    #[schema(example = "R$ 59/mês")]
    pub price: String,
    #[schema(example = "Até 150")]
    pub student_limit_label: String,
    pub benefits: Vec<String>,
    pub highlighted: bool,
}

pub fn plan_catalog() -> Vec<PlanOffer> {
    vec![
        PlanOffer {
            tier: PlanTier::Vip,
            name: PlanTier::Vip.display_name().to_string(),
            price: "R$ 59/mês".to_string(),
            student_limit_label: "Até 150".to_string(),
            benefits: vec![
                "Gestão completa de alunos",
                "Painel de Status Financeiro",
                "Envio automático de e-mails de cobrança",
                "Relatórios básicos de inadimplência",
                "Suporte via E-mail",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            highlighted: true,
        },
        PlanOffer {
            tier: PlanTier::Premium,
            name: PlanTier::Premium.display_name().to_string(),
            price: "R$ 99/mês".to_string(),
            student_limit_label: "Ilimitado".to_string(),
            benefits: vec![
                "Tudo do Plano VIP",
                "Mensagens de cobrança personalizáveis",
                "Relatórios financeiros avançados",
                "Acesso prioritário a novas funcionalidades",
                "Suporte Prioritário",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            highlighted: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(plan_tier: PlanTier) -> CoachAccount {
        CoachAccount {
            id: Uuid::new_v4(),
            plan_tier,
            student_limit: plan_tier.student_limit(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn checkout_only_accepts_paid_plans() {
        assert_eq!(PlanTier::parse_purchasable("VIP"), Some(PlanTier::Vip));
        assert_eq!(PlanTier::parse_purchasable(" premium "), Some(PlanTier::Premium));
        assert_eq!(PlanTier::parse_purchasable("free"), None);
        assert_eq!(PlanTier::parse_purchasable("gold"), None);
    }

    #[test]
    fn limit_is_enforced_for_limited_plans() {
        let vip = account(PlanTier::Vip);
        assert!(vip.has_room_for_another(149));
        assert!(!vip.has_room_for_another(150));
    }

    #[test]
    fn premium_is_unlimited() {
        let premium = account(PlanTier::Premium);
        assert!(premium.is_unlimited());
        assert!(premium.has_room_for_another(1_000_000));

        let occupancy = premium.occupancy(320);
        assert_eq!(occupancy.student_limit, None);
        assert_eq!(occupancy.percent_used, None);
    }

    #[test]
    fn occupancy_percentage() {
        let vip = account(PlanTier::Vip);
        let occupancy = vip.occupancy(75);
        assert_eq!(occupancy.student_limit, Some(150));
        assert_eq!(occupancy.percent_used, Some(50.0));
    }

    #[test]
    fn catalog_lists_purchasable_plans() {
        let catalog = plan_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.iter().all(|p| p.tier != PlanTier::Free));
    }
}
