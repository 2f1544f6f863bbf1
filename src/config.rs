// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::clock::{Clock, SystemClock},
    db::{CoachRepository, StudentRepository, UserRepository},
    services::{
        auth::AuthService,
        billing_service::{BillingService, Mailer, ResendMailer},
        dashboard_service::DashboardService,
        plan_service::PlanService,
        student_service::StudentService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
const DEFAULT_FROM_ADDRESS: &str = "Dribla <cobranca@dribla.com.br>";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub timezone: Tz,
    pub resend_api_key: Option<String>,
    pub billing_from_address: String,
    pub cron_secret: Option<String>,
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_max_connections = match optional_var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{raw}'"))?,
            None => 5,
        };

        let timezone_name = optional_var("APP_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow::anyhow!("APP_TIMEZONE inválido '{timezone_name}': {e}"))?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            db_max_connections,
            timezone,
            resend_api_key: optional_var("RESEND_API_KEY"),
            billing_from_address: optional_var("BILLING_FROM_ADDRESS")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            cron_secret: optional_var("CRON_SECRET"),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub clock: Arc<dyn Clock>,
    pub cron_secret: Option<String>,
    pub auth_service: AuthService,
    pub student_service: StudentService,
    pub plan_service: PlanService,
    pub dashboard_service: DashboardService,
    pub billing_service: BillingService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let mailer: Option<Arc<dyn Mailer>> = match &config.resend_api_key {
            Some(key) => Some(Arc::new(ResendMailer::new(
                key.clone(),
                config.billing_from_address.clone(),
            )?)),
            None => {
                tracing::warn!("RESEND_API_KEY não definida; o envio de cobranças ficará desativado.");
                None
            }
        };

        Ok(Self::assemble(
            db_pool,
            config.jwt_secret.clone(),
            Arc::new(SystemClock::new(config.timezone)),
            mailer,
            config.cron_secret.clone(),
        ))
    }

    // --- Monta o gráfico de dependências ---
    pub fn assemble(
        db_pool: PgPool,
        jwt_secret: String,
        clock: Arc<dyn Clock>,
        mailer: Option<Arc<dyn Mailer>>,
        cron_secret: Option<String>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let coach_repo = CoachRepository::new(db_pool.clone());
        let student_repo = StudentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, coach_repo.clone(), jwt_secret, db_pool.clone());
        let student_service = StudentService::new(student_repo.clone(), coach_repo.clone(), db_pool.clone());
        let plan_service = PlanService::new(coach_repo.clone(), student_repo.clone());
        let dashboard_service = DashboardService::new(student_repo.clone(), coach_repo.clone());
        let billing_service = BillingService::new(student_repo, coach_repo, mailer);

        Self {
            db_pool,
            clock,
            cron_secret,
            auth_service,
            student_service,
            plan_service,
            dashboard_service,
            billing_service,
        }
    }
}
