//! Construtores de registros para os testes.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::db::{CoachRepository, UserRepository};
use crate::models::student::{PaymentStatus, StudentFeeRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("data de teste inválida")
}

pub fn record(
    id: i64,
    name: &str,
    payment_status: PaymentStatus,
    due_date: Option<NaiveDate>,
    fee_amount: Option<i64>,
) -> StudentFeeRecord {
    StudentFeeRecord {
        id,
        owner_id: Uuid::nil(),
        student_name: name.to_string(),
        guardian_name: Some(format!("Responsável de {name}")),
        guardian_email: format!("responsavel{id}@email.com"),
        enrollment_date: date(2024, 1, 15),
        fee_amount: fee_amount.map(|v| Decimal::new(v, 0)),
        due_date,
        payment_status,
        last_reminder_at: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    }
}

/// Pool para os testes que precisam de Postgres (`TEST_DATABASE_URL`), já migrado.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL não definida");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("falha ao conectar no banco de teste");
    sqlx::migrate!().run(&pool).await.expect("falha nas migrações de teste");
    pool
}

/// Treinador novo (e-mail aleatório) com conta Free. Retorna o id do dono.
pub async fn create_test_coach(pool: &PgPool) -> Uuid {
    let email = format!("coach.{}@dribla.test", Uuid::new_v4().simple());
    let user = UserRepository::new(pool.clone())
        .create_user(pool, "Treinador de Teste", &email, "hash")
        .await
        .unwrap();
    CoachRepository::new(pool.clone())
        .create_account(pool, user.id)
        .await
        .unwrap();
    user.id
}
