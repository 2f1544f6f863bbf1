// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CoachRepository, UserRepository},
    models::auth::{Claims, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

/// E-mails são gravados e comparados sempre em minúsculas.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    coach_repo: CoachRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        coach_repo: CoachRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, coach_repo, jwt_secret, pool }
    }

    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> Result<String, AppError> {
        // 1. Hashing fora da transação, pois não toca no banco
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Usuário e conta de treinador nascem juntos
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, name.trim(), &normalize_email(email), &hashed_password)
            .await?;

        self.coach_repo.create_account(&mut *tx, new_user.id).await?;

        tx.commit().await?;

        tracing::info!(user_id = %new_user.id, "Novo treinador registrado no plano Free");

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(token, &self.jwt_secret)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        issue_token(user_id, &self.jwt_secret)
    }
}

pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Qualquer falha de assinatura ou expiração vira `InvalidToken`.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_pool;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Tite@Dribla.COM "), "tite@dribla.com");
    }

    #[tokio::test]
    #[ignore = "precisa de Postgres (TEST_DATABASE_URL)"]
    async fn email_is_unique_regardless_of_case() {
        let pool = test_pool().await;
        let service = AuthService::new(
            UserRepository::new(pool.clone()),
            CoachRepository::new(pool.clone()),
            "segredo".to_string(),
            pool,
        );
        let email = format!("Tite.{}@Dribla.com", Uuid::new_v4().simple());

        service.register_user("Tite", &email, "senha123").await.unwrap();

        let duplicate = service.register_user("Outro", &email.to_lowercase(), "outra123").await;
        assert!(matches!(duplicate, Err(AppError::EmailAlreadyExists)));

        assert!(service.login_user(&email.to_uppercase(), "senha123").await.is_ok());
        assert!(matches!(
            service.login_user(&email, "outra123").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "segredo").unwrap();

        let claims = decode_claims(&token, "segredo").unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let token = issue_token(Uuid::new_v4(), "segredo").unwrap();
        assert!(matches!(decode_claims(&token, "outro"), Err(AppError::InvalidToken)));
        assert!(matches!(decode_claims("lixo", "segredo"), Err(AppError::InvalidToken)));
    }
}
