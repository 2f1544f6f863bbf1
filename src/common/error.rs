use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Conta de treinador não encontrada")]
    CoachAccountNotFound,

    // O serviço foi chamado sem treinador autenticado
    #[error("Contexto do treinador ausente")]
    MissingOwnerContext,

    #[error("Aluno {0} não encontrado")]
    StudentNotFound(i64),

    #[error("Limite de {0} alunos atingido")]
    StudentLimitReached(i32),

    #[error("Plano inválido: {0}")]
    InvalidPlan(String),

    // Falha em qualquer uma das consultas do painel
    #[error("Falha ao carregar o painel: {0}")]
    DashboardUnavailable(String),

    #[error("Serviço de e-mail não configurado")]
    MailerNotConfigured,

    #[error("Falha no envio de e-mail: {0}")]
    MailerError(String),

    #[error("Segredo do agendador inválido")]
    InvalidCronSecret,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPlan(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::MissingOwnerContext
            | AppError::InvalidCronSecret => StatusCode::UNAUTHORIZED,
            AppError::StudentLimitReached(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::CoachAccountNotFound
            | AppError::StudentNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exibida ao treinador. Nunca expõe detalhes internos.
    fn user_message(&self, lang: &str) -> String {
        let en = lang == "en";
        let text = match self {
            AppError::ValidationError(_) => {
                if en { "One or more fields are invalid." } else { "Um ou mais campos são inválidos." }
            }
            AppError::EmailAlreadyExists => {
                if en { "This e-mail is already in use." } else { "Este e-mail já está em uso." }
            }
            AppError::InvalidCredentials => {
                if en { "Invalid e-mail or password." } else { "E-mail ou senha inválidos." }
            }
            AppError::InvalidToken | AppError::MissingOwnerContext => {
                if en {
                    "Missing or invalid authentication token."
                } else {
                    "Token de autenticação inválido ou ausente."
                }
            }
            AppError::UserNotFound => {
                if en { "User not found." } else { "Usuário não encontrado." }
            }
            AppError::CoachAccountNotFound => {
                if en { "Coach account not found." } else { "Conta de treinador não encontrada." }
            }
            AppError::StudentNotFound(_) => {
                if en { "Student not found." } else { "Aluno não encontrado." }
            }
            AppError::StudentLimitReached(limit) => {
                return if en {
                    format!("Limit of {limit} students reached. Upgrade your plan.")
                } else {
                    format!("Limite de {limit} alunos atingido. Faça upgrade do plano.")
                };
            }
            AppError::InvalidPlan(_) => {
                if en { "Invalid plan selected." } else { "Plano inválido selecionado." }
            }
            AppError::DashboardUnavailable(_) => {
                if en {
                    "Could not load the dashboard data."
                } else {
                    "Não foi possível carregar os dados do painel."
                }
            }
            AppError::MailerNotConfigured => {
                if en {
                    "E-mail service is not configured on the server."
                } else {
                    "Serviço de e-mail não configurado no servidor."
                }
            }
            AppError::InvalidCronSecret => {
                if en { "Invalid scheduler secret." } else { "Segredo do agendador inválido." }
            }
            _ => {
                if en { "An unexpected error occurred." } else { "Ocorreu um erro inesperado." }
            }
        };
        text.to_string()
    }

    /// Converte para a resposta da API no idioma pedido pelo cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let details = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.user_message(&locale.0),
            details,
        }
    }
}

// Para extratores e middlewares que não têm acesso ao Locale
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(AppError::StudentNotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::StudentLimitReached(10).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidPlan("gold".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::MissingOwnerContext.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DashboardUnavailable("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let api = AppError::DashboardUnavailable("relation \"students\" does not exist".into())
            .to_api_error(&pt());
        assert_eq!(api.error, "Não foi possível carregar os dados do painel.");
        assert!(!api.error.contains("students"));
    }

    #[test]
    fn messages_follow_locale() {
        assert_eq!(AppError::StudentNotFound(1).to_api_error(&pt()).error, "Aluno não encontrado.");
        assert_eq!(AppError::StudentNotFound(1).to_api_error(&en()).error, "Student not found.");
        assert_eq!(
            AppError::StudentLimitReached(150).to_api_error(&en()).error,
            "Limit of 150 students reached. Upgrade your plan."
        );
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("email");
        err.message = Some("O e-mail do responsável é inválido.".into());
        errors.add("guardian_email", err);

        let api = AppError::ValidationError(errors).to_api_error(&pt());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes da validação");
        assert_eq!(details["guardian_email"][0], "O e-mail do responsável é inválido.");
    }
}
