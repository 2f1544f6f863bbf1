// src/models/billing.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Resultado de uma rodada do envio de cobranças.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReport {
    pub sent: u32,
    pub failed: u32,
    /// Alunos que receberam o lembrete nesta rodada.
    pub processed_ids: Vec<i64>,
}

/// Mensagem pronta para o provedor de e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}
